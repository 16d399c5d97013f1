//! Catalog filtering and ordering
//!
//! Everything here is a pure function of the catalog, the criteria and the
//! reference time, linear in the catalog size.

use std::cmp::Ordering;
use std::collections::HashSet;
use chrono::{DateTime, Utc};
use crate::models::{Event, EventStatusFilter, FilterCriteria};
use crate::utils::helpers::contains_ignore_case;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Whether `event` satisfies every active constraint in `criteria`
pub fn matches(event: &Event, criteria: &FilterCriteria, now: DateTime<Utc>) -> bool {
    matches_search(event, &criteria.search_text)
        && matches_category(event, &criteria.category)
        && matches_location(event, &criteria.location)
        && matches_organizer(event, &criteria.organizer)
        && criteria.event_type.map_or(true, |event_type| event.event_type == event_type)
        && criteria.status.map_or(true, |status| matches_status(event, status, now))
}

/// Events satisfying `criteria`, in catalog order
pub fn filter_events<'a>(catalog: &'a [Event], criteria: &FilterCriteria, now: DateTime<Utc>) -> Vec<&'a Event> {
    catalog
        .iter()
        .filter(|event| matches(event, criteria, now))
        .collect()
}

fn matches_search(event: &Event, text: &str) -> bool {
    text.is_empty()
        || contains_ignore_case(&event.title, text)
        || event.description.as_deref().map_or(false, |d| contains_ignore_case(d, text))
}

fn matches_category(event: &Event, category: &str) -> bool {
    category.is_empty() || event.category.as_deref() == Some(category)
}

fn matches_location(event: &Event, location: &str) -> bool {
    location.is_empty()
        || [&event.location, &event.state, &event.city, &event.address]
            .iter()
            .filter_map(|part| part.as_deref())
            .any(|part| contains_ignore_case(part, location))
}

fn matches_organizer(event: &Event, organizer: &str) -> bool {
    organizer.is_empty()
        || event.organizer_name.as_deref().map_or(false, |name| contains_ignore_case(name, organizer))
}

// Undated events never match a status constraint.
fn matches_status(event: &Event, status: EventStatusFilter, now: DateTime<Utc>) -> bool {
    match status {
        EventStatusFilter::Upcoming => event.is_upcoming(now),
        EventStatusFilter::Completed => event.is_past(now),
    }
}

/// Stable sort by date; undated events go last in both orders
pub fn sort_by_date(events: &mut [&Event], order: SortOrder) {
    events.sort_by(|a, b| match (a.date, b.date) {
        (Some(x), Some(y)) => match order {
            SortOrder::Ascending => x.cmp(&y),
            SortOrder::Descending => y.cmp(&x),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Registered events, soonest first
pub fn my_events<'a>(catalog: &'a [Event], registered: &HashSet<i64>) -> Vec<&'a Event> {
    let mut events: Vec<&Event> = catalog
        .iter()
        .filter(|event| registered.contains(&event.id))
        .collect();
    sort_by_date(&mut events, SortOrder::Ascending);
    events
}

/// Registered events that already took place, most recent first
pub fn past_registered_events<'a>(
    catalog: &'a [Event],
    registered: &HashSet<i64>,
    now: DateTime<Utc>,
) -> Vec<&'a Event> {
    let mut events: Vec<&Event> = catalog
        .iter()
        .filter(|event| registered.contains(&event.id) && event.is_past(now))
        .collect();
    sort_by_date(&mut events, SortOrder::Descending);
    events
}

/// Distinct non-empty categories in first-seen order, for filter dropdowns
pub fn categories(catalog: &[Event]) -> Vec<&str> {
    let mut seen = HashSet::new();
    catalog
        .iter()
        .filter_map(|event| event.category.as_deref())
        .filter(|category| !category.is_empty() && seen.insert(*category))
        .collect()
}
