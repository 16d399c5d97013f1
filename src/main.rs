//! EventZen command-line client
//!
//! Main application entry point. Without arguments it prints the filtered
//! catalog with each event's registration action; `register <id> [code]`
//! and `cancel <id>` run the visitor actions.

use anyhow::{bail, Context};
use chrono::Utc;
use tracing::{info, warn};

use eventzen::{
    config::Settings,
    models::Session,
    services::{RegistrationOutcome, ServiceFactory},
    state::{action_for, apply_local_transition, reconcile_registrations, AppState, LocalTransition, SortOrder},
    utils::{helpers, logging},
};

enum Command {
    Browse,
    Register { event_id: i64, private_code: Option<String> },
    Cancel { event_id: i64 },
}

fn parse_command(args: &[String]) -> anyhow::Result<Command> {
    let parse_id = |raw: Option<&String>| -> anyhow::Result<i64> {
        let raw = raw.context("missing event id")?;
        raw.parse::<i64>().with_context(|| format!("invalid event id: {}", raw))
    };

    match args.first().map(String::as_str) {
        None | Some("browse") => Ok(Command::Browse),
        Some("register") => Ok(Command::Register {
            event_id: parse_id(args.get(1))?,
            private_code: args.get(2).cloned(),
        }),
        Some("cancel") => Ok(Command::Cancel { event_id: parse_id(args.get(1))? }),
        Some(other) => bail!("unknown command: {} (expected browse, register or cancel)", other),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new().context("failed to load configuration")?;
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_command(&args)?;

    info!("Starting {}", eventzen::info());

    let services = ServiceFactory::new(&settings)?;
    let session = settings.session();
    let now = Utc::now();

    let state = load_state(&services, &session).await;
    let mut state = apply_local_transition(
        state,
        LocalTransition::CriteriaChanged(settings.filter_criteria()?),
    );

    match command {
        Command::Browse => {}
        Command::Register { event_id, private_code } => {
            let (next, outcome) = services
                .registration_service
                .register(state, &session, event_id, private_code.as_deref())
                .await;
            state = next;
            report(&outcome);
        }
        Command::Cancel { event_id } => {
            let (next, outcome) = services.registration_service.cancel(state, &session, event_id).await;
            state = next;
            report(&outcome);
        }
    }

    if let Some(message) = state.last_error() {
        eprintln!("! {}", message);
    }

    print_catalog(&state, &session, now);
    Ok(())
}

/// Fetch catalog and registrations side by side
async fn load_state(services: &ServiceFactory, session: &Session) -> AppState {
    let (state, generation) = AppState::new().begin_catalog_load();

    let registrations = async {
        match session.visitor_id {
            Some(visitor_id) if session.is_authenticated_at(Utc::now()) => {
                services.api.visitor_registrations(session, visitor_id).await.map(Some)
            }
            _ => Ok(None),
        }
    };

    let (catalog, registrations) = futures::future::join(services.api.list_events(session), registrations).await;

    let state = services.catalog_service.finish_load(state, generation, catalog);
    match registrations {
        Ok(Some(registrations)) => reconcile_registrations(state, &registrations),
        Ok(None) => state,
        Err(e) => {
            warn!(error = %e, "Could not load registrations");
            state
        }
    }
}

fn report(outcome: &RegistrationOutcome) {
    match outcome {
        RegistrationOutcome::Registered => println!("Registered."),
        RegistrationOutcome::Cancelled => println!("Registration cancelled."),
        RegistrationOutcome::PromptPrivateCode { error: None } => {
            println!("This is a private event. Run again with the event code: register <id> <code>")
        }
        RegistrationOutcome::PromptPrivateCode { error: Some(error) } => println!("Private code refused: {}", error),
        RegistrationOutcome::RedirectToLogin => println!("Please log in first (set EVENTZEN__SESSION__TOKEN)."),
        RegistrationOutcome::SessionExpired { message } => println!("{}", message),
        RegistrationOutcome::Full => println!("This event is full."),
        RegistrationOutcome::Closed => println!("Registration for this event is closed."),
        RegistrationOutcome::AlreadyRegistered => println!("You are already registered."),
        RegistrationOutcome::NotRegistered => println!("You are not registered for this event."),
        RegistrationOutcome::InFlight => println!("A request for this event is already running."),
        RegistrationOutcome::Failed { message, .. } => println!("Failed: {}", message),
    }
}

fn print_catalog(state: &AppState, session: &Session, now: chrono::DateTime<Utc>) {
    let events = state.visible_events_sorted(now, SortOrder::Ascending);
    println!("{} of {} events", events.len(), state.catalog().len());

    for event in events {
        let when = event
            .date
            .map(helpers::format_timestamp)
            .unwrap_or_else(|| "date TBA".to_string());
        let capacity = match event.max_attendees {
            Some(max) => format!("{}/{}", event.current_attendees, max),
            None => event.current_attendees.to_string(),
        };
        println!(
            "#{:<5} {:<40} {:<22} {:<9} {:>9}  [{}]",
            event.id,
            helpers::truncate_text(&event.title, 40),
            when,
            event.event_type,
            capacity,
            action_for(state, session, event, now),
        );

        let location = event.display_location();
        if !location.is_empty() {
            println!("       {}", location);
        }
    }
}
