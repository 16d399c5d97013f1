//! Test helpers module
//!
//! This module provides utilities for testing the EventZen client core:
//! a mock backend server and builders for events, sessions and settings.

#![allow(dead_code)]

pub mod backend_mock;
pub mod test_data;

pub use backend_mock::*;
pub use test_data::*;
