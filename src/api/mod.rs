//! API client for the platform settings backend.
//!
//! This module provides the HTTP transport used to fetch the settings
//! payload the platform resolver derives its mode from.

mod client;
mod platform_settings;
mod types;

pub use client::{ApiClient, DEFAULT_TIMEOUT_SECS};
pub use platform_settings::SETTINGS_ENDPOINT;
pub use types::{ApiError, ApiStatus};
