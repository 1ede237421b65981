//! Platform settings resolution and licensing-mode derivation.
//!
//! [`platform::ConfigProvider`] fetches the settings payload once per
//! session, derives the platform mode and publishes the result to every
//! [`platform::ConfigHandle`].

pub mod api;
pub mod cli;
pub mod command;
pub mod platform;
