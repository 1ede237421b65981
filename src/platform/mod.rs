//! Platform configuration resolution.
//!
//! Fetches the platform settings once per session, derives the licensing
//! mode (enterprise, cloud or open source) and publishes both to dependents.

mod mode;
mod resolver;
mod snapshot;
mod source;

pub use mode::{ModeFlags, ModeOverride, PlatformMode, MODE_OVERRIDE_ENV, PLATFORM_TYPE_KEY};
pub use resolver::{ConfigHandle, ConfigProvider, ConfigResolver, ResolveError};
pub use snapshot::{ConfigSnapshot, RawSettings};
pub use source::{SettingsResponse, SettingsSource};
