//! Platform mode derivation.
//!
//! The backend reports its licensing model through the `PLATFORM_TYPE`
//! settings key. This module maps that value onto three mutually exclusive
//! flags and handles the build-time mode override.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Settings key carrying the platform type.
pub const PLATFORM_TYPE_KEY: &str = "PLATFORM_TYPE";

/// Compile-time environment variable selecting a forced mode.
pub const MODE_OVERRIDE_ENV: &str = "PLATFORM_MODE_OVERRIDE";

/// The platform mode named by a set of [`ModeFlags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PlatformMode {
    Enterprise,
    Cloud,
    OpenSource,
}

impl PlatformMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlatformMode::Enterprise => "enterprise",
            PlatformMode::Cloud => "cloud",
            PlatformMode::OpenSource => "open-source",
        }
    }
}

impl std::fmt::Display for PlatformMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Forced platform mode for test builds.
///
/// `None` at the call site means "use whatever the backend reports".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModeOverride {
    Enterprise,
    Cloud,
}

impl ModeOverride {
    /// Value written into `PLATFORM_TYPE` when the override is active.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeOverride::Enterprise => "enterprise",
            ModeOverride::Cloud => "cloud",
        }
    }

    /// Parse an override value. Blank input means no override.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "" => None,
            "enterprise" => Some(ModeOverride::Enterprise),
            "cloud" => Some(ModeOverride::Cloud),
            other => {
                warn!("Ignoring unknown mode override '{}'", other);
                None
            }
        }
    }

    /// Override baked in at compile time through `PLATFORM_MODE_OVERRIDE`.
    pub fn from_build_env() -> Option<Self> {
        option_env!("PLATFORM_MODE_OVERRIDE").and_then(Self::parse)
    }
}

impl std::fmt::Display for ModeOverride {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Licensing flags published alongside the resolved config.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModeFlags {
    pub is_enterprise_licensed: bool,
    pub is_cloud: bool,
    pub is_open_source: bool,
}

impl ModeFlags {
    /// Flags in effect before the settings fetch completes.
    pub fn seeded(mode_override: Option<ModeOverride>) -> Self {
        match mode_override {
            Some(ModeOverride::Enterprise) => Self::for_mode(PlatformMode::Enterprise),
            Some(ModeOverride::Cloud) => Self::for_mode(PlatformMode::Cloud),
            None => Self::default(),
        }
    }

    pub fn for_mode(mode: PlatformMode) -> Self {
        Self {
            is_enterprise_licensed: mode == PlatformMode::Enterprise,
            is_cloud: mode == PlatformMode::Cloud,
            is_open_source: mode == PlatformMode::OpenSource,
        }
    }

    /// Derive flags from a `PLATFORM_TYPE` value.
    ///
    /// Returns `None` for falsy values, in which case callers keep their
    /// current flags. Any truthy value other than `"enterprise"` or `"cloud"`
    /// maps to open source.
    pub fn from_platform_type(value: &Value) -> Option<Self> {
        if !is_truthy(value) {
            return None;
        }

        let mode = match value.as_str() {
            Some("enterprise") => PlatformMode::Enterprise,
            Some("cloud") => PlatformMode::Cloud,
            _ => PlatformMode::OpenSource,
        };
        Some(Self::for_mode(mode))
    }

    /// The single mode these flags name, if any.
    pub fn mode(&self) -> Option<PlatformMode> {
        match (self.is_enterprise_licensed, self.is_cloud, self.is_open_source) {
            (true, false, false) => Some(PlatformMode::Enterprise),
            (false, true, false) => Some(PlatformMode::Cloud),
            (false, false, true) => Some(PlatformMode::OpenSource),
            _ => None,
        }
    }

    pub fn active_count(&self) -> usize {
        [self.is_enterprise_licensed, self.is_cloud, self.is_open_source]
            .iter()
            .filter(|flag| **flag)
            .count()
    }
}

/// JSON truthiness: `null`, `false`, `0` and `""` are falsy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_seeded_flags() {
        assert_eq!(ModeFlags::seeded(None), ModeFlags::default());
        assert_eq!(ModeFlags::seeded(None).active_count(), 0);

        let cloud = ModeFlags::seeded(Some(ModeOverride::Cloud));
        assert!(cloud.is_cloud);
        assert_eq!(cloud.mode(), Some(PlatformMode::Cloud));

        let enterprise = ModeFlags::seeded(Some(ModeOverride::Enterprise));
        assert!(enterprise.is_enterprise_licensed);
        assert_eq!(enterprise.active_count(), 1);
    }

    #[test]
    fn test_from_platform_type_mapping() {
        let flags = ModeFlags::from_platform_type(&json!("enterprise")).unwrap();
        assert_eq!(flags.mode(), Some(PlatformMode::Enterprise));

        let flags = ModeFlags::from_platform_type(&json!("cloud")).unwrap();
        assert_eq!(flags.mode(), Some(PlatformMode::Cloud));

        for other in [json!("opensource"), json!("Enterprise"), json!(1), json!(true)] {
            let flags = ModeFlags::from_platform_type(&other).unwrap();
            assert_eq!(flags.mode(), Some(PlatformMode::OpenSource), "{}", other);
        }
    }

    #[test]
    fn test_from_platform_type_falsy() {
        for falsy in [json!(null), json!(""), json!(false), json!(0)] {
            assert!(ModeFlags::from_platform_type(&falsy).is_none(), "{}", falsy);
        }
    }

    #[test]
    fn test_truthy_values_yield_one_flag() {
        for value in [json!("enterprise"), json!("cloud"), json!("x"), json!([]), json!({})] {
            let flags = ModeFlags::from_platform_type(&value).unwrap();
            assert_eq!(flags.active_count(), 1);
        }
    }

    #[test]
    fn test_mode_override_parse() {
        assert_eq!(ModeOverride::parse("cloud"), Some(ModeOverride::Cloud));
        assert_eq!(
            ModeOverride::parse(" Enterprise "),
            Some(ModeOverride::Enterprise)
        );
        assert_eq!(ModeOverride::parse(""), None);
        assert_eq!(ModeOverride::parse("opensource"), None);
    }

    #[test]
    fn test_mode_serde_names() {
        assert_eq!(serde_json::to_value(ModeOverride::Cloud).unwrap(), json!("cloud"));
        assert_eq!(
            serde_json::from_value::<ModeOverride>(json!("enterprise")).unwrap(),
            ModeOverride::Enterprise
        );
        assert!(serde_json::from_value::<ModeOverride>(json!("Cloud")).is_err());

        assert_eq!(
            serde_json::to_value(PlatformMode::OpenSource).unwrap(),
            json!(PlatformMode::OpenSource.as_str())
        );
        assert_eq!(
            serde_json::from_value::<PlatformMode>(json!("open-source")).unwrap(),
            PlatformMode::OpenSource
        );
    }

    #[test]
    fn test_flags_serialize_camel_case() {
        let value = serde_json::to_value(ModeFlags::for_mode(PlatformMode::Cloud)).unwrap();
        assert_eq!(
            value,
            json!({"isEnterpriseLicensed": false, "isCloud": true, "isOpenSource": false})
        );
    }
}
