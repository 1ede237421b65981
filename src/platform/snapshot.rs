//! Published configuration snapshot.

use serde::Serialize;
use serde_json::{Map, Value};

use super::mode::{ModeFlags, ModeOverride, PlatformMode, PLATFORM_TYPE_KEY};

/// Settings payload as returned by the backend.
pub type RawSettings = Map<String, Value>;

/// Everything dependents can observe about the resolved configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigSnapshot {
    /// Resolved settings (backend payload merged with the override)
    pub config: RawSettings,
    /// True until the settings fetch settles
    pub loading: bool,
    #[serde(flatten)]
    pub flags: ModeFlags,
}

impl ConfigSnapshot {
    /// Snapshot published at mount, before the fetch settles.
    pub fn seeded(mode_override: Option<ModeOverride>) -> Self {
        Self {
            config: RawSettings::new(),
            loading: true,
            flags: ModeFlags::seeded(mode_override),
        }
    }

    pub fn is_enterprise_licensed(&self) -> bool {
        self.flags.is_enterprise_licensed
    }

    pub fn is_cloud(&self) -> bool {
        self.flags.is_cloud
    }

    pub fn is_open_source(&self) -> bool {
        self.flags.is_open_source
    }

    pub fn mode(&self) -> Option<PlatformMode> {
        self.flags.mode()
    }

    /// The resolved `PLATFORM_TYPE`, if present.
    pub fn platform_type(&self) -> Option<&Value> {
        self.config.get(PLATFORM_TYPE_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_seeded_snapshot() {
        let snapshot = ConfigSnapshot::seeded(None);
        assert!(snapshot.loading);
        assert!(snapshot.config.is_empty());
        assert_eq!(snapshot.mode(), None);

        let snapshot = ConfigSnapshot::seeded(Some(ModeOverride::Enterprise));
        assert!(snapshot.is_enterprise_licensed());
        assert!(snapshot.platform_type().is_none());
    }

    #[test]
    fn test_snapshot_serializes_published_fields() {
        let mut snapshot = ConfigSnapshot::seeded(Some(ModeOverride::Cloud));
        snapshot
            .config
            .insert(PLATFORM_TYPE_KEY.to_string(), json!("cloud"));
        snapshot.loading = false;

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(
            value,
            json!({
                "config": {"PLATFORM_TYPE": "cloud"},
                "loading": false,
                "isEnterpriseLicensed": false,
                "isCloud": true,
                "isOpenSource": false
            })
        );
    }
}
