//! Settings source abstraction.

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use super::snapshot::RawSettings;

/// Response of a settings fetch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SettingsResponse {
    pub data: RawSettings,
}

impl SettingsResponse {
    pub fn new(data: RawSettings) -> Self {
        Self { data }
    }
}

/// Accepts both `{"data": {...}}` and a bare settings object.
impl<'de> Deserialize<'de> for SettingsResponse {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Body {
            Envelope { data: RawSettings },
            Bare(RawSettings),
        }

        Ok(match Body::deserialize(deserializer)? {
            Body::Envelope { data } => Self { data },
            Body::Bare(data) => Self { data },
        })
    }
}

/// Backend the resolver fetches settings from.
#[async_trait]
pub trait SettingsSource: Send + Sync {
    async fn get_settings(&self) -> Result<SettingsResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_envelope() {
        let response: SettingsResponse =
            serde_json::from_value(json!({"data": {"PLATFORM_TYPE": "cloud"}})).unwrap();
        assert_eq!(response.data.get("PLATFORM_TYPE"), Some(&json!("cloud")));
    }

    #[test]
    fn test_deserialize_bare_object() {
        let response: SettingsResponse =
            serde_json::from_value(json!({"PLATFORM_TYPE": "enterprise", "MAX_SEATS": 5}))
                .unwrap();
        assert_eq!(response.data.len(), 2);
    }

    #[test]
    fn test_deserialize_rejects_non_object() {
        assert!(serde_json::from_value::<SettingsResponse>(json!([1, 2])).is_err());
        assert!(serde_json::from_value::<SettingsResponse>(json!("cloud")).is_err());
    }
}
