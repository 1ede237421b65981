use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::api::ApiClient;
use crate::cli::BackendArgs;
use crate::platform::{ConfigProvider, ConfigSnapshot, ModeOverride, MODE_OVERRIDE_ENV};

/// Mount a provider against the backend and wait for it to settle.
pub(super) async fn resolve_snapshot(backend: &BackendArgs) -> Result<ConfigSnapshot> {
    let client = ApiClient::new(
        &backend.settings_url,
        backend.api_key.clone(),
        backend.timeout_secs,
    )?;
    debug!("Settings backend: {}", client.base_url());

    let mode_override = ModeOverride::from_build_env();
    if let Some(mode) = mode_override {
        warn!(
            "⚠️  Built with {}={}; the backend platform type will be ignored",
            MODE_OVERRIDE_ENV, mode
        );
    }

    let provider = ConfigProvider::initialize(Arc::new(client), mode_override);
    let snapshot = provider.settled().await;
    provider.unmount();

    Ok(snapshot)
}

pub async fn run_resolve(backend: BackendArgs, json: bool) -> Result<()> {
    let snapshot = resolve_snapshot(&backend).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", format_snapshot(&snapshot));
    }

    Ok(())
}

fn format_snapshot(snapshot: &ConfigSnapshot) -> String {
    let mut out = String::new();

    match snapshot.mode() {
        Some(mode) => out.push_str(&format!("✅ Platform mode: {}\n", mode)),
        None => out.push_str("⚠️  Platform mode unresolved\n"),
    }
    out.push_str(&format!(
        "   Enterprise licensed: {}\n",
        snapshot.is_enterprise_licensed()
    ));
    out.push_str(&format!("   Cloud: {}\n", snapshot.is_cloud()));
    out.push_str(&format!("   Open source: {}\n", snapshot.is_open_source()));

    if snapshot.config.is_empty() {
        out.push_str("   Settings: none\n");
    } else {
        let mut keys: Vec<&str> = snapshot.config.keys().map(String::as_str).collect();
        keys.sort_unstable();
        out.push_str(&format!("   Settings: {}\n", keys.join(", ")));
    }

    out
}
