//! Session-wide configuration resolver.
//!
//! The resolver owns the published [`ConfigSnapshot`]. A [`ConfigProvider`]
//! mounts it, seeds the snapshot from the optional [`ModeOverride`] and runs
//! exactly one settings fetch in the background. Dependents hold a
//! [`ConfigHandle`] and read the latest snapshot synchronously.
//!
//! ```text
//! mount ── seed (loading = true) ── fetch ──┬─ Ok  ── override, derive flags ─┐
//!                                           └─ Err ── log ────────────────────┴─ loading = false
//! ```
//!
//! Unmounting cancels the pending fetch; a completion arriving afterwards is
//! discarded.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use anyhow::Result;
use futures_util::FutureExt;
use serde_json::Value;
use thiserror::Error;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use super::mode::{ModeFlags, ModeOverride, PLATFORM_TYPE_KEY};
use super::snapshot::{ConfigSnapshot, RawSettings};
use super::source::{SettingsResponse, SettingsSource};

/// Errors absorbed by the resolver.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Any rejection from the settings source
    #[error("Error fetching platform settings: {0:#}")]
    SettingsFetchFailed(anyhow::Error),
}

/// Holds the published configuration state for one session.
pub struct ConfigResolver {
    mode_override: Option<ModeOverride>,
    state: watch::Sender<ConfigSnapshot>,
    disposed: CancellationToken,
}

impl ConfigResolver {
    /// Create a resolver with the seeded snapshot (`loading = true`).
    pub fn new(mode_override: Option<ModeOverride>) -> Self {
        let (state, _) = watch::channel(ConfigSnapshot::seeded(mode_override));
        Self {
            mode_override,
            state,
            disposed: CancellationToken::new(),
        }
    }

    /// Latest committed snapshot.
    pub fn read(&self) -> ConfigSnapshot {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> ConfigHandle {
        ConfigHandle {
            rx: self.state.subscribe(),
            disposed: self.disposed.clone(),
        }
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed.is_cancelled()
    }

    /// Disarm the resolver. Later settles are discarded.
    ///
    /// Cancels under the snapshot lock so a concurrent commit either lands
    /// before the disposal or not at all.
    pub fn dispose(&self) {
        self.state.send_if_modified(|_| {
            self.disposed.cancel();
            false
        });
    }

    /// Apply the outcome of the settings fetch.
    ///
    /// Returns `true` when the outcome was committed. Outcomes arriving after
    /// the session already settled, or after [`dispose`](Self::dispose), are
    /// ignored. Errors are logged and never propagated.
    pub fn on_fetch_settled(&self, result: Result<SettingsResponse>) -> bool {
        if self.is_disposed() {
            debug!("Discarding settings result: provider already unmounted");
            return false;
        }

        match result {
            Ok(response) => self.commit_settings(response.data),
            Err(e) => {
                error!("❌ {}", ResolveError::SettingsFetchFailed(e));
                self.commit(|snapshot| snapshot.loading = false)
            }
        }
    }

    fn commit_settings(&self, mut final_data: RawSettings) -> bool {
        if let Some(mode) = self.mode_override {
            info!("🔧 Mode override active: forcing platform type '{}'", mode);
            final_data.insert(
                PLATFORM_TYPE_KEY.to_string(),
                Value::String(mode.as_str().to_string()),
            );
        }

        let derived = final_data
            .get(PLATFORM_TYPE_KEY)
            .and_then(ModeFlags::from_platform_type);

        let committed = self.commit(|snapshot| {
            snapshot.config = final_data;
            if let Some(flags) = derived {
                snapshot.flags = flags;
            }
            snapshot.loading = false;
        });

        if committed {
            match derived.and_then(|flags| flags.mode()) {
                Some(mode) => info!("✅ Platform mode resolved: {}", mode),
                None => info!("✅ Platform settings loaded; no platform type, keeping seeded flags"),
            }
        }
        committed
    }

    /// Single write path. Loading only ever goes from true to false.
    fn commit(&self, update: impl FnOnce(&mut ConfigSnapshot)) -> bool {
        let committed = self.state.send_if_modified(|snapshot| {
            if self.disposed.is_cancelled() || !snapshot.loading {
                return false;
            }
            update(snapshot);
            true
        });

        if !committed {
            if self.is_disposed() {
                debug!("Discarding settings result: provider already unmounted");
            } else {
                warn!("Settings already resolved for this session; ignoring repeated result");
            }
        }
        committed
    }
}

/// Mount point for a [`ConfigResolver`].
///
/// Dropping the provider (or calling [`unmount`](Self::unmount)) cancels the
/// pending fetch.
pub struct ConfigProvider {
    resolver: Arc<ConfigResolver>,
}

impl ConfigProvider {
    /// Seed the resolver and start the one settings fetch.
    ///
    /// Must be called from within a tokio runtime.
    pub fn initialize(
        source: Arc<dyn SettingsSource>,
        mode_override: Option<ModeOverride>,
    ) -> Self {
        let resolver = Arc::new(ConfigResolver::new(mode_override));
        if let Some(mode) = mode_override {
            debug!("Seeding platform flags from mode override '{}'", mode);
        }

        let task_resolver = Arc::clone(&resolver);
        let disposed = resolver.disposed.clone();
        tokio::spawn(async move {
            debug!("Fetching platform settings");
            tokio::select! {
                biased;
                _ = disposed.cancelled() => {
                    debug!("Settings fetch abandoned: provider unmounted");
                }
                result = AssertUnwindSafe(source.get_settings()).catch_unwind() => {
                    let result = result.unwrap_or_else(|panic| {
                        Err(anyhow::anyhow!(
                            "settings source panicked: {}",
                            panic_message(panic.as_ref())
                        ))
                    });
                    task_resolver.on_fetch_settled(result);
                }
            }
        });

        Self { resolver }
    }

    pub fn resolver(&self) -> &ConfigResolver {
        &self.resolver
    }

    pub fn read(&self) -> ConfigSnapshot {
        self.resolver.read()
    }

    pub fn subscribe(&self) -> ConfigHandle {
        self.resolver.subscribe()
    }

    /// Wait until the fetch settles and return the final snapshot.
    pub async fn settled(&self) -> ConfigSnapshot {
        let mut rx = self.resolver.state.subscribe();
        let snapshot = match rx.wait_for(|snapshot| !snapshot.loading).await {
            Ok(snapshot) => snapshot.clone(),
            Err(_) => self.read(),
        };
        snapshot
    }

    pub fn unmount(self) {
        debug!("Unmounting config provider");
    }
}

impl Drop for ConfigProvider {
    fn drop(&mut self) {
        self.resolver.dispose();
    }
}

/// Read/subscribe interface handed to dependents.
#[derive(Debug, Clone)]
pub struct ConfigHandle {
    rx: watch::Receiver<ConfigSnapshot>,
    disposed: CancellationToken,
}

impl ConfigHandle {
    pub fn read(&self) -> ConfigSnapshot {
        self.rx.borrow().clone()
    }

    pub fn is_mounted(&self) -> bool {
        !self.disposed.is_cancelled()
    }

    /// Wait for the next committed snapshot. `None` once unmounted.
    pub async fn changed(&mut self) -> Option<ConfigSnapshot> {
        let disposed = self.disposed.clone();
        let changed = tokio::select! {
            biased;
            result = self.rx.changed() => result.is_ok(),
            _ = disposed.cancelled() => false,
        };

        if changed {
            Some(self.rx.borrow_and_update().clone())
        } else {
            None
        }
    }

    /// Wait until loading finishes. `None` if unmounted first.
    pub async fn wait_until_loaded(&mut self) -> Option<ConfigSnapshot> {
        let disposed = self.disposed.clone();
        let snapshot = tokio::select! {
            biased;
            result = self.rx.wait_for(|snapshot| !snapshot.loading) => {
                result.ok().map(|snapshot| snapshot.clone())
            }
            _ = disposed.cancelled() => None,
        };
        snapshot
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> &str {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        msg
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.as_str()
    } else {
        "unknown panic"
    }
}
