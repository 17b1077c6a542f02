//! Watch registry: poll-on-demand change detection for resources.
//!
//! A watched URI maps to the upstream `lastModified` marker of its file.
//! Entries are never removed; they live as long as the registry.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, RwLock};
use tracing::{info, instrument};

use super::error::ResourceError;
use super::uri::ResourceAddress;
use crate::domains::figma::FigmaClient;

/// Status string reported once a watch is established.
pub const WATCHING: &str = "watching";

/// Result of `establish`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchStatus {
    pub uri: String,
    pub status: String,
}

/// Result of `check`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChangeReport {
    pub uri: String,
    pub changed: bool,
    /// RFC 3339 time at which the check ran.
    pub timestamp: String,
}

/// A watched URI and its last observed marker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WatchEntry {
    pub uri: String,
    pub last_modified: String,
}

/// Marker slot for one URI. `None` until the first successful fetch.
type Slot = Arc<Mutex<Option<String>>>;

/// Tracks the last observed version marker per watched URI.
///
/// Each URI has its own async mutex held across the upstream fetch, so
/// concurrent `establish`/`check` calls on the same URI are serialized and
/// never lose an update. Different URIs do not block each other.
pub struct WatchRegistry {
    client: Arc<FigmaClient>,
    entries: RwLock<HashMap<String, Slot>>,
}

impl WatchRegistry {
    pub fn new(client: Arc<FigmaClient>) -> Self {
        Self {
            client,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Starts (or refreshes) watching a URI.
    ///
    /// Re-establishing an already watched URI overwrites its marker.
    #[instrument(skip(self))]
    pub async fn establish(&self, uri: &str) -> Result<WatchStatus, ResourceError> {
        let address = ResourceAddress::parse(uri)?;

        let slot = {
            let mut entries = self.entries.write().await;
            entries.entry(uri.to_string()).or_default().clone()
        };

        let mut marker = slot.lock().await;
        let document = match self.client.get_file_document(&address.file_key).await {
            Ok(document) => document,
            Err(e) => {
                let never_established = marker.is_none();
                drop(marker);
                if never_established {
                    self.forget_unset(uri, &slot).await;
                }
                return Err(e.into());
            }
        };
        info!(
            "Watching {} (lastModified {})",
            uri, document.last_modified
        );
        *marker = Some(document.last_modified);

        Ok(WatchStatus {
            uri: uri.to_string(),
            status: WATCHING.to_string(),
        })
    }

    /// Drops a slot that never received a marker, unless another caller
    /// replaced it or is establishing it right now.
    async fn forget_unset(&self, uri: &str, slot: &Slot) {
        let mut entries = self.entries.write().await;
        let unset = entries.get(uri).is_some_and(|current| Arc::ptr_eq(current, slot))
            && slot.try_lock().is_ok_and(|marker| marker.is_none());
        if unset {
            entries.remove(uri);
        }
    }

    /// Fetches the file once and reports whether its marker moved since the
    /// previous observation.
    #[instrument(skip(self))]
    pub async fn check(&self, uri: &str) -> Result<ChangeReport, ResourceError> {
        let slot = self
            .entries
            .read()
            .await
            .get(uri)
            .cloned()
            .ok_or_else(|| ResourceError::not_watched(uri))?;

        let mut marker = slot.lock().await;
        let Some(previous) = marker.clone() else {
            return Err(ResourceError::not_watched(uri));
        };

        let address = ResourceAddress::parse(uri)?;
        let document = self.client.get_file_document(&address.file_key).await?;
        let changed = document.last_modified != previous;
        if changed {
            info!(
                "Change detected for {}: {} -> {}",
                uri, previous, document.last_modified
            );
            *marker = Some(document.last_modified);
        }

        Ok(ChangeReport {
            uri: uri.to_string(),
            changed,
            timestamp: Utc::now().to_rfc3339(),
        })
    }

    /// Snapshot of all established watches, sorted by URI.
    pub async fn watched(&self) -> Vec<WatchEntry> {
        let slots: Vec<(String, Slot)> = self
            .entries
            .read()
            .await
            .iter()
            .map(|(uri, slot)| (uri.clone(), slot.clone()))
            .collect();

        let mut watched = Vec::with_capacity(slots.len());
        for (uri, slot) in slots {
            if let Some(last_modified) = slot.lock().await.clone() {
                watched.push(WatchEntry { uri, last_modified });
            }
        }
        watched.sort_by(|a, b| a.uri.cmp(&b.uri));
        watched
    }
}
