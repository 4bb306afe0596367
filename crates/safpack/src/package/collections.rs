//! Collection membership and the optional collection registry.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, HeaderValue};
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::{PackagerError, Result};
use crate::input::split_values;

use super::item::Item;

/// Registry endpoint used when none is configured.
pub const DEFAULT_REGISTRY_URL: &str = "http://localhost:8080/rest/collections";

/// Environment variable overriding the registry endpoint.
const REGISTRY_URL_ENV: &str = "SAFPACK_REGISTRY_URL";

/// `SAFPACK_REGISTRY_URL` if set, otherwise [`DEFAULT_REGISTRY_URL`].
pub fn default_registry_url() -> String {
    std::env::var(REGISTRY_URL_ENV).unwrap_or_else(|_| DEFAULT_REGISTRY_URL.to_string())
}

/// Source of the collection handles a repository knows about.
pub trait CollectionRegistry: Send + Sync {
    /// Fetch every known collection handle.
    fn known_handles(&self) -> Result<HashSet<String>>;
}

#[derive(Debug, Deserialize)]
struct CollectionRecord {
    handle: String,
}

/// Registry backed by a repository REST endpoint returning
/// `[{"handle": "..."}, ...]`.
pub struct HttpCollectionRegistry {
    client: Client,
    url: String,
}

impl HttpCollectionRegistry {
    /// Create a registry for `url`.
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| PackagerError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            url: url.into(),
        })
    }

    /// The endpoint queried.
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl CollectionRegistry for HttpCollectionRegistry {
    fn known_handles(&self) -> Result<HashSet<String>> {
        let response = self
            .client
            .get(&self.url)
            .header(ACCEPT, HeaderValue::from_static("application/json"))
            .send()
            .map_err(|e| PackagerError::RegistryUnavailable(format!("{}: {}", self.url, e)))?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(PackagerError::RegistryUnavailable(format!(
                "{} returned {}",
                self.url, status
            )));
        }

        let records: Vec<CollectionRecord> = response
            .json()
            .map_err(|e| PackagerError::RegistryUnavailable(format!("invalid response: {}", e)))?;

        Ok(records.into_iter().map(|r| r.handle).collect())
    }
}

/// In-memory registry with a fixed set of handles.
#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    handles: HashSet<String>,
}

impl StaticRegistry {
    pub fn new<I, S>(handles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            handles: handles.into_iter().map(Into::into).collect(),
        }
    }
}

impl CollectionRegistry for StaticRegistry {
    fn known_handles(&self) -> Result<HashSet<String>> {
        Ok(self.handles.clone())
    }
}

enum RegistryState {
    Unfetched,
    Ready(HashSet<String>),
    Unavailable,
}

/// Writes collection membership for items, validating handles when a
/// registry is configured.
///
/// One linker serves one run. The registry is fetched on the first
/// collection cell and cached until the linker is dropped.
pub struct CollectionLinker {
    registry: Option<Arc<dyn CollectionRegistry>>,
    state: RegistryState,
}

impl CollectionLinker {
    /// A linker that accepts every handle.
    pub fn unvalidated() -> Self {
        Self {
            registry: None,
            state: RegistryState::Unfetched,
        }
    }

    /// A linker validating handles against `registry`.
    pub fn validated(registry: Arc<dyn CollectionRegistry>) -> Self {
        Self {
            registry: Some(registry),
            state: RegistryState::Unfetched,
        }
    }

    /// Returns true while handles are being checked.
    pub fn is_validating(&self) -> bool {
        self.registry.is_some() && !matches!(self.state, RegistryState::Unavailable)
    }

    /// Append every handle in `cell` to the item's `collections` file.
    ///
    /// A registry that cannot be reached is reported once in `notes` and
    /// validation is switched off for the rest of the run. A handle the
    /// registry does not know fails the call.
    pub fn link(&mut self, item: &mut Item, cell: &str, notes: &mut Vec<String>) -> Result<usize> {
        let handles = split_values(cell);
        if handles.is_empty() {
            return Ok(0);
        }

        if let Some(known) = self.known(notes) {
            if let Some(unknown) = handles.iter().find(|h| !known.contains(**h)) {
                return Err(PackagerError::UnknownCollection(unknown.to_string()));
            }
        }

        for handle in &handles {
            item.add_collection(handle)?;
        }
        Ok(handles.len())
    }

    fn known(&mut self, notes: &mut Vec<String>) -> Option<&HashSet<String>> {
        let registry = self.registry.as_ref()?;

        if matches!(self.state, RegistryState::Unfetched) {
            self.state = match registry.known_handles() {
                Ok(handles) => {
                    info!(collections = handles.len(), "fetched collection registry");
                    RegistryState::Ready(handles)
                }
                Err(e) => {
                    warn!(error = %e, "collection validation disabled");
                    notes.push(format!("{}; collection validation disabled", e));
                    RegistryState::Unavailable
                }
            };
        }

        match &self.state {
            RegistryState::Ready(handles) => Some(handles),
            _ => None,
        }
    }
}

impl Default for CollectionLinker {
    fn default() -> Self {
        Self::unvalidated()
    }
}
