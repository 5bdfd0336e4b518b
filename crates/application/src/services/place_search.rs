//! Debounced place search with last-issued-wins response ordering
//!
//! Each keystroke bumps an input generation. A debounced request fires only
//! if no newer input arrived during the debounce window; stale timers wake up,
//! see a newer generation and exit. Every issued request takes the next
//! sequence number, and a response is applied only while its number is still
//! the last one issued. A late response for an older query is therefore
//! dropped even if it arrives after the newer one.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use domain::{PlaceDetails, PlaceSuggestion};
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use crate::error::ApplicationError;
use crate::ports::{GeocodingPort, SearchOptions};

/// Search behavior settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Input pause required before a request fires
    pub debounce: Duration,
    /// Queries shorter than this (in characters, trimmed) issue no request
    pub min_query_length: usize,
    /// Result language
    pub language: String,
    /// Country code results are biased towards
    pub region_bias: Option<String>,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(500),
            min_query_length: 2,
            language: "en".to_string(),
            region_bias: None,
        }
    }
}

/// What the suggestion list currently shows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchSnapshot {
    /// Sequence number of the request that produced this state (0 = none yet)
    pub seq: u64,
    /// Query the suggestions belong to
    pub query: String,
    /// Displayed suggestions
    pub suggestions: Vec<PlaceSuggestion>,
    /// Provider error of the latest request, suggestions kept from before
    pub last_error: Option<String>,
}

impl SearchSnapshot {
    /// Find a displayed suggestion by id
    pub fn suggestion(&self, id: &str) -> Option<&PlaceSuggestion> {
        self.suggestions.iter().find(|s| s.id == id)
    }
}

struct SearchInner {
    geocoding: Arc<dyn GeocodingPort>,
    settings: SearchSettings,
    input_generation: AtomicU64,
    issued_seq: AtomicU64,
    /// Serializes input bumps against the debounced generation check
    issue_lock: Mutex<()>,
    session_token: Mutex<String>,
    state: watch::Sender<SearchSnapshot>,
}

/// Forward text search controller
///
/// Cheap to clone; clones share the same suggestion list.
#[derive(Clone)]
pub struct PlaceSearchController {
    inner: Arc<SearchInner>,
}

impl std::fmt::Debug for PlaceSearchController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaceSearchController")
            .field("settings", &self.inner.settings)
            .field("issued_seq", &self.inner.issued_seq.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl PlaceSearchController {
    #[must_use]
    pub fn new(geocoding: Arc<dyn GeocodingPort>, settings: SearchSettings) -> Self {
        let (state, _) = watch::channel(SearchSnapshot::default());
        Self {
            inner: Arc::new(SearchInner {
                geocoding,
                settings,
                input_generation: AtomicU64::new(0),
                issued_seq: AtomicU64::new(0),
                issue_lock: Mutex::new(()),
                session_token: Mutex::new(Uuid::new_v4().to_string()),
                state,
            }),
        }
    }

    #[must_use]
    pub fn settings(&self) -> &SearchSettings {
        &self.inner.settings
    }

    /// Receiver notified whenever the displayed suggestions change
    pub fn subscribe(&self) -> watch::Receiver<SearchSnapshot> {
        self.inner.state.subscribe()
    }

    /// Current suggestion list
    pub fn snapshot(&self) -> SearchSnapshot {
        self.inner.state.borrow().clone()
    }

    /// Feed a keystroke
    ///
    /// Returns immediately. A query below the minimum length clears the list
    /// at once; otherwise a request fires after the debounce window unless
    /// newer input arrives first. Provider errors are recorded in the
    /// snapshot and the previous suggestions stay displayed.
    #[instrument(skip(self), fields(query_len = query.len()))]
    pub fn search(&self, query: &str) {
        let generation = self.inner.bump_input();
        let query = query.trim().to_string();

        if self.inner.is_too_short(&query) {
            self.inner.clear(query);
            return;
        }

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(inner.settings.debounce).await;
            let Some(seq) = inner.issue_if_current(generation) else {
                return;
            };
            let result = inner.request(&query, seq).await;
            if let Err(e) = &result {
                warn!(seq, error = %e, "Place search failed, keeping previous suggestions");
            }
            inner.apply(seq, query, result);
        });
    }

    /// Search without waiting for the debounce window
    ///
    /// Cancels any pending debounced request and takes part in the same
    /// ordering: if newer input supersedes this request before it returns,
    /// its result is not displayed and the current list is returned instead.
    #[instrument(skip(self), fields(query_len = query.len()))]
    pub async fn search_now(&self, query: &str) -> Result<Vec<PlaceSuggestion>, ApplicationError> {
        self.inner.bump_input();
        let query = query.trim().to_string();

        if self.inner.is_too_short(&query) {
            self.inner.clear(query);
            return Ok(Vec::new());
        }

        let seq = self.inner.issue_seq();
        let result = self.inner.request(&query, seq).await;
        let failure = result.as_ref().err().map(|e| match e {
            ApplicationError::SearchProvider(message) => message.clone(),
            other => other.to_string(),
        });
        self.inner.apply(seq, query, result);

        match failure {
            Some(message) => Err(ApplicationError::SearchProvider(message)),
            None => Ok(self.snapshot().suggestions),
        }
    }

    /// Resolve a suggestion id to coordinates
    ///
    /// Ends the current autocomplete session on success.
    #[instrument(skip(self))]
    pub async fn fetch_details(&self, suggestion_id: &str) -> Result<PlaceDetails, ApplicationError> {
        let options = self.inner.options();
        match self.inner.geocoding.place_details(suggestion_id, &options).await? {
            Some(details) => {
                *self.inner.session_token.lock() = Uuid::new_v4().to_string();
                debug!(name = %details.name, coordinate = %details.coordinate, "Place resolved");
                Ok(details)
            },
            None => Err(ApplicationError::NotFound(format!(
                "no geometry for place {suggestion_id}"
            ))),
        }
    }

    /// Resolve a suggestion the rider picked from the displayed list
    ///
    /// Ids from a superseded list are refused.
    pub async fn select_suggestion(&self, suggestion_id: &str) -> Result<PlaceDetails, ApplicationError> {
        if self.snapshot().suggestion(suggestion_id).is_none() {
            return Err(ApplicationError::NotFound(format!(
                "suggestion {suggestion_id} is not displayed"
            )));
        }
        self.fetch_details(suggestion_id).await
    }

    /// Clear the list and supersede all pending and in-flight requests
    pub fn reset(&self) {
        self.inner.bump_input();
        self.inner.clear(String::new());
    }
}

impl SearchInner {
    fn bump_input(&self) -> u64 {
        let _guard = self.issue_lock.lock();
        self.input_generation.fetch_add(1, Ordering::AcqRel) + 1
    }

    /// Issue a sequence number only if no input arrived since `generation`
    fn issue_if_current(&self, generation: u64) -> Option<u64> {
        let _guard = self.issue_lock.lock();
        (self.input_generation.load(Ordering::Acquire) == generation).then(|| self.issue_seq())
    }

    fn issue_seq(&self) -> u64 {
        self.issued_seq.fetch_add(1, Ordering::AcqRel) + 1
    }

    fn is_too_short(&self, query: &str) -> bool {
        query.chars().count() < self.settings.min_query_length
    }

    fn options(&self) -> SearchOptions {
        SearchOptions {
            language: self.settings.language.clone(),
            region_bias: self.settings.region_bias.clone(),
            session_token: Some(self.session_token.lock().clone()),
        }
    }

    async fn request(&self, query: &str, seq: u64) -> Result<Vec<PlaceSuggestion>, ApplicationError> {
        debug!(seq, "Issuing place search");
        self.geocoding.search(query, &self.options()).await
    }

    fn clear(&self, query: String) {
        let seq = self.issue_seq();
        self.state.send_replace(SearchSnapshot {
            seq,
            query,
            suggestions: Vec::new(),
            last_error: None,
        });
    }

    fn apply(&self, seq: u64, query: String, result: Result<Vec<PlaceSuggestion>, ApplicationError>) {
        self.state.send_if_modified(|snapshot| {
            let latest = self.issued_seq.load(Ordering::Acquire);
            if seq != latest {
                debug!(seq, latest, "Discarding superseded search response");
                return false;
            }
            match result {
                Ok(suggestions) => {
                    debug!(seq, count = suggestions.len(), "Applying search response");
                    *snapshot = SearchSnapshot {
                        seq,
                        query,
                        suggestions,
                        last_error: None,
                    };
                },
                Err(e) => {
                    snapshot.seq = seq;
                    snapshot.query = query;
                    snapshot.last_error = Some(e.to_string());
                },
            }
            true
        });
    }
}
