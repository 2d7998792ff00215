use std::future::Future;

use tokio::sync::Mutex;

use crate::api::{ApiError, Resource};

/// What the list area should show while a fetch is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    /// Nothing to show yet: full-page loading message.
    Loading,
    /// A previous result, items or empty state, stays visible under a
    /// dimmed overlay.
    Refreshing,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmptyState {
    NoItems,
    NoMatches { query: String },
}

impl EmptyState {
    pub fn headline(&self, resource: Resource) -> String {
        match (self, resource) {
            (EmptyState::NoItems, Resource::Projects) => "No projects yet".to_string(),
            (EmptyState::NoItems, Resource::Stash) => "Your stash is empty".to_string(),
            (EmptyState::NoMatches { query }, Resource::Projects) => {
                format!("No projects found for \"{query}\"")
            }
            (EmptyState::NoMatches { query }, Resource::Stash) => {
                format!("No items found for \"{query}\"")
            }
        }
    }

    pub fn hint(&self, resource: Resource) -> &'static str {
        match (self, resource) {
            (EmptyState::NoItems, Resource::Projects) => {
                "Get started by creating your first project!"
            }
            (EmptyState::NoItems, Resource::Stash) => {
                "Start tracking your yarn, fabric, and tools!"
            }
            (EmptyState::NoMatches { .. }, _) => "Try a different search term",
        }
    }
}

/// Identifies one issued fetch. Only the latest ticket may update the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Client-rendered list fed by a list endpoint.
#[derive(Debug)]
pub struct ListView<T> {
    items: Vec<T>,
    state: LoadState,
    /// Query the shown items were fetched with.
    query: Option<String>,
    /// Query of the latest issued fetch.
    pending_query: Option<String>,
    /// Set once any fetch has finished.
    loaded: bool,
    issued: u64,
}

impl<T> Default for ListView<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            state: LoadState::Idle,
            query: None,
            pending_query: None,
            loaded: false,
            issued: 0,
        }
    }
}

impl<T> ListView<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    /// A fetch for `query` is about to start. The first fetch is `Loading`;
    /// every later one is `Refreshing`, whatever the previous one returned.
    pub fn begin(&mut self, query: Option<String>) -> Ticket {
        self.issued += 1;
        self.pending_query = query.filter(|q| !q.is_empty());
        self.state = if self.loaded {
            LoadState::Refreshing
        } else {
            LoadState::Loading
        };
        Ticket(self.issued)
    }

    /// Apply a finished fetch. Returns `false` when a newer fetch has been
    /// issued since, in which case the result is dropped. Failures keep the
    /// current items.
    pub fn finish(&mut self, ticket: Ticket, result: Result<Vec<T>, ApiError>) -> bool {
        if ticket.0 != self.issued {
            tracing::debug!(
                ticket = ticket.0,
                latest = self.issued,
                "Dropping stale list response"
            );
            return false;
        }
        match result {
            Ok(items) => {
                self.items = items;
                self.query = self.pending_query.take();
            }
            Err(e) => tracing::warn!("Failed to fetch list items: {e}"),
        }
        self.loaded = true;
        self.state = LoadState::Idle;
        true
    }

    /// Shown instead of the grid whenever a fetch has finished and there is
    /// nothing to list, including while a refresh is in flight.
    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.state == LoadState::Loading || !self.items.is_empty() {
            return None;
        }
        Some(match &self.query {
            Some(query) => EmptyState::NoMatches {
                query: query.clone(),
            },
            None => EmptyState::NoItems,
        })
    }
}

/// Run one fetch against a shared view. The lock is not held while the
/// request is in flight, so overlapping fetches are possible; the last one
/// issued wins.
pub async fn load<T, F, Fut>(view: &Mutex<ListView<T>>, query: Option<String>, fetch: F) -> bool
where
    F: FnOnce(Option<String>) -> Fut,
    Fut: Future<Output = Result<Vec<T>, ApiError>>,
{
    let ticket = view.lock().await.begin(query.clone());
    let result = fetch(query).await;
    view.lock().await.finish(ticket, result)
}
