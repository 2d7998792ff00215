//! Debounced search box that writes its value into the `q` URL parameter.
//!
//! The input never fetches anything itself. It only changes the URL, and the
//! list views react to that.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::{Instant, sleep_until};
use url::Url;

use crate::Navigator;

pub const DEBOUNCE: Duration = Duration::from_millis(300);

const QUERY_PARAM: &str = "q";

/// Current value of `q`, with "absent" and "empty" treated alike.
pub fn query_param(url: &Url) -> String {
    url.query_pairs()
        .find(|(key, _)| key == QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

/// `url` with `q` set to `value`, or removed when `value` is empty. Other
/// parameters keep their order.
pub fn with_query(url: &Url, value: &str) -> Url {
    let others: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| key != QUERY_PARAM)
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    let mut next = url.clone();
    next.set_query(None);
    if others.is_empty() && value.is_empty() {
        return next;
    }

    {
        let mut pairs = next.query_pairs_mut();
        for (key, val) in &others {
            pairs.append_pair(key, val);
        }
        if !value.is_empty() {
            pairs.append_pair(QUERY_PARAM, value);
        }
    }
    next
}

/// Path plus query, suitable for [`Navigator::push`].
fn relative(url: &Url) -> String {
    match url.query() {
        Some(query) => format!("{}?{}", url.path(), query),
        None => url.path().to_string(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchState {
    /// The value mirrors the URL.
    Idle,
    /// The value diverges from the URL and the debounce timer is running.
    Pending,
}

/// Synchronous core of the search box.
#[derive(Debug, Clone)]
pub struct SearchInput {
    value: String,
    url_value: String,
    state: SearchState,
}

impl SearchInput {
    pub fn new(url: &Url) -> Self {
        let q = query_param(url);
        Self {
            value: q.clone(),
            url_value: q,
            state: SearchState::Idle,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn state(&self) -> SearchState {
        self.state
    }

    /// A keystroke. The caller (re)arms the debounce timer.
    pub fn on_input(&mut self, value: impl Into<String>) {
        self.value = value.into();
        self.state = SearchState::Pending;
    }

    /// The debounce timer fired. Returns the value to write into the URL, or
    /// `None` when the URL already holds it.
    pub fn on_timer(&mut self) -> Option<String> {
        if self.state != SearchState::Pending {
            return None;
        }
        self.state = SearchState::Idle;
        if self.value == self.url_value {
            return None;
        }
        self.url_value = self.value.clone();
        Some(self.value.clone())
    }

    /// The URL changed underneath us (back/forward). The URL wins.
    pub fn sync_from_url(&mut self, url: &Url) {
        let q = query_param(url);
        if q != self.value {
            self.value = q.clone();
        }
        self.url_value = q;
        self.state = SearchState::Idle;
    }
}

pub enum SearchEvent {
    /// The user typed; carries the full field value.
    Input(String),
    /// History navigation changed the URL.
    UrlChanged,
}

/// Drive a [`SearchInput`] from `events`, pushing at most one URL per quiet
/// period of [`DEBOUNCE`]. Returns when the sender is dropped; a timer still
/// running at that point is cancelled.
pub async fn run_debounced<N>(navigator: &N, mut events: mpsc::Receiver<SearchEvent>) -> SearchInput
where
    N: Navigator + ?Sized,
{
    let mut input = SearchInput::new(&navigator.current());
    let mut deadline: Option<Instant> = None;

    loop {
        let timer = async move {
            match deadline {
                Some(at) => sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            event = events.recv() => match event {
                Some(SearchEvent::Input(value)) => {
                    input.on_input(value);
                    deadline = Some(Instant::now() + DEBOUNCE);
                }
                Some(SearchEvent::UrlChanged) => {
                    input.sync_from_url(&navigator.current());
                    deadline = None;
                }
                None => break,
            },
            _ = timer => {
                deadline = None;
                // Re-read the URL: another component may have navigated.
                let current = navigator.current();
                input.url_value = query_param(&current);
                if let Some(q) = input.on_timer() {
                    tracing::debug!(q = %q, "Search query committed");
                    navigator.push(&relative(&with_query(&current, &q)));
                }
            }
        }
    }

    input
}
