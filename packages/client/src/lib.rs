//! Client-side logic for CraftyKeep: a typed HTTP client plus the view
//! models behind the search box, list pages, delete button and navigation
//! bar. Rendering is left to the host; everything here is plain state and
//! async drivers.

pub mod api;
pub mod delete;
pub mod list;
pub mod nav;
pub mod search;

pub use api::{Api, ApiClient, ApiError, Resource};

use url::Url;

/// Browser-style navigation the view models drive.
pub trait Navigator: Send + Sync {
    /// The URL currently displayed.
    fn current(&self) -> Url;

    /// Push a history entry. `target` is resolved against [`Navigator::current`],
    /// so both `/stash` and `?q=yarn` work.
    fn push(&self, target: &str);

    /// Re-fetch data for the current route.
    fn refresh(&self);
}

/// Blocking, user-visible message.
pub trait Alerter: Send + Sync {
    fn alert(&self, message: &str);
}
