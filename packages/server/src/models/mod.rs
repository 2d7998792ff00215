pub mod auth;
pub mod project;
pub mod shared;
pub mod stash;
