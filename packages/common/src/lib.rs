pub mod api;
pub mod config;
pub mod storage;

pub use api::{DeleteResponse, Project, SessionResponse, SessionUser, StashItem};
