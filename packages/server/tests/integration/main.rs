mod auth;
mod common;
mod project;
mod stash;
