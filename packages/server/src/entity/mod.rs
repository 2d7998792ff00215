pub mod project;
pub mod stash_item;
pub mod user;
