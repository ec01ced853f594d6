//! User configuration and the list of known vaults.

pub mod bookmarks;
pub mod settings;

pub use bookmarks::{Bookmark, Bookmarks};
pub use settings::Settings;
