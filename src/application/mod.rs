//! Application services layer.

pub mod content;
pub mod error;
pub mod fetcher;
pub mod store;
pub mod view;
