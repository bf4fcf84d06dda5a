//! Showcase: a consultancy marketing site rendered from a hosted document store.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
pub mod util;
