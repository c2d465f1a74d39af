//! Skypulse - a terminal dashboard for Bluesky post analytics
//!
//! The binary is a thin wrapper; pages, fetching and the API client all
//! live in the library.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod event;
pub mod feeds;
pub mod logging;
pub mod ui;

#[cfg(test)]
mod test_utils;

pub use app::App;
pub use config::Config;
