//! Doc Shell library
//!
//! Desktop client for a versioned document store: listing, upload, sharing,
//! download and side-by-side comparison of document versions.

pub mod app;
pub mod backend;
pub mod compare;
pub mod config;
pub mod constant;
pub mod diff;
pub mod document;
pub mod library;
pub mod messages;
pub mod session;
pub mod style;
pub mod ui;
