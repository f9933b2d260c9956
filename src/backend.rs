//! Talking to the document server: the HTTP client and the background worker
//! that keeps its blocking calls off the UI thread.

pub mod api_client;
pub mod worker;
