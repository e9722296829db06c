//! HTTP client used for release metadata lookups and artifact downloads.

mod client;

pub use client::HttpClient;
