//! Docstore - a document storage service with per-user access control
//!
//! Stores JSON and binary documents behind owner/public/grant
//! authorization, fronted by a fixed-capacity LFU cache.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod service;
pub mod storage;

pub use api::AppState;
pub use config::Config;
