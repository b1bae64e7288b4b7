//! Research assistant service library.
//!
//! The binary in `main.rs` wires these modules together; integration tests
//! drive them directly.

pub mod chat;
pub mod cite;
pub mod compose;
pub mod config;
pub mod error;
pub mod llm;
pub mod logger;
pub mod search;
pub mod session;
pub mod speech;
pub mod summarize;
pub mod web;
