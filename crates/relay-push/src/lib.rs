//! Outbound delivery through the LINE Messaging API push endpoint.
//!
//! A push is a single POST: no retries, no interpretation of LINE's error
//! payloads. Callers get the status code and the raw body back.

pub mod client;
pub mod error;

pub use client::{LINE_PUSH_URL, LineClient, PushOutcome};
pub use error::{PushError, Result};
