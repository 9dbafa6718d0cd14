//! Per-client request limiting.
//!
//! A fixed window counter per client address, checked by
//! `core::middleware::rate_limit_middleware` before any route runs.

pub mod services;

pub use services::{RateLimitDecision, RateLimitService};
