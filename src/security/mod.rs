//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → headers.rs (outer layer, stamps security response headers)
//!     → rate_limit.rs (admission check for /api/ paths)
//!     → Pass to route handlers
//! ```
//!
//! # Design Decisions
//! - Admission runs before any business logic; a rejected request never
//!   reaches a handler
//! - Fail closed on the limit, pass through everywhere else

pub mod headers;
pub mod rate_limit;

pub use rate_limit::{Decision, RateLimiter};
