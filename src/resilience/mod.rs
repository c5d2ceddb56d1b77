//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Request to upstream:
//!     → timeouts.rs (deadline fixed on arrival)
//!     → send bounded by the deadline
//!     → body relay bounded by the same deadline
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every upstream exchange has a deadline
//! - No retries: one forwarding attempt per inbound request

pub mod timeouts;

pub use timeouts::Deadline;
