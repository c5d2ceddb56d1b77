//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request target (path + query)
//!     → router.rs (ordered rule scan)
//!     → matcher.rs (evaluate the rule's operator)
//!     → Return: upstream URL (matched rule or default endpoint)
//!
//! Rule compilation (at startup):
//!     "operator:value@destination" strings
//!     → rule.rs (grammar check, pattern compilation, validation)
//!     → Freeze as immutable RuleSet
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - Deterministic: same target always resolves to the same URL
//! - First match wins (configuration order)

pub mod matcher;
pub mod router;
pub mod rule;

pub use matcher::{Matcher, Operator};
pub use router::RuleSet;
pub use rule::{Destination, Rule, RULE_FORMAT};
