//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → matcher.rs (evaluate skip rules)
//!     → skipped: pass through untouched
//!     → not skipped: candidate for trailing-slash normalization
//!
//! Rule Compilation (at startup):
//!     NormalizeConfig
//!     → extension + prefix matchers
//!     → Freeze as immutable SkipPatterns
//! ```
//!
//! # Design Decisions
//! - Rules compiled at startup, immutable at runtime
//! - No regex in hot path (suffix and prefix checks only)
//! - Deterministic: same path always gets the same answer

pub mod matcher;

pub use matcher::{ExtensionMatcher, Matcher, PathPrefixMatcher, SkipPatterns};
