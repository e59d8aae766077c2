//! Path matching rules for the trailing-slash filter.
//!
//! # Responsibilities
//! - Match file-extension-like suffixes (`/style.css`, `/feed.xml`)
//! - Match path prefixes (case-sensitive)
//! - Combine rules with OR semantics into a skip set
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - No regex, matching is a single scan of the path
//! - Rules are compiled once at startup and shared read-only

use crate::config::NormalizeConfig;

/// Trait for matching a request path against a condition.
pub trait Matcher: Send + Sync + std::fmt::Debug {
    /// Returns true if the path matches this condition.
    fn matches(&self, path: &str) -> bool;
}

/// Matches paths ending in `.` followed by one or more ASCII alphanumerics.
///
/// Trailing slashes are ignored, so `/style.css/` still counts as a file.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtensionMatcher;

impl Matcher for ExtensionMatcher {
    fn matches(&self, path: &str) -> bool {
        let trimmed = path.trim_end_matches('/');
        match trimmed.rsplit_once('.') {
            Some((_, ext)) => !ext.is_empty() && ext.bytes().all(|b| b.is_ascii_alphanumeric()),
            None => false,
        }
    }
}

/// Matches the request path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Matcher for PathPrefixMatcher {
    fn matches(&self, path: &str) -> bool {
        path.starts_with(&self.prefix)
    }
}

/// Ordered set of rules exempting a path from normalization.
///
/// Any single match is enough to skip.
#[derive(Debug)]
pub struct SkipPatterns {
    matchers: Vec<Box<dyn Matcher>>,
}

impl SkipPatterns {
    pub fn new(matchers: Vec<Box<dyn Matcher>>) -> Self {
        Self { matchers }
    }

    /// Build the rule set: extension suffix, internal prefix, API prefix.
    pub fn from_config(config: &NormalizeConfig) -> Self {
        let mut matchers: Vec<Box<dyn Matcher>> = Vec::with_capacity(3);
        if config.skip_extensions {
            matchers.push(Box::new(ExtensionMatcher));
        }
        for prefix in [&config.internal_prefix, &config.api_prefix] {
            if !prefix.is_empty() {
                matchers.push(Box::new(PathPrefixMatcher::new(prefix.clone())));
            }
        }
        Self::new(matchers)
    }

    pub fn should_skip(&self, path: &str) -> bool {
        self.matchers.iter().any(|m| m.matches(path))
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }
}

impl Default for SkipPatterns {
    fn default() -> Self {
        Self::from_config(&NormalizeConfig::default())
    }
}
