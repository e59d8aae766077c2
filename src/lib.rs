//! Edge service for a statically generated marketing site.
//!
//! Canonicalizes trailing-slash URLs with permanent redirects, serves the
//! generated site, and relays newsletter signups to an email provider.

pub mod api;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod newsletter;
pub mod observability;
pub mod routing;

pub use config::SiteConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
