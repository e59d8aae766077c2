//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware stack)
//!     → request.rs (request ID)
//!     → normalize.rs (301 to canonical URL, or pass through)
//!     → /api/* handlers, or assets.rs (static site)
//!     → response.rs (JSON bodies for the API)
//!     → Send to client
//! ```

pub mod assets;
pub mod normalize;
pub mod request;
pub mod response;
pub mod server;

pub use normalize::{decide, Decision};
pub use request::{RequestIdExt, UuidRequestId, X_REQUEST_ID};
pub use server::HttpServer;
