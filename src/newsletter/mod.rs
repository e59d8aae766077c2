//! Newsletter signup relay.
//!
//! # Data Flow
//! ```text
//! POST /api/newsletter {"email": ...}
//!     → email.rs (shape check)
//!     → provider.rs (single upstream call)
//!     → ApiResponse (200 / 400 / 500)
//! ```

pub mod email;
pub mod error;
pub mod provider;

pub use email::is_valid_email;
pub use error::{RelayError, RelayResult};
pub use provider::Provider;
