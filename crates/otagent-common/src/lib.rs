//! otagent-common — Shared error types and the sandboxed HTTP client used across all otagent crates.

pub mod error;
pub mod sandbox;

pub use error::{OtError, Result};
pub use sandbox::SandboxClient;
