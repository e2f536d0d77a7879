//! Account store and identity resolution.
//!
//! The lookup hierarchy is:
//! 1. The record matching the requested key (explicit, or extracted from
//!    the repository's remote URL)
//! 2. Per-field fallback to the reserved `default` record for name/email
//!
//! Tokens never fall back across accounts; see [`resolver`].

pub mod resolver;
pub mod store;

pub use resolver::{resolve, ResolutionRequest, ResolutionResult};
pub use store::{AccountRecord, AccountStore};
