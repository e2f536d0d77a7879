//! gitacct core library.
//!
//! This crate provides the foundational components for per-repository Git
//! identity and credential switching: the flat-file account store, GitHub
//! remote owner extraction, identity resolution with default fallback, the
//! account-scoped command dispatcher, and repository-local config glue.

pub mod account;
pub mod config;
pub mod dispatch;
pub mod errors;
pub mod git;

// Re-exports for convenience.
pub use account::resolver::{resolve, ResolutionRequest, ResolutionResult};
pub use account::store::{AccountRecord, AccountStore};
pub use dispatch::{dispatch, DispatchPlan};
pub use errors::CoreError;
pub use git::local::LocalRepo;
pub use git::owner::extract_owner;
