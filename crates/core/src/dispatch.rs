//! Account-scoped command dispatch for the `gh` wrapper.
//!
//! [`dispatch`] is a pure function: it inspects the argument list and the
//! store, and returns the arguments to forward plus the token to inject (if
//! any). It performs no I/O and spawns nothing; the caller runs the
//! downstream tool with the returned plan, which keeps this trivially
//! testable.

use std::fmt;

use tracing::debug;

use crate::account::store::AccountStore;

/// The outcome of dispatching: what to run the downstream tool with.
#[derive(Clone, PartialEq, Eq)]
pub struct DispatchPlan {
    /// Arguments to forward, with the leading account key removed when one
    /// was consumed.
    pub effective_args: Vec<String>,
    /// Token to inject as the ambient credential. `None` means "no
    /// override": the downstream tool's own credential resolution applies.
    pub token: Option<String>,
}

impl fmt::Debug for DispatchPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchPlan")
            .field("effective_args", &self.effective_args)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Split an optional leading account key off `args`.
///
/// When `args[0]` names a store record with a non-empty token, that first
/// argument is consumed and the token returned alongside the remainder.
/// Otherwise the arguments pass through untouched with no token override.
pub fn dispatch(args: &[String], store: &AccountStore) -> DispatchPlan {
    if let Some(first) = args.first() {
        let token = store
            .get(first)
            .and_then(|r| r.token.as_deref())
            .filter(|t| !t.is_empty());
        if let Some(token) = token {
            debug!(key = %first, "dispatching with account token override");
            return DispatchPlan {
                effective_args: args[1..].to_vec(),
                token: Some(token.to_string()),
            };
        }
    }

    debug!("no leading account key matched, using ambient credentials");
    DispatchPlan {
        effective_args: args.to_vec(),
        token: None,
    }
}
