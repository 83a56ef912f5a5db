// gate/mod.rs - Tenant authorization for proxied controller API calls
//
// Every request under the proxy mount passes through one of the predicates
// below before anything is sent upstream. Super-users bypass all checks;
// everyone else is confined to the network IDs carried by their session.

pub mod caller;
pub mod filter;

pub use caller::AuthenticatedCaller;
pub use filter::{fallback_engaged, filter_network_ids, filter_network_list_response, ListFilterError};

use axum::http::Method;

/// Outcome of an authorization check. Computed per request, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }
}

impl From<bool> for Decision {
    fn from(allowed: bool) -> Self {
        if allowed {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }
}

/// Decide whether `caller` may act on `requested_network_id`.
///
/// Exact membership is tried first. Controller network IDs are sometimes
/// stored with inconsistent casing, so a lowercased comparison follows as a
/// compatibility shim until the controller normalizes them.
pub fn authorize_network_scoped_request(
    caller: &AuthenticatedCaller,
    requested_network_id: &str,
) -> Decision {
    if caller.is_super_user {
        return Decision::Allow;
    }

    if caller.network_ids.iter().any(|id| id == requested_network_id) {
        return Decision::Allow;
    }

    let requested = requested_network_id.to_lowercase();
    caller
        .network_ids
        .iter()
        .any(|id| id.to_lowercase() == requested)
        .into()
}

/// Single-network route family (`/magma/networks/:networkID/...`).
/// Applied to every verb, not just reads.
pub fn filter_single_network_request(
    caller: &AuthenticatedCaller,
    requested_network_id: &str,
) -> Decision {
    authorize_network_scoped_request(caller, requested_network_id)
}

/// Channel routes are read-only for everybody.
pub fn passthrough_read_only_channel(method: &Method) -> Decision {
    (method == Method::GET).into()
}
