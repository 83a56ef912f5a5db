// Response filtering for the list-networks route.

use std::collections::HashSet;

use axum::body::Bytes;
use axum::http::StatusCode;
use thiserror::Error;

use super::AuthenticatedCaller;

#[derive(Debug, Error)]
pub enum ListFilterError {
    #[error("upstream network list is not a JSON array of strings: {0}")]
    NotAStringArray(#[from] serde_json::Error),
}

/// Caller's own IDs, in caller order, that the upstream still reports.
///
/// Membership is exact: IDs the caller is entitled to but the upstream no
/// longer lists are dropped, and so is anything the caller is not entitled to.
pub fn filter_network_ids(caller: &AuthenticatedCaller, upstream_ids: &[String]) -> Vec<String> {
    if caller.is_super_user {
        return upstream_ids.to_vec();
    }

    let reported: HashSet<&str> = upstream_ids.iter().map(String::as_str).collect();
    caller
        .network_ids
        .iter()
        .filter(|id| reported.contains(id.as_str()))
        .cloned()
        .collect()
}

/// Filter a raw list-networks body for `caller`.
///
/// Super-users get the upstream bytes untouched. For everyone else the body
/// must parse as an array of strings; anything else is refused so no
/// unexamined IDs slip through.
pub fn filter_network_list_response(
    caller: &AuthenticatedCaller,
    upstream_body: Bytes,
) -> Result<Bytes, ListFilterError> {
    if caller.is_super_user {
        return Ok(upstream_body);
    }

    let upstream_ids: Vec<String> = serde_json::from_slice(&upstream_body)?;
    let filtered = filter_network_ids(caller, &upstream_ids);
    Ok(Bytes::from(serde_json::to_vec(&filtered)?))
}

/// True when a failed list-networks call should be replaced by the static
/// fallback list. Only 401/403 qualify, and only with a non-empty list.
pub fn fallback_engaged(status: StatusCode, fallback: &[String]) -> bool {
    !fallback.is_empty() && matches!(status, StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
}
