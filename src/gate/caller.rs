use crate::auth::Claims;

/// Caller identity established by the session layer before the gate runs.
/// Immutable for the duration of one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthenticatedCaller {
    pub subject: String,
    pub organization: Option<String>,
    pub is_super_user: bool,
    /// Allowed network IDs, in session order, without duplicates.
    pub network_ids: Vec<String>,
}

impl AuthenticatedCaller {
    pub fn new(
        subject: impl Into<String>,
        is_super_user: bool,
        network_ids: impl IntoIterator<Item = String>,
    ) -> Self {
        let mut ids: Vec<String> = Vec::new();
        for id in network_ids {
            if !ids.contains(&id) {
                ids.push(id);
            }
        }

        Self {
            subject: subject.into(),
            organization: None,
            is_super_user,
            network_ids: ids,
        }
    }

    pub fn with_organization(mut self, organization: impl Into<String>) -> Self {
        self.organization = Some(organization.into());
        self
    }
}

impl From<Claims> for AuthenticatedCaller {
    fn from(claims: Claims) -> Self {
        let caller = Self::new(claims.sub, claims.is_super_user, claims.network_ids);
        match claims.org {
            Some(org) => caller.with_organization(org),
            None => caller,
        }
    }
}
