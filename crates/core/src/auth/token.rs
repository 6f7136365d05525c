//! Static bearer token authentication.

use async_trait::async_trait;

use super::{AuthError, AuthRequest, Authenticator, Identity};
use crate::config::TokenGrant;

/// Authenticator that maps configured bearer tokens to helpdesk users.
///
/// Token issuance lives outside this service; operators list the accepted
/// tokens in `[[auth.tokens]]`.
pub struct TokenAuthenticator {
    grants: Vec<TokenGrant>,
}

impl TokenAuthenticator {
    pub fn new(grants: Vec<TokenGrant>) -> Self {
        Self { grants }
    }

    fn lookup(&self, provided: &str) -> Option<i64> {
        // Every grant is compared so the scan time does not depend on which one matched.
        let mut found = None;
        for grant in &self.grants {
            if constant_time_eq(provided.as_bytes(), grant.token.as_bytes()) {
                found = Some(grant.user_id);
            }
        }
        found
    }
}

#[async_trait]
impl Authenticator for TokenAuthenticator {
    async fn authenticate(&self, request: &AuthRequest) -> Result<Identity, AuthError> {
        let provided = request.bearer_token().ok_or(AuthError::NotAuthenticated)?;

        match self.lookup(provided) {
            Some(user_id) => Ok(Identity::user(user_id, self.method_name())),
            None => Err(AuthError::InvalidCredentials("Unknown token".to_string())),
        }
    }

    fn method_name(&self) -> &'static str {
        "token"
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
