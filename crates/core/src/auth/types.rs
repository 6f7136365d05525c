use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::net::IpAddr;

/// Request information for authentication
#[derive(Debug, Clone)]
pub struct AuthRequest {
    /// Header names are lowercased.
    pub headers: HashMap<String, String>,
    pub source_ip: IpAddr,
}

impl AuthRequest {
    /// Bearer credential from `Authorization: Bearer <t>` or `X-API-Key: <t>`.
    pub fn bearer_token(&self) -> Option<&str> {
        if let Some(value) = self.headers.get("authorization") {
            let token = value
                .strip_prefix("Bearer ")
                .or_else(|| value.strip_prefix("bearer "));
            if let Some(token) = token {
                return Some(token.trim());
            }
        }

        self.headers.get("x-api-key").map(|v| v.trim())
    }
}

/// The principal attached to an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Helpdesk user behind the credential; `None` for anonymous access.
    pub user_id: Option<i64>,
    pub method: String,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self {
            user_id: None,
            method: "none".to_string(),
        }
    }

    pub fn user(user_id: i64, method: impl Into<String>) -> Self {
        Self {
            user_id: Some(user_id),
            method: method.into(),
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.user_id.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(headers: &[(&str, &str)]) -> AuthRequest {
        AuthRequest {
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_lowercase(), v.to_string()))
                .collect(),
            source_ip: "127.0.0.1".parse().unwrap(),
        }
    }

    #[test]
    fn test_anonymous_identity() {
        let identity = Identity::anonymous();
        assert!(identity.is_anonymous());
        assert_eq!(identity.method, "none");
    }

    #[test]
    fn test_identity_serialization() {
        let identity = Identity::user(42, "token");
        let json = serde_json::to_value(&identity).unwrap();
        assert_eq!(json["user_id"], 42);
        assert_eq!(json["method"], "token");

        let anonymous = serde_json::to_value(Identity::anonymous()).unwrap();
        assert!(anonymous["user_id"].is_null());
    }

    #[test]
    fn test_bearer_token_sources() {
        assert_eq!(
            request(&[("Authorization", "Bearer abc")]).bearer_token(),
            Some("abc")
        );
        assert_eq!(
            request(&[("Authorization", "bearer abc")]).bearer_token(),
            Some("abc")
        );
        assert_eq!(request(&[("X-API-Key", "xyz")]).bearer_token(), Some("xyz"));
        assert_eq!(request(&[("Authorization", "Basic Zm9v")]).bearer_token(), None);
        assert_eq!(request(&[]).bearer_token(), None);
    }
}
