//! User accounts and login exchange responses.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account role, as issued by the backend.
///
/// The wire value is a free-form string; anything other than the two known
/// roles deserializes to `Unprivileged` so new or misconfigured roles get no
/// capabilities by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Agent,
    #[default]
    #[serde(other)]
    Unprivileged,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn is_agent(&self) -> bool {
        matches!(self, Role::Agent)
    }
}

/// A backend user record.
///
/// The identity-introspection endpoint returns a narrower record than the
/// login exchange or the admin user list, so everything beyond `email` and
/// `role` is optional.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    #[serde(default)]
    pub user_id: Option<i64>,
    pub email: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Role,
    #[serde(default)]
    pub profile_picture: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

/// Successful login exchange payload.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parses_known_values() {
        assert_eq!(serde_json::from_str::<Role>("\"admin\"").unwrap(), Role::Admin);
        assert_eq!(serde_json::from_str::<Role>("\"agent\"").unwrap(), Role::Agent);
    }

    #[test]
    fn test_role_unknown_is_unprivileged() {
        assert_eq!(
            serde_json::from_str::<Role>("\"superuser\"").unwrap(),
            Role::Unprivileged
        );
        assert_eq!(serde_json::from_str::<Role>("\"\"").unwrap(), Role::Unprivileged);
    }

    #[test]
    fn test_parse_login_response() {
        let json = r#"{
            "access_token": "tok123",
            "token_type": "bearer",
            "user": {
                "user_id": 7,
                "email": "jane@example.com",
                "name": "Jane",
                "role": "admin",
                "profile_picture": null,
                "created_at": "2024-01-05T10:00:00Z",
                "last_login": null
            }
        }"#;

        let resp: LoginResponse = serde_json::from_str(json).expect("parse login response");
        assert_eq!(resp.access_token, "tok123");
        assert_eq!(resp.user.role, Role::Admin);
        assert_eq!(resp.user.name.as_deref(), Some("Jane"));
    }

    #[test]
    fn test_parse_introspection_record() {
        // /auth/me returns only the token claims' view of the user
        let json = r#"{"email": "a@b.com", "user_id": 3, "role": "agent"}"#;
        let user: User = serde_json::from_str(json).expect("parse user");
        assert_eq!(user.role, Role::Agent);
        assert!(user.name.is_none());
    }
}
