use serde::{Deserialize, Serialize};

use crate::blog::AuthorRef;

/// Identifier of a user account as issued by the API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Admin => f.write_str("admin"),
        }
    }
}

/// Opaque bearer token. Never printed in full.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthToken(***)")
    }
}

/// The authenticated user's identity and bearer token.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub user_id: UserId,
    pub display_name: String,
    pub email: String,
    pub role: Role,
    pub token: AuthToken,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Whether this user may edit or delete a blog by the given author.
    /// The API enforces this too; the client only uses it to gate the edit path.
    pub fn can_edit(&self, author: Option<&AuthorRef>) -> bool {
        self.is_admin() || author.is_some_and(|a| a.id == self.user_id)
    }
}

/// Login form input.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Registration form input, including the confirmation field that never
/// leaves the client.
#[derive(Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session(role: Role) -> Session {
        Session {
            user_id: UserId("u1".to_string()),
            display_name: "Ada".to_string(),
            email: "ada@blog.com".to_string(),
            role,
            token: AuthToken::new("secret"),
        }
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = AuthToken::new("very-secret");
        assert_eq!(format!("{:?}", token), "AuthToken(***)");

        let creds = Credentials::new("a@b.c", "hunter22");
        assert!(!format!("{:?}", creds).contains("hunter22"));
    }

    #[test]
    fn test_can_edit_own_blog() {
        let s = session(Role::User);
        let own = AuthorRef {
            id: UserId("u1".to_string()),
            name: None,
        };
        let other = AuthorRef {
            id: UserId("u2".to_string()),
            name: None,
        };

        assert!(s.can_edit(Some(&own)));
        assert!(!s.can_edit(Some(&other)));
        assert!(!s.can_edit(None));
    }

    #[test]
    fn test_admin_can_edit_anything() {
        let s = session(Role::Admin);
        let other = AuthorRef {
            id: UserId("u2".to_string()),
            name: None,
        };
        assert!(s.can_edit(Some(&other)));
        assert!(s.can_edit(None));
    }

    #[test]
    fn test_role_serde() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        let role: Role = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, Role::User);
    }
}
