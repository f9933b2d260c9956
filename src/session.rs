use crate::document::AuthToken;

/// Authentication context for one logged-in user.
///
/// Passed explicitly to every API call; nothing reads the token from global state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
    email: String,
    user_id: Option<u64>,
}

impl Session {
    pub fn new(token: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            email: email.into(),
            user_id: None,
        }
    }

    /// Build a session from a login response. The server's email wins over the
    /// one typed in the form when present.
    pub fn from_auth(auth: AuthToken, login_email: &str) -> Self {
        Self {
            email: auth.email.unwrap_or_else(|| login_email.to_string()),
            token: auth.token,
            user_id: auth.user_id,
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn user_id(&self) -> Option<u64> {
        self.user_id
    }

    /// Value of the `Authorization` header
    pub fn authorization(&self) -> String {
        format!("Token {}", self.token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_authorization_header() {
        let session = Session::new("test-token", "me@example.com");
        assert_eq!(session.authorization(), "Token test-token");
    }

    #[test]
    fn test_from_auth_prefers_server_email() {
        let auth: AuthToken = serde_json::from_str(
            r#"{"token": "abc", "user_id": 5, "email": "Me@Example.com", "last_login": null}"#,
        )
        .unwrap();
        let session = Session::from_auth(auth, "me@example.com");
        assert_eq!(session.email(), "Me@Example.com");
        assert_eq!(session.user_id(), Some(5));
        assert_eq!(session.token(), "abc");
    }

    #[test]
    fn test_from_auth_falls_back_to_login_email() {
        let auth: AuthToken = serde_json::from_str(r#"{"token": "abc"}"#).unwrap();
        let session = Session::from_auth(auth, "me@example.com");
        assert_eq!(session.email(), "me@example.com");
        assert!(session.user_id().is_none());
    }
}
