/// The signed-in user: the username and the ID token sent with every request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub id_token: String,
}

impl Session {
    pub fn new(username: impl Into<String>, id_token: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            id_token: id_token.into(),
        }
    }

    /// Whether `candidate` names the signed-in user. Only gates what the UI
    /// offers; the server checks ownership itself.
    pub fn is_owner(&self, candidate: &str) -> bool {
        self.username == candidate
    }
}

/// Ownership against an optional session: never an owner when signed out.
pub fn is_owner(session: Option<&Session>, candidate: &str) -> bool {
    session.is_some_and(|session| session.is_owner(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_owner() {
        let session = Session::new("alice", "token");
        assert!(is_owner(Some(&session), "alice"));
        assert!(!is_owner(Some(&session), "bob"));
        assert!(!is_owner(Some(&session), "Alice"));
        assert!(!is_owner(None, "alice"));
    }
}
