use crate::config::toml_config::TokenEntry;
use crate::domain::model::Identity;
use crate::domain::ports::Authenticator;
use std::collections::HashMap;

/// Pre-issued bearer tokens from `[auth]`.
#[derive(Debug, Clone, Default)]
pub struct StaticTokenAuthenticator {
    tokens: HashMap<String, Identity>,
}

impl StaticTokenAuthenticator {
    pub fn new(entries: &[TokenEntry]) -> Self {
        let tokens = entries
            .iter()
            .map(|entry| {
                (
                    entry.token.clone(),
                    Identity {
                        id: entry.id,
                        email: entry.email.clone(),
                        username: entry.username.clone(),
                    },
                )
            })
            .collect();
        Self { tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

impl Authenticator for StaticTokenAuthenticator {
    fn authenticate(&self, token: &str) -> Option<Identity> {
        self.tokens.get(token).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_token_resolves_identity() {
        let auth = StaticTokenAuthenticator::new(&[TokenEntry {
            token: "secret-1".to_string(),
            id: 3,
            email: "meena@example.org".to_string(),
            username: "meena".to_string(),
        }]);

        let identity = auth.authenticate("secret-1").unwrap();
        assert_eq!(identity.id, 3);
        assert_eq!(identity.username, "meena");
        assert!(auth.authenticate("secret-2").is_none());
        assert!(auth.authenticate("").is_none());
    }
}
