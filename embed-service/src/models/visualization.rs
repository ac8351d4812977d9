use super::Privacy;
use crate::utils::password::{hash_password, verify_password, Password, PasswordHashString};
use crate::utils::token::generate_auth_token;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Visualization {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub privacy: Privacy,
    /// Argon2 PHC string. The plaintext is never stored.
    pub password_hash: Option<String>,
    /// Tokens handed to clients that unlocked a password-protected embed.
    #[serde(default)]
    pub auth_tokens: Vec<String>,
    pub user_id: String,
    pub organization_id: Option<String>,
    /// Users the owner shared a private visualization with.
    #[serde(default)]
    pub shared_with: Vec<String>,
    pub map_id: Option<String>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Visualization {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, privacy: Privacy) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            description: None,
            privacy,
            password_hash: None,
            auth_tokens: Vec::new(),
            user_id: user_id.into(),
            organization_id: None,
            shared_with: Vec::new(),
            map_id: Some(Uuid::new_v4().to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_organization(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    pub fn with_auth_tokens(mut self, tokens: Vec<String>) -> Self {
        self.auth_tokens = tokens;
        self
    }

    pub fn share_with(mut self, user_id: impl Into<String>) -> Self {
        self.shared_with.push(user_id.into());
        self
    }

    /// Stores the hash of `password` and issues a new auth token for clients
    /// that unlock the visualization with it.
    pub fn set_password(&mut self, password: &Password) -> Result<(), anyhow::Error> {
        let hash = hash_password(password)?;
        self.password_hash = Some(hash.into_string());
        self.auth_tokens.push(generate_auth_token());
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn has_password(&self) -> bool {
        self.password_hash.is_some()
    }

    /// Exact, case-sensitive check of `candidate` against the stored hash.
    /// Always false when no password is set.
    pub fn password_valid(&self, candidate: &str) -> bool {
        let Some(hash) = &self.password_hash else {
            return false;
        };

        let password = Password::new(candidate.to_string());
        let hash = PasswordHashString::new(hash.clone());
        match verify_password(&password, &hash) {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(visualization_id = %self.id, error = %e, "Password check failed");
                false
            }
        }
    }

    /// True when the visualization lives inside an organization.
    pub fn organization(&self) -> bool {
        self.organization_id.is_some()
    }

    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user_id == user_id
    }

    pub fn is_shared_with(&self, user_id: &str) -> bool {
        self.shared_with.iter().any(|id| id == user_id)
    }

    pub fn get_auth_tokens(&self) -> &[String] {
        &self.auth_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_visualization_is_unlocked() {
        let viz = Visualization::new("owner", "Earthquakes", Privacy::Public);
        assert!(!viz.has_password());
        assert!(!viz.password_valid(""));
        assert!(viz.get_auth_tokens().is_empty());
        assert!(!viz.organization());
    }

    #[test]
    fn test_set_password_issues_token() {
        let mut viz = Visualization::new("owner", "Earthquakes", Privacy::Protected);
        viz.set_password(&Password::new("manolo".to_string()))
            .expect("Failed to set password");

        assert!(viz.has_password());
        assert_eq!(viz.get_auth_tokens().len(), 1);
        assert!(viz.password_valid("manolo"));
        assert!(!viz.password_valid("Manolo"));
        assert!(!viz.password_valid("manolo "));
    }

    #[test]
    fn test_sharing() {
        let viz = Visualization::new("owner", "Earthquakes", Privacy::Private)
            .with_organization("acme")
            .share_with("colleague");

        assert!(viz.organization());
        assert!(viz.is_owned_by("owner"));
        assert!(viz.is_shared_with("colleague"));
        assert!(!viz.is_shared_with("stranger"));
    }
}
