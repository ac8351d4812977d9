use crate::utils::token::generate_auth_token;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account that owns visualizations or views them through a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub username: String,
    #[serde(default)]
    pub organization_id: Option<String>,
    /// Tokens a private embed hands to the client when this user views it.
    #[serde(default)]
    pub auth_tokens: Vec<String>,
}

impl User {
    /// Creates a user with a freshly issued auth token.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            username: username.into(),
            organization_id: None,
            auth_tokens: vec![generate_auth_token()],
        }
    }

    pub fn with_organization(mut self, organization_id: impl Into<String>) -> Self {
        self.organization_id = Some(organization_id.into());
        self
    }

    pub fn get_auth_tokens(&self) -> &[String] {
        &self.auth_tokens
    }

    pub fn belongs_to(&self, organization_id: &str) -> bool {
        self.organization_id.as_deref() == Some(organization_id)
    }
}
