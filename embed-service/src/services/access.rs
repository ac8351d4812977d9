//! Embed access decision.
//!
//! Decides whether a visualization may be rendered for a requester and which
//! auth tokens the rendered page carries. Pure: the same inputs always yield
//! the same decision.

use crate::models::{Privacy, Requester, User, Visualization};

/// Why an embed was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenialReason {
    /// Private visualization and the requester has no sharing access.
    Private,
    /// Password-protected visualization requested without a password.
    PasswordRequired,
    /// Password-protected visualization and the supplied password is wrong.
    InvalidPassword,
}

impl DenialReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            DenialReason::Private => "private",
            DenialReason::PasswordRequired => "password_required",
            DenialReason::InvalidPassword => "invalid_password",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessDecision {
    /// Render the embed. An empty token list means no tokens reach the page.
    Granted { auth_tokens: Vec<String> },
    Denied(DenialReason),
}

impl AccessDecision {
    pub fn is_granted(&self) -> bool {
        matches!(self, AccessDecision::Granted { .. })
    }

    /// Metric label for this outcome.
    pub fn outcome(&self) -> &'static str {
        match self {
            AccessDecision::Granted { .. } => "granted",
            AccessDecision::Denied(reason) => reason.as_str(),
        }
    }
}

/// Decide access to `visualization` for `requester`.
///
/// `supplied_password` is `None` unless the requester submitted the password
/// form. It is ignored for every privacy state except `Protected`.
pub fn decide(
    visualization: &Visualization,
    requester: &Requester,
    supplied_password: Option<&str>,
) -> AccessDecision {
    match visualization.privacy {
        Privacy::Public | Privacy::Link => AccessDecision::Granted {
            auth_tokens: Vec::new(),
        },
        Privacy::Private => match requester.user() {
            Some(user) if can_view_private(visualization, user) => AccessDecision::Granted {
                auth_tokens: user.get_auth_tokens().to_vec(),
            },
            _ => AccessDecision::Denied(DenialReason::Private),
        },
        Privacy::Protected => match supplied_password {
            None => AccessDecision::Denied(DenialReason::PasswordRequired),
            Some(password) if visualization.password_valid(password) => {
                AccessDecision::Granted {
                    auth_tokens: visualization.get_auth_tokens().to_vec(),
                }
            }
            Some(_) => AccessDecision::Denied(DenialReason::InvalidPassword),
        },
    }
}

/// Private embeds only exist inside an organization. The owner may always
/// view them and does not need to be a member of that organization; other
/// viewers must be members and need an explicit share.
fn can_view_private(visualization: &Visualization, user: &User) -> bool {
    let Some(organization_id) = visualization.organization_id.as_deref() else {
        return false;
    };

    visualization.is_owned_by(&user.id)
        || (user.belongs_to(organization_id) && visualization.is_shared_with(&user.id))
}
