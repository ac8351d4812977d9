use super::User;

/// Who is asking for an embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requester {
    Anonymous,
    Authenticated(User),
}

impl Requester {
    pub fn user(&self) -> Option<&User> {
        match self {
            Requester::Anonymous => None,
            Requester::Authenticated(user) => Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }
}
