use serde::{Deserialize, Serialize};

/// Visibility policy of a visualization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Privacy {
    /// Listed and viewable by anyone.
    Public,
    /// Unlisted, viewable by anyone holding the URL.
    Link,
    /// Owner and organization members it was shared with.
    Private,
    /// Viewable after supplying the visualization password.
    #[serde(rename = "password", alias = "protected")]
    Protected,
}

impl Privacy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Privacy::Public => "public",
            Privacy::Link => "link",
            Privacy::Private => "private",
            Privacy::Protected => "password",
        }
    }
}

impl std::fmt::Display for Privacy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_serializes_as_password() {
        let json = serde_json::to_string(&Privacy::Protected).unwrap();
        assert_eq!(json, "\"password\"");
    }

    #[test]
    fn test_protected_accepts_alias() {
        let privacy: Privacy = serde_json::from_str("\"protected\"").unwrap();
        assert_eq!(privacy, Privacy::Protected);

        let privacy: Privacy = serde_json::from_str("\"password\"").unwrap();
        assert_eq!(privacy, Privacy::Protected);
    }
}
