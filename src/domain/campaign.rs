use derive_more::Display;
use serde::{Deserialize, Deserializer, Serialize};

/// How the backend renders the template for each recipient.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonalizationMode {
    #[display(fmt = "personalized")]
    Personalized,
    #[display(fmt = "bulk")]
    Bulk,
}

impl From<bool> for PersonalizationMode {
    fn from(personalized: bool) -> Self {
        if personalized {
            Self::Personalized
        } else {
            Self::Bulk
        }
    }
}

/// A rendered preview for one recipient.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct PersonalizedEmail {
    #[serde(deserialize_with = "address")]
    pub email: String,
    #[serde(default)]
    pub rendered_subject: Option<String>,
    pub rendered_body: String,
}

impl PersonalizedEmail {
    /// The rendered subject, or `fallback` when the backend only rendered bodies.
    pub fn subject_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        match self.rendered_subject.as_deref() {
            Some(subject) if !subject.is_empty() => subject,
            _ => fallback,
        }
    }
}

/// Some backends echo the whole recipient row in `email` instead of the bare address.
fn address<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Address {
        Plain(String),
        Row { email: String },
    }

    Ok(match Address::deserialize(deserializer)? {
        Address::Plain(email) | Address::Row { email } => email,
    })
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct SendResult {
    #[serde(default)]
    pub sent: Vec<String>,
    #[serde(default)]
    pub failed: Vec<String>,
}
