use derive_more::Display;
use serde::{Deserialize, Serialize};
use validator::validate_email;

#[derive(Clone, Debug, Display, PartialEq, Eq, Serialize)]
#[display(fmt = "{}", _0)]
#[serde(transparent)]
pub struct Email(String);

impl TryFrom<String> for Email {
    type Error = String;
    fn try_from(value: String) -> Result<Self, Self::Error> {
        let value = value.trim().to_owned();
        if validate_email(&value) {
            Ok(Self(value))
        } else {
            Err(format!("{:?} is not a valid email address", value))
        }
    }
}

impl<'de> Deserialize<'de> for Email {
    fn deserialize<D>(deserializer: D) -> Result<Email, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Email::try_from(s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
