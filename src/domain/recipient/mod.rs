pub mod email;

use serde::Serialize;

use self::email::Email;

/// One row of the uploaded contact list, exactly as the backend accepted it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Recipient {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
}

impl Recipient {
    /// The recipient table shows these columns and nothing else.
    pub const COLUMNS: [&'static str; 3] = ["first_name", "last_name", "email"];

    pub fn new(first_name: Option<String>, last_name: Option<String>, email: String) -> Self {
        Self {
            first_name,
            last_name,
            email,
        }
    }

    /// Whether the address also passes local validation. The backend has the
    /// final say, so a `false` here never removes the row.
    pub fn has_verified_email(&self) -> bool {
        Email::try_from(self.email.clone()).is_ok()
    }

    pub fn cells(&self) -> [&str; 3] {
        [
            self.first_name.as_deref().unwrap_or_default(),
            self.last_name.as_deref().unwrap_or_default(),
            &self.email,
        ]
    }
}
