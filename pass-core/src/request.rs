//! The membership card request.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A request for a membership pass, as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassRequest {
    /// Name of the card holder.
    pub name: String,

    /// Membership number, also the serial number of the pass.
    pub membership_number: String,

    /// Brand name as entered by the caller.
    pub brand_name: String,

    /// Optional expiration date, copied verbatim into the pass.
    #[serde(default)]
    pub expiration_date: Option<String>,
}

impl PassRequest {
    /// Check the mandatory fields.
    pub fn validate(&self) -> Result<(), Error> {
        if self.name.trim().is_empty() {
            return Err(Error::Validation("name must not be empty".to_string()));
        }

        if self.membership_number.trim().is_empty() {
            return Err(Error::Validation(
                "membership_number must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// The expiration date, if one was given and it is not blank.
    pub fn expiration(&self) -> Option<&str> {
        self.expiration_date
            .as_deref()
            .filter(|date| !date.trim().is_empty())
    }
}
