//! The pass document (`pass.json`).

use serde::{Deserialize, Serialize};

use crate::config::PassConfig;
use crate::error::Error;
use crate::request::PassRequest;
use crate::style::StyleScheme;

/// The pass document of a generic membership pass.
///
/// The serial number is the membership number, so re-issuing a pass for the same member yields
/// the same serial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassDescriptor {
    /// Format version of the pass document.
    pub format_version: u32,

    /// Pass type identifier of the issuer.
    pub pass_type_identifier: String,

    /// Serial number, unique per pass type.
    pub serial_number: String,

    /// Team identifier of the issuer.
    pub team_identifier: String,

    /// Organization name, the card holder.
    pub organization_name: String,

    /// Accessibility description.
    pub description: String,

    /// Text next to the logo, the brand name as entered.
    pub logo_text: String,

    /// Background color.
    pub background_color: String,

    /// Foreground color.
    pub foreground_color: String,

    /// Optional expiration date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration_date: Option<String>,

    /// Fields of the generic pass style.
    pub generic: PassStructure,
}

/// Field layout of a pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassStructure {
    /// Fields shown prominently on the front.
    pub primary_fields: Vec<PassField>,
}

/// A single display field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PassField {
    /// Unique key of the field within the pass.
    pub key: String,

    /// Label shown above the value.
    pub label: String,

    /// The value.
    pub value: String,
}

impl PassDescriptor {
    /// Lay out the pass document for a request.
    pub fn build(
        config: &PassConfig,
        request: &PassRequest,
        style: &StyleScheme,
    ) -> Result<Self, Error> {
        request.validate()?;

        let PassRequest {
            name,
            membership_number,
            brand_name,
            ..
        } = request;

        Ok(Self {
            format_version: config.issuer.format_version,
            pass_type_identifier: config.issuer.pass_type_identifier.clone(),
            serial_number: membership_number.clone(),
            team_identifier: config.issuer.team_identifier.clone(),
            organization_name: name.clone(),
            description: format!("{name}'s Membership Card"),
            logo_text: brand_name.clone(),
            background_color: style.background_color.clone(),
            foreground_color: style.foreground_color.clone(),
            expiration_date: request.expiration().map(str::to_string),
            generic: PassStructure {
                primary_fields: vec![
                    PassField {
                        key: "member".to_string(),
                        label: config.labels.member.clone(),
                        value: name.clone(),
                    },
                    PassField {
                        key: "number".to_string(),
                        label: config.labels.number.clone(),
                        value: membership_number.clone(),
                    },
                ],
            },
        })
    }

    /// Serialize to the bytes stored in the archive.
    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        Ok(serde_json::to_vec_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::resolve;
    use crate::test::{test_config, test_request};

    #[test]
    fn test_layout() {
        let config = test_config();
        let request = test_request("Jane Doe", "12345", "CU");
        let style = resolve(&config, &request.brand_name);

        let pass = PassDescriptor::build(&config, &request, &style.scheme).unwrap();

        assert_eq!(pass.format_version, 1);
        assert_eq!(pass.serial_number, "12345");
        assert_eq!(pass.organization_name, "Jane Doe");
        assert_eq!(pass.description, "Jane Doe's Membership Card");
        assert_eq!(pass.logo_text, "CU");
        assert_eq!(pass.background_color, "rgb(128,0,128)");
        assert_eq!(pass.generic.primary_fields.len(), 2);
        assert_eq!(pass.generic.primary_fields[0].value, "Jane Doe");
        assert_eq!(pass.generic.primary_fields[1].value, "12345");
    }

    #[test]
    fn test_serialized_keys() {
        let config = test_config();
        let mut request = test_request("Jane Doe", "12345", "CU");

        let pass = PassDescriptor::build(&config, &request, &StyleScheme::default()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&pass.to_bytes().unwrap()).unwrap();

        assert_eq!(json["formatVersion"], 1);
        assert_eq!(json["passTypeIdentifier"], "pass.com.example.membership");
        assert_eq!(json["teamIdentifier"], "ABCDE12345");
        assert_eq!(json["generic"]["primaryFields"][1]["key"], "number");
        assert!(json.get("expirationDate").is_none());

        request.expiration_date = Some("2030-12-31T23:59:59+09:00".to_string());
        let pass = PassDescriptor::build(&config, &request, &StyleScheme::default()).unwrap();
        let json: serde_json::Value = serde_json::from_slice(&pass.to_bytes().unwrap()).unwrap();

        assert_eq!(json["expirationDate"], "2030-12-31T23:59:59+09:00");
    }

    #[test]
    fn test_non_ascii_is_kept() {
        let config = test_config();
        let request = test_request("홍길동", "777", "스타벅스");

        let pass = PassDescriptor::build(&config, &request, &StyleScheme::default()).unwrap();
        let text = String::from_utf8(pass.to_bytes().unwrap()).unwrap();

        assert!(text.contains("홍길동"));
        assert!(text.contains("회원 이름"));
    }

    #[test]
    fn test_rejects_missing_fields() {
        let config = test_config();

        let request = test_request("", "12345", "CU");
        assert!(matches!(
            PassDescriptor::build(&config, &request, &StyleScheme::default()),
            Err(Error::Validation(_))
        ));
    }
}
