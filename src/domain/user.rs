//! User record models
//!
//! This module defines the raw records read from identity-provider exports and
//! the target records written to the output files.

use serde::{Deserialize, Serialize};

/// Sign-in activity block nested inside a raw user
///
/// Only the two `last*SignInDateTime` timestamps reach the target schema; the
/// remaining fields are parsed so that the block is recognised but are not
/// mapped anywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSignInActivity {
    /// Last interactive sign-in timestamp
    #[serde(default)]
    pub last_sign_in_date_time: Option<String>,

    /// Request ID of the last interactive sign-in
    #[serde(default)]
    pub last_sign_in_request_id: Option<String>,

    /// Last non-interactive sign-in timestamp
    #[serde(default)]
    pub last_non_interactive_sign_in_date_time: Option<String>,

    /// Request ID of the last non-interactive sign-in
    #[serde(default)]
    pub last_non_interactive_sign_in_request_id: Option<String>,

    /// Last successful sign-in timestamp
    #[serde(default)]
    pub last_successful_sign_in_date_time: Option<String>,

    /// Request ID of the last successful sign-in
    #[serde(default)]
    pub last_successful_sign_in_request_id: Option<String>,
}

/// A user as exported by the identity provider
///
/// `id` is the only required field. Unknown fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
    /// Directory object ID
    pub id: String,

    /// User principal name (becomes `external_id`)
    #[serde(default)]
    pub user_principal_name: Option<String>,

    /// Primary mail address
    #[serde(default)]
    pub mail: Option<String>,

    /// Member or Guest
    #[serde(default)]
    pub user_type: Option<String>,

    /// Two-letter usage location
    #[serde(default)]
    pub usage_location: Option<String>,

    /// Whether the account is enabled
    #[serde(default)]
    pub account_enabled: Option<bool>,

    /// Given name
    #[serde(default)]
    pub given_name: Option<String>,

    /// Surname
    #[serde(default)]
    pub surname: Option<String>,

    /// Sign-in activity, absent or null for users that never signed in
    #[serde(default)]
    pub sign_in_activity: Option<RawSignInActivity>,
}

/// A user in the internal target schema
///
/// Field order here is the field order of every output line. `None` fields are
/// left out of the serialized object entirely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetUser {
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,

    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_enabled: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_sign_in_timestamp: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_successful_sign_in_timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_raw_user_ignores_unknown_fields() {
        let raw: RawUser = serde_json::from_value(json!({
            "id": "1",
            "userPrincipalName": "u@e.com",
            "mobilePhone": "+1 555",
            "otherMails": ["a@b.com"],
            "accountEnabled": false
        }))
        .unwrap();

        assert_eq!(raw.id, "1");
        assert_eq!(raw.user_principal_name.as_deref(), Some("u@e.com"));
        assert_eq!(raw.account_enabled, Some(false));
        assert!(raw.sign_in_activity.is_none());
    }

    #[test]
    fn test_raw_user_requires_id() {
        let result = serde_json::from_value::<RawUser>(json!({"mail": "u@e.com"}));
        assert!(result.is_err());

        let result = serde_json::from_value::<RawUser>(json!({"id": null}));
        assert!(result.is_err());
    }

    #[test]
    fn test_raw_user_null_sign_in_activity() {
        let raw: RawUser =
            serde_json::from_value(json!({"id": "1", "signInActivity": null})).unwrap();
        assert!(raw.sign_in_activity.is_none());
    }

    #[test]
    fn test_target_user_omits_none_fields() {
        let user = TargetUser {
            id: "1".to_string(),
            user_type: Some("Guest".to_string()),
            ..Default::default()
        };

        let line = serde_json::to_string(&user).unwrap();
        assert_eq!(line, r#"{"id":"1","type":"Guest"}"#);
    }
}
