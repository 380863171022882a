//! Data transformation logic
//!
//! Maps identity-provider users onto the internal target schema. The mapping
//! is total: every raw user produces exactly one target user and nothing here
//! can fail.

use crate::core::traits::Transformer;
use crate::domain::{RawUser, TargetUser};

/// Field-mapping transformer from [`RawUser`] to [`TargetUser`]
///
/// | Raw field | Target field |
/// |---|---|
/// | `id` | `id` |
/// | `userPrincipalName` | `external_id` |
/// | `mail` | `mail` |
/// | `userType` | `type` |
/// | `usageLocation` | `location` |
/// | `accountEnabled` | `is_enabled` |
/// | `givenName` | `first_name` |
/// | `surname` | `last_name` |
/// | `signInActivity.lastSignInDateTime` | `last_sign_in_timestamp` |
/// | `signInActivity.lastSuccessfulSignInDateTime` | `last_successful_sign_in_timestamp` |
#[derive(Debug, Clone, Copy, Default)]
pub struct UserTransformer;

impl UserTransformer {
    /// Create a new transformer
    pub fn new() -> Self {
        Self
    }
}

impl Transformer for UserTransformer {
    type Input = RawUser;
    type Output = TargetUser;

    fn transform(&self, input: RawUser) -> TargetUser {
        let (last_sign_in, last_successful_sign_in) = match input.sign_in_activity {
            Some(activity) => (
                activity.last_sign_in_date_time,
                activity.last_successful_sign_in_date_time,
            ),
            None => (None, None),
        };

        TargetUser {
            id: input.id,
            external_id: input.user_principal_name,
            mail: input.mail,
            user_type: input.user_type,
            location: input.usage_location,
            is_enabled: input.account_enabled,
            first_name: input.given_name,
            last_name: input.surname,
            last_sign_in_timestamp: last_sign_in,
            last_successful_sign_in_timestamp: last_successful_sign_in,
        }
    }
}
