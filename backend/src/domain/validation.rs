//! Checks that need the store. The structural rules live in
//! `shared::validation` and run first.

use anyhow::Result;
use shared::{FieldError, ValidationError};
use uuid::Uuid;

use crate::storage::UserStorage;

/// Report every id in `ids` that is not an active user.
///
/// Ids in `grandfathered` may point at deactivated users; an edit must not
/// fail just because someone on the original record was deleted since.
pub async fn check_known_users<U: UserStorage + ?Sized>(
    users: &U,
    field: &str,
    ids: &[Uuid],
    grandfathered: &[Uuid],
) -> Result<Vec<FieldError>> {
    let mut errors = Vec::new();

    for id in ids {
        let known = match users.get_user(*id).await? {
            Some(user) => user.is_active || grandfathered.contains(id),
            None => false,
        };
        if !known {
            errors.push(FieldError::new(field, ValidationError::UnknownUser(id.to_string())));
        }
    }

    Ok(errors)
}
