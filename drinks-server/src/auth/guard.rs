use super::{AuthError, Claims};

/// Check that `claims` grant exactly `required`.
///
/// Matching is case-sensitive and literal; there are no wildcard or
/// hierarchical permissions.
pub fn authorize(required: &str, claims: &Claims) -> Result<(), AuthError> {
    let permissions = claims
        .permissions
        .as_ref()
        .ok_or(AuthError::PermissionsClaimAbsent)?;

    if permissions.iter().any(|granted| granted == required) {
        Ok(())
    } else {
        Err(AuthError::MissingPermission)
    }
}
