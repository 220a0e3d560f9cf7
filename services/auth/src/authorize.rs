//! Ownership checks for mutating user-owned resources

use tracing::warn;
use uuid::Uuid;

use crate::{error::AuthError, middleware::CurrentUser};

/// Anything created by, and therefore owned by, a single user
pub trait Owned {
    fn owner_id(&self) -> Uuid;
}

/// Allow the caller through only when they own the resource
pub fn ensure_owner<R: Owned>(caller: &CurrentUser, resource: &R) -> Result<(), AuthError> {
    if resource.owner_id() == caller.id() {
        Ok(())
    } else {
        warn!(
            "User {} attempted to modify a resource owned by {}",
            caller.id(),
            resource.owner_id()
        );
        Err(AuthError::Forbidden)
    }
}
