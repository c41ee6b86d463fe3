use thiserror::Error;
use wesaurus_types::{Definition, User};

/// Something that belongs to exactly one user.
pub trait Owned {
    fn owner_id(&self) -> i32;

    /// Denial reported when someone other than the owner tries to act on it.
    fn denial(&self) -> OwnershipError;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OwnershipError {
    #[error("Only the author may modify this definition")]
    NotAuthor,
    #[error("You may only access your own collection")]
    NotOwner,
}

/// The collection addressed by `/api/users/:user_id/...`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionScope(pub i32);

impl Owned for CollectionScope {
    fn owner_id(&self) -> i32 {
        self.0
    }

    fn denial(&self) -> OwnershipError {
        OwnershipError::NotOwner
    }
}

impl Owned for Definition {
    fn owner_id(&self) -> i32 {
        self.author_id
    }

    fn denial(&self) -> OwnershipError {
        OwnershipError::NotAuthor
    }
}

/// Single ownership check shared by the registry, collection and settings services.
pub fn assert_owner_or_author<R: Owned + ?Sized>(
    resource: &R,
    caller: &User,
) -> Result<(), OwnershipError> {
    if resource.owner_id() == caller.id {
        Ok(())
    } else {
        tracing::debug!(
            "User {} denied access to resource owned by {}",
            caller.id,
            resource.owner_id()
        );
        Err(resource.denial())
    }
}
