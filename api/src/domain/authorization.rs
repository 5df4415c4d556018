//! Authorization policy
//!
//! A pure function of (actor, operation, target owner) deciding whether a
//! mutation may proceed. Reads are open to everyone, including anonymous
//! callers.

use std::fmt;

use crate::domain::entities::UserId;
use crate::error::DomainError;

/// The authenticated caller
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub is_admin: bool,
}

impl Actor {
    pub fn new(id: UserId, is_admin: bool) -> Self {
        Self { id, is_admin }
    }

    pub fn admin(id: UserId) -> Self {
        Self { id, is_admin: true }
    }

    pub fn user(id: UserId) -> Self {
        Self {
            id,
            is_admin: false,
        }
    }
}

/// Which API the request arrived through. Only review mutations differ.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    Public,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    CreateUser,
    /// Name changes on a user record
    UpdateUser,
    /// Email, password or admin flag changes
    UpdateUserCredentials,
    CreateAmenity,
    UpdateAmenity,
    /// Target owner is the owner the place is created for
    CreatePlace,
    UpdatePlace,
    DeletePlace,
    ReassignPlaceOwner,
    /// Target owner is the author the review is created for
    CreateReview,
    UpdateReview(Surface),
    DeleteReview(Surface),
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::CreateUser => "create users",
            Operation::UpdateUser => "update this user",
            Operation::UpdateUserCredentials => "modify email, password or admin status",
            Operation::CreateAmenity => "create amenities",
            Operation::UpdateAmenity => "modify amenities",
            Operation::CreatePlace => "create a place for another user",
            Operation::UpdatePlace => "update this place",
            Operation::DeletePlace => "delete this place",
            Operation::ReassignPlaceOwner => "change the owner of a place",
            Operation::CreateReview => "review on behalf of another user",
            Operation::UpdateReview(_) => "update this review",
            Operation::DeleteReview(_) => "delete this review",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    /// No actor: authentication is required
    DenyAnonymous,
    /// Authenticated, but not allowed
    DenyForbidden,
}

enum Rule {
    AdminOnly,
    OwnerOrAdmin,
    OwnerOnly,
}

fn rule_for(operation: Operation) -> Rule {
    match operation {
        Operation::CreateUser
        | Operation::UpdateUserCredentials
        | Operation::CreateAmenity
        | Operation::UpdateAmenity
        | Operation::ReassignPlaceOwner => Rule::AdminOnly,
        Operation::UpdateUser
        | Operation::CreatePlace
        | Operation::UpdatePlace
        | Operation::DeletePlace
        | Operation::CreateReview
        | Operation::UpdateReview(Surface::Admin)
        | Operation::DeleteReview(Surface::Admin) => Rule::OwnerOrAdmin,
        Operation::UpdateReview(Surface::Public) | Operation::DeleteReview(Surface::Public) => {
            Rule::OwnerOnly
        }
    }
}

/// Evaluate a single operation. `owner` is the user the target belongs to
/// (place owner, review author, the user record itself).
pub fn evaluate(actor: Option<&Actor>, operation: Operation, owner: Option<&UserId>) -> Decision {
    let rule = rule_for(operation);
    let Some(actor) = actor else {
        return Decision::DenyAnonymous;
    };
    let is_owner = owner.is_some_and(|owner| *owner == actor.id);
    let allowed = match rule {
        Rule::AdminOnly => actor.is_admin,
        Rule::OwnerOrAdmin => actor.is_admin || is_owner,
        Rule::OwnerOnly => is_owner,
    };
    if allowed {
        Decision::Allow
    } else {
        Decision::DenyForbidden
    }
}

/// The caller, or `Unauthorized` for anonymous requests
pub fn require_actor(actor: Option<&Actor>) -> Result<&Actor, DomainError> {
    actor.ok_or_else(|| DomainError::Unauthorized("Authentication required".to_string()))
}

/// [`evaluate`] mapped onto domain errors
pub fn authorize(
    actor: Option<&Actor>,
    operation: Operation,
    owner: Option<&UserId>,
) -> Result<(), DomainError> {
    match evaluate(actor, operation, owner) {
        Decision::Allow => Ok(()),
        Decision::DenyAnonymous => {
            tracing::warn!(%operation, "Anonymous caller denied");
            require_actor(None).map(|_| ())
        }
        Decision::DenyForbidden => {
            let actor_id = actor.map(|a| a.id.to_string()).unwrap_or_default();
            tracing::warn!(%operation, %actor_id, "Authorization denied");
            Err(DomainError::Forbidden(format!("Not allowed to {}", operation)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn anonymous_mutations_are_denied() {
        for op in [
            Operation::CreateUser,
            Operation::UpdateUser,
            Operation::CreatePlace,
            Operation::DeletePlace,
            Operation::CreateReview,
            Operation::UpdateReview(Surface::Public),
        ] {
            assert_eq!(
                evaluate(None, op, Some(&UserId::new())),
                Decision::DenyAnonymous
            );
        }
    }

    #[test]
    fn owner_or_admin_for_places() {
        let owner = UserId::new();
        let stranger = Actor::user(UserId::new());
        let admin = Actor::admin(UserId::new());

        assert_eq!(
            evaluate(Some(&Actor::user(owner)), Operation::UpdatePlace, Some(&owner)),
            Decision::Allow
        );
        assert_eq!(
            evaluate(Some(&stranger), Operation::UpdatePlace, Some(&owner)),
            Decision::DenyForbidden
        );
        assert_eq!(
            evaluate(Some(&admin), Operation::DeletePlace, Some(&owner)),
            Decision::Allow
        );
    }

    #[test]
    fn admin_only_operations() {
        let me = UserId::new();
        let user = Actor::user(me);
        let admin = Actor::admin(UserId::new());

        for op in [
            Operation::CreateUser,
            Operation::CreateAmenity,
            Operation::UpdateAmenity,
            Operation::UpdateUserCredentials,
            Operation::ReassignPlaceOwner,
        ] {
            // Owning the target does not help
            assert_eq!(evaluate(Some(&user), op, Some(&me)), Decision::DenyForbidden);
            assert_eq!(evaluate(Some(&admin), op, None), Decision::Allow);
        }
    }

    #[test]
    fn review_rules_depend_on_surface() {
        let author = UserId::new();
        let admin = Actor::admin(UserId::new());

        assert_eq!(
            evaluate(
                Some(&admin),
                Operation::UpdateReview(Surface::Public),
                Some(&author)
            ),
            Decision::DenyForbidden
        );
        assert_eq!(
            evaluate(
                Some(&admin),
                Operation::DeleteReview(Surface::Admin),
                Some(&author)
            ),
            Decision::Allow
        );
        assert_eq!(
            evaluate(
                Some(&Actor::user(author)),
                Operation::DeleteReview(Surface::Public),
                Some(&author)
            ),
            Decision::Allow
        );
    }

    #[test]
    fn authorize_maps_to_errors() {
        assert!(matches!(
            authorize(None, Operation::CreatePlace, None),
            Err(DomainError::Unauthorized(_))
        ));
        assert!(matches!(
            authorize(
                Some(&Actor::user(UserId::new())),
                Operation::CreateAmenity,
                None
            ),
            Err(DomainError::Forbidden(_))
        ));
    }
}
