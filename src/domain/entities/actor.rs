use uuid::Uuid;

use crate::{entities::{token::Claims, user::Role}, errors::{AppError, AuthError}};

/// Caller identity resolved from the session token.
///
/// Every use case receives the actor explicitly instead of consulting
/// request-global state, so ownership rules can be exercised without HTTP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: Uuid,
    pub role: Role,
    pub company_id: Option<Uuid>,
}

impl Actor {
    pub fn new(user_id: Uuid, role: Role, company_id: Option<Uuid>) -> Self {
        Actor { user_id, role, company_id }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Fails with `ForbiddenAccess` unless the actor holds `role`.
    pub fn require_role(&self, role: Role) -> Result<(), AppError> {
        if self.role == role {
            Ok(())
        } else {
            tracing::warn!(
                user_id = %self.user_id,
                actual = %self.role,
                required = %role,
                "Role check failed"
            );
            Err(AppError::ForbiddenAccess)
        }
    }
}

impl TryFrom<&Claims> for Actor {
    type Error = AuthError;

    fn try_from(claims: &Claims) -> Result<Self, Self::Error> {
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidUserId)?;
        Ok(Actor {
            user_id,
            role: claims.role,
            company_id: claims.company_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::token::TokenType;

    fn claims(sub: &str, role: Role) -> Claims {
        Claims {
            sub: sub.to_string(),
            email: "someone@example.com".into(),
            role,
            company_id: None,
            token_type: TokenType::Access,
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn require_role_distinguishes_roles() {
        let actor = Actor::new(Uuid::new_v4(), Role::CompanyAdmin, Some(Uuid::new_v4()));

        assert!(actor.require_role(Role::CompanyAdmin).is_ok());
        assert!(matches!(actor.require_role(Role::Admin), Err(AppError::ForbiddenAccess)));
    }

    #[test]
    fn actor_from_claims_requires_uuid_subject() {
        let id = Uuid::new_v4();
        let actor = Actor::try_from(&claims(&id.to_string(), Role::JobSeeker)).unwrap();
        assert_eq!(actor.user_id, id);
        assert_eq!(actor.role, Role::JobSeeker);

        assert!(matches!(
            Actor::try_from(&claims("not-a-uuid", Role::Admin)),
            Err(AuthError::InvalidUserId)
        ));
    }
}
