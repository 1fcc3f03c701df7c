//! Role-based authorization for the request pipeline.
//!
//! A [`RoleGuard`] is built from a statically enumerated set of allowed
//! roles, fixed per protected route group at router construction time. The
//! guard itself is pure; the async middleware functions wire it behind token
//! verification so that a missing or invalid token surfaces as 401 from the
//! authentication step while a present-but-wrong-role principal surfaces as
//! 403 from this step.

use axum::{
    extract::{FromRequestParts, Request, State},
    middleware::Next,
    response::Response,
};

use crate::middleware::auth::{AuthUser, Principal};
use crate::modules::auth::model::Role;
use crate::state::AppState;
use crate::utils::errors::AppError;

/// Roles allowed on super-admin-only routes (AI agent management).
pub const SUPER_ADMIN: &[Role] = &[Role::SuperAdmin];
/// Roles allowed on HR administration routes (employee/department/billing writes).
pub const HR_ADMINS: &[Role] = &[Role::SuperAdmin, Role::HrAdmin];
/// Roles allowed on management routes (reads, leave approval).
pub const MANAGERS: &[Role] = &[Role::SuperAdmin, Role::HrAdmin, Role::Manager];

/// Admits a request iff the principal's role is in the allowed set.
#[derive(Debug, Clone, Copy)]
pub struct RoleGuard {
    allowed: &'static [Role],
}

impl RoleGuard {
    pub const fn new(allowed: &'static [Role]) -> Self {
        Self { allowed }
    }

    /// Absence of a principal and a role outside the allowed set collapse to
    /// the same `Forbidden` outcome.
    pub fn admit(&self, principal: Option<&Principal>) -> Result<(), AppError> {
        match principal {
            Some(p) if self.allowed.contains(&p.role) => Ok(()),
            _ => Err(AppError::forbidden()),
        }
    }
}

async fn require_roles(
    state: AppState,
    req: Request,
    next: Next,
    allowed: &'static [Role],
) -> Result<Response, AppError> {
    let (mut parts, body) = req.into_parts();

    // 401 if there is no verifiable token at all.
    let AuthUser(principal) = AuthUser::from_request_parts(&mut parts, &state).await?;

    // 403 if the verified principal's role is not in the allowed set.
    RoleGuard::new(allowed).admit(Some(&principal))?;

    Ok(next.run(Request::from_parts(parts, body)).await)
}

pub async fn require_super_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_roles(state, req, next, SUPER_ADMIN).await
}

pub async fn require_hr_admin(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_roles(state, req, next, HR_ADMINS).await
}

pub async fn require_manager(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    require_roles(state, req, next, MANAGERS).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn principal(role: Role) -> Principal {
        Principal {
            user_id: Uuid::new_v4(),
            role,
        }
    }

    #[test]
    fn guard_admits_every_allowed_role_and_rejects_the_rest() {
        let guard = RoleGuard::new(HR_ADMINS);

        for role in Role::all() {
            let result = guard.admit(Some(&principal(role)));
            if HR_ADMINS.contains(&role) {
                assert!(result.is_ok(), "{role} should be admitted");
            } else {
                assert!(
                    matches!(result, Err(AppError::Forbidden)),
                    "{role} should be rejected"
                );
            }
        }
    }

    #[test]
    fn guard_rejects_missing_principal_as_forbidden() {
        let guard = RoleGuard::new(MANAGERS);
        assert!(matches!(guard.admit(None), Err(AppError::Forbidden)));
    }

    #[test]
    fn super_admin_set_admits_only_super_admin() {
        let guard = RoleGuard::new(SUPER_ADMIN);
        assert!(guard.admit(Some(&principal(Role::SuperAdmin))).is_ok());
        for role in [Role::HrAdmin, Role::Manager, Role::Employee] {
            assert!(guard.admit(Some(&principal(role))).is_err());
        }
    }
}
