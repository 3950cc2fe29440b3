//! Workspace access control.
//!
//! Every request is checked before any transaction opens. Writers need a
//! role that can submit snapshots; readers need any membership.

use crate::error::{ServerError, ServerResult};
use notesync_core::{store, CoreResult, Role, Session};
use std::collections::HashMap;
use std::sync::Arc;

/// Looks up a user's role in a workspace.
pub trait RoleLookup: Send + Sync {
    /// Returns the role of `user_id` in `workspace_id`, if any.
    fn role_of(&self, session: &Session, workspace_id: i64, user_id: i64)
        -> CoreResult<Option<Role>>;
}

/// Reads roles from the workspace membership table.
///
/// The workspace owner is always treated as [`Role::Owner`], even without a
/// membership row.
#[derive(Debug, Clone, Copy, Default)]
pub struct MembershipRoles;

impl RoleLookup for MembershipRoles {
    fn role_of(
        &self,
        session: &Session,
        workspace_id: i64,
        user_id: i64,
    ) -> CoreResult<Option<Role>> {
        let conn = session.connection();
        if let Some(role) = store::member::role_of(conn, workspace_id, user_id)? {
            return Ok(Some(role));
        }
        Ok(store::workspace::get(conn, workspace_id)?
            .filter(|ws| ws.owner_user_id == user_id)
            .map(|_| Role::Owner))
    }
}

/// Fixed role assignments, for embedding behind an external identity system.
#[derive(Debug, Clone, Default)]
pub struct StaticRoles {
    roles: HashMap<(i64, i64), Role>,
}

impl StaticRoles {
    /// Creates an empty role table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Grants `role` to `user_id` in `workspace_id`.
    pub fn grant(mut self, workspace_id: i64, user_id: i64, role: Role) -> Self {
        self.roles.insert((workspace_id, user_id), role);
        self
    }
}

impl RoleLookup for StaticRoles {
    fn role_of(&self, _: &Session, workspace_id: i64, user_id: i64) -> CoreResult<Option<Role>> {
        Ok(self.roles.get(&(workspace_id, user_id)).copied())
    }
}

/// Enforces workspace roles.
#[derive(Clone)]
pub struct AccessGuard {
    lookup: Arc<dyn RoleLookup>,
}

impl AccessGuard {
    /// Creates a guard backed by `lookup`.
    pub fn new(lookup: Arc<dyn RoleLookup>) -> Self {
        Self { lookup }
    }

    /// Requires that the user may submit snapshots.
    pub fn require_write(
        &self,
        session: &Session,
        workspace_id: i64,
        user_id: i64,
    ) -> ServerResult<Role> {
        match self.lookup.role_of(session, workspace_id, user_id)? {
            Some(role) if role.can_write() => Ok(role),
            role => {
                tracing::warn!(workspace_id, user_id, ?role, "Sync rejected");
                Err(ServerError::Forbidden {
                    workspace_id,
                    user_id,
                    action: "sync",
                })
            }
        }
    }

    /// Requires that the user is a member of the workspace.
    pub fn require_read(
        &self,
        session: &Session,
        workspace_id: i64,
        user_id: i64,
    ) -> ServerResult<Role> {
        self.lookup
            .role_of(session, workspace_id, user_id)?
            .ok_or(ServerError::Forbidden {
                workspace_id,
                user_id,
                action: "read",
            })
    }
}

impl Default for AccessGuard {
    fn default() -> Self {
        Self::new(Arc::new(MembershipRoles))
    }
}

impl std::fmt::Debug for AccessGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccessGuard").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notesync_testkit::{TestEnv, COLLABORATOR, OUTSIDER, OWNER, VIEWER};

    #[test]
    fn membership_roles() {
        let env = TestEnv::new();
        let session = env.session();
        let guard = AccessGuard::default();
        let ws = env.workspace_id;

        assert_eq!(guard.require_write(&session, ws, OWNER).unwrap(), Role::Owner);
        assert_eq!(guard.require_write(&session, ws, COLLABORATOR).unwrap(), Role::Collaborator);
        assert!(matches!(
            guard.require_write(&session, ws, VIEWER),
            Err(ServerError::Forbidden { action: "sync", .. })
        ));
        assert_eq!(guard.require_read(&session, ws, VIEWER).unwrap(), Role::Viewer);
        assert!(matches!(
            guard.require_read(&session, ws, OUTSIDER),
            Err(ServerError::Forbidden { action: "read", .. })
        ));
    }

    #[test]
    fn owner_without_membership_row() {
        let env = TestEnv::new();
        let mut session = env.session();
        let ws = env.workspace_id;
        session
            .write(|tx| store::member::remove(tx, ws, OWNER).map(|_| ()))
            .unwrap();

        let guard = AccessGuard::default();
        assert_eq!(guard.require_write(&session, ws, OWNER).unwrap(), Role::Owner);
    }

    #[test]
    fn unknown_workspace_is_forbidden() {
        let env = TestEnv::new();
        let session = env.session();
        let guard = AccessGuard::default();
        assert!(guard.require_write(&session, 999, OWNER).is_err());
    }

    #[test]
    fn static_roles() {
        let env = TestEnv::new();
        let session = env.session();
        let guard = AccessGuard::new(Arc::new(StaticRoles::new().grant(7, 42, Role::Collaborator)));

        assert!(guard.require_write(&session, 7, 42).is_ok());
        assert!(guard.require_read(&session, 7, 43).is_err());
    }
}
