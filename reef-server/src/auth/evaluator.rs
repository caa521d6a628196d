//! Permission evaluation
//!
//! All authorization questions are answered here, against the user's
//! roles as loaded from the database for the current request. Handlers
//! and middleware never inspect role internals themselves.

use std::collections::HashSet;

use shared::models::{Role, UserWithRoles};

use super::permissions::FREE_PERMISSIONS;

/// The authenticated user of the current request
///
/// Built by the auth middleware from a valid access token plus a fresh
/// database load, so revoked roles take effect on the next request.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    /// Roles in bind order
    pub roles: Vec<Role>,
}

impl From<UserWithRoles> for CurrentUser {
    fn from(u: UserWithRoles) -> Self {
        Self {
            id: u.user.id,
            username: u.user.username,
            email: u.user.email,
            roles: u.roles,
        }
    }
}

impl CurrentUser {
    /// Union of role permissions plus the free set
    pub fn effective_permissions(&self) -> HashSet<&str> {
        let mut set: HashSet<&str> = self
            .roles
            .iter()
            .flat_map(|r| r.permissions.iter().map(String::as_str))
            .collect();
        set.extend(FREE_PERMISSIONS);
        set
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        FREE_PERMISSIONS.contains(&permission)
            || self.roles.iter().any(|r| r.has_permission(permission))
    }

    pub fn has_all_permissions(&self, permissions: &[&str]) -> bool {
        permissions.iter().all(|p| self.has_permission(p))
    }

    pub fn has_any_permission(&self, permissions: &[&str]) -> bool {
        permissions.iter().any(|p| self.has_permission(p))
    }

    /// Highest-level role that grants any of the given permissions.
    /// Ties between equal levels resolve to whichever comes first.
    pub fn highest_role_with_permission(&self, permissions: &[&str]) -> Option<&Role> {
        self.roles
            .iter()
            .filter(|r| permissions.iter().any(|p| r.has_permission(p)))
            .max_by_key(|r| r.level)
    }

    /// The role that sets this user's ceiling for role administration:
    /// their highest role granting BIND_ROLE or EDIT_ROLE. None means
    /// they cannot administer roles at all.
    pub fn highest_editable_role(&self) -> Option<&Role> {
        self.highest_role_with_permission(&["BIND_ROLE", "EDIT_ROLE"])
    }

    /// Level of this user's highest role regardless of what it grants.
    /// None for an account with no roles bound.
    pub fn highest_level(&self) -> Option<i64> {
        self.roles.iter().map(|r| r.level).max()
    }

    /// Whether this user holds any SYSTEM role
    pub fn is_system(&self) -> bool {
        self.roles
            .iter()
            .any(|r| r.kind == shared::models::RoleKind::System)
    }
}

/// Permission check over an optional user. An absent user never passes,
/// whatever the required set.
///
/// `check_all` selects ALL semantics; false means ANY.
pub fn check_permission(user: Option<&CurrentUser>, required: &[&str], check_all: bool) -> bool {
    let Some(user) = user else {
        return false;
    };
    if required.is_empty() {
        return true;
    }
    if check_all {
        user.has_all_permissions(required)
    } else {
        user.has_any_permission(required)
    }
}

/// Whether the actor's authority ceiling strictly outranks `level`.
/// Used for creating, editing, deleting roles at that level and for
/// binding roles of that level to users.
pub fn outranks(actor: &CurrentUser, level: i64) -> bool {
    match actor.highest_editable_role() {
        Some(ceiling) => level < ceiling.level,
        None => false,
    }
}

/// Permissions in `requested` the actor may not delegate: everything
/// outside their own effective set and the free set. Returned in request
/// order for error reporting.
pub fn undelegable_permissions(actor: &CurrentUser, requested: &[String]) -> Vec<String> {
    let held = actor.effective_permissions();
    requested
        .iter()
        .filter(|p| !held.contains(p.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::RoleKind;

    fn role(id: i64, level: i64, permissions: &[&str]) -> Role {
        Role {
            id,
            name: format!("role-{id}"),
            kind: RoleKind::Custom,
            level,
            permissions: permissions.iter().map(|s| s.to_string()).collect(),
            color: None,
            permissions_locked: false,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn user(roles: Vec<Role>) -> CurrentUser {
        CurrentUser {
            id: 1,
            username: "tester".into(),
            email: "tester@example.com".into(),
            roles,
        }
    }

    #[test]
    fn test_effective_permissions_union() {
        let u = user(vec![
            role(1, 10, &["VIEW_USERS", "EDIT_USER"]),
            role(2, 5, &["VIEW_ROLES"]),
        ]);
        assert!(u.has_permission("VIEW_USERS"));
        assert!(u.has_permission("VIEW_ROLES"));
        assert!(!u.has_permission("DELETE_USER"));
    }

    #[test]
    fn test_free_permissions_always_held() {
        let u = user(vec![]);
        assert!(u.has_permission("VIEW_PAGES"));
        assert!(u.has_permission("ASK_INQUIRY"));
    }

    #[test]
    fn test_all_vs_any_semantics() {
        let u = user(vec![role(1, 10, &["VIEW_USERS"])]);
        let required = &["VIEW_USERS", "EDIT_USER"];
        assert!(check_permission(Some(&u), required, false));
        assert!(!check_permission(Some(&u), required, true));
    }

    #[test]
    fn test_anonymous_never_passes() {
        assert!(!check_permission(None, &["VIEW_PAGES"], false));
        assert!(!check_permission(None, &[], true));
    }

    #[test]
    fn test_empty_requirement_passes_for_user() {
        let u = user(vec![]);
        assert!(check_permission(Some(&u), &[], true));
    }

    #[test]
    fn test_highest_role_with_permission_picks_max_level() {
        let u = user(vec![
            role(1, 5, &["BIND_ROLE"]),
            role(2, 20, &["BIND_ROLE"]),
            role(3, 50, &["VIEW_USERS"]),
        ]);
        let highest = u.highest_role_with_permission(&["BIND_ROLE"]).unwrap();
        assert_eq!(highest.id, 2);
    }

    #[test]
    fn test_highest_level_spans_all_roles() {
        let u = user(vec![role(1, 5, &["VIEW_USERS"]), role(2, 30, &[])]);
        assert_eq!(u.highest_level(), Some(30));
        assert_eq!(user(vec![]).highest_level(), None);
    }

    #[test]
    fn test_outranks_is_strict() {
        let u = user(vec![role(1, 20, &["BIND_ROLE"])]);
        assert!(outranks(&u, 19));
        assert!(!outranks(&u, 20));
        assert!(!outranks(&u, 21));
    }

    #[test]
    fn test_outranks_requires_admin_grant() {
        let u = user(vec![role(1, 99, &["VIEW_USERS"])]);
        assert!(!outranks(&u, 0));
    }

    #[test]
    fn test_undelegable_filters_free_and_held() {
        let u = user(vec![role(1, 10, &["VIEW_USERS"])]);
        let requested = vec![
            "VIEW_USERS".to_string(),
            "VIEW_PAGES".to_string(),
            "DELETE_USER".to_string(),
            "SEND_NEWSLETTER".to_string(),
        ];
        let offenders = undelegable_permissions(&u, &requested);
        assert_eq!(offenders, vec!["DELETE_USER", "SEND_NEWSLETTER"]);
    }
}
