//! Role Model

use serde::{Deserialize, Serialize};

/// Role kind (closed set)
///
/// The kind decides what may be done to a role, independent of who asks.
/// Capability checks live here so handlers never match on the kind
/// themselves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "UPPERCASE"))]
pub enum RoleKind {
    /// Built-in administrative roles. Immutable and undeletable.
    System,
    /// The default role bound at signup. Editable, but its permission
    /// set is fixed.
    Guest,
    /// Operator-defined roles. Fully editable subject to authority rules.
    Custom,
}

impl RoleKind {
    /// Whether roles of this kind may be deleted at all
    pub fn can_delete(&self) -> bool {
        matches!(self, RoleKind::Custom)
    }

    /// Whether non-permission fields (name, level, color) may be edited
    pub fn can_edit(&self) -> bool {
        !matches!(self, RoleKind::System)
    }

    /// Whether the permission set may be edited
    pub fn can_edit_permissions(&self) -> bool {
        matches!(self, RoleKind::Custom)
    }

    /// String form used in the database and API
    pub fn as_str(&self) -> &'static str {
        match self {
            RoleKind::System => "SYSTEM",
            RoleKind::Guest => "GUEST",
            RoleKind::Custom => "CUSTOM",
        }
    }
}

/// Role entity (RBAC)
///
/// `level` orders authority: strictly higher levels outrank lower ones
/// when binding or editing roles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub kind: RoleKind,
    pub level: i64,
    /// JSON array of permission strings (e.g. ["VIEW_USERS", "EDIT_PAGE"])
    #[cfg_attr(feature = "db", sqlx(json))]
    pub permissions: Vec<String>,
    /// Display color for the admin UI
    pub color: Option<String>,
    /// Blocks permission edits even when the role itself is editable
    pub permissions_locked: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Role {
    /// Whether this role grants the given permission
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    /// Whether this role's permission set may be changed
    pub fn permissions_editable(&self) -> bool {
        self.kind.can_edit_permissions() && !self.permissions_locked
    }
}

/// Create role payload; created roles are always [`RoleKind::Custom`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleCreate {
    pub name: String,
    pub level: i64,
    pub permissions: Vec<String>,
    pub color: Option<String>,
}

/// Update role payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleUpdate {
    pub name: Option<String>,
    pub level: Option<i64>,
    pub permissions: Option<Vec<String>>,
    pub color: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn role(kind: RoleKind, locked: bool) -> Role {
        Role {
            id: 1,
            name: "test".to_string(),
            kind,
            level: 10,
            permissions: vec!["VIEW_PAGES".to_string()],
            color: None,
            permissions_locked: locked,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_kind_capability_table() {
        assert!(!RoleKind::System.can_delete());
        assert!(!RoleKind::System.can_edit());
        assert!(!RoleKind::System.can_edit_permissions());

        assert!(!RoleKind::Guest.can_delete());
        assert!(RoleKind::Guest.can_edit());
        assert!(!RoleKind::Guest.can_edit_permissions());

        assert!(RoleKind::Custom.can_delete());
        assert!(RoleKind::Custom.can_edit());
        assert!(RoleKind::Custom.can_edit_permissions());
    }

    #[test]
    fn test_permissions_editable_respects_lock() {
        assert!(role(RoleKind::Custom, false).permissions_editable());
        assert!(!role(RoleKind::Custom, true).permissions_editable());
        assert!(!role(RoleKind::Guest, false).permissions_editable());
    }

    #[test]
    fn test_kind_serde_uppercase() {
        assert_eq!(serde_json::to_string(&RoleKind::System).unwrap(), "\"SYSTEM\"");
        let kind: RoleKind = serde_json::from_str("\"CUSTOM\"").unwrap();
        assert_eq!(kind, RoleKind::Custom);
    }

    #[test]
    fn test_has_permission() {
        let r = role(RoleKind::Custom, false);
        assert!(r.has_permission("VIEW_PAGES"));
        assert!(!r.has_permission("VIEW_USERS"));
    }
}
