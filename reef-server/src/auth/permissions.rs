//! Permission definitions
//!
//! Flat RBAC permission catalog. A role carries a subset of these
//! strings; a user's effective set is the union over their roles.
//!
//! ## Design rules
//! - Read permissions for public content are "free": everyone holds
//!   them implicitly, including anonymous visitors
//! - Sensitive operations get their own permission instead of piggybacking
//!   on a module-wide one (DELETE_* vs EDIT_*)
//! - Role administration is split: editing a role (EDIT_ROLE) and handing
//!   it to users (BIND_ROLE) are separate grants

/// Full permission catalog
pub const ALL_PERMISSIONS: &[&str] = &[
    // === Users ===
    "VIEW_USERS",
    "EDIT_USER",
    "DELETE_USER",
    // === Roles ===
    "VIEW_ROLES",
    "CREATE_ROLE",
    "EDIT_ROLE",
    "DELETE_ROLE",
    "BIND_ROLE",
    // === Pages ===
    "VIEW_PAGES",
    "EDIT_PAGE",
    "DELETE_PAGE",
    // === Settings ===
    "VIEW_SETTINGS",
    "EDIT_SETTINGS",
    // === Newsletters ===
    "VIEW_NEWSLETTERS",
    "EDIT_NEWSLETTER",
    "SEND_NEWSLETTER",
    "VIEW_SUBSCRIBERS",
    // === Inquiries ===
    "VIEW_INQUIRIES",
    "ASK_INQUIRY",
    "ANSWER_INQUIRY",
    // === Businesses ===
    "VIEW_BUSINESSES",
    "EDIT_BUSINESS",
    "DELETE_BUSINESS",
    // === Files ===
    "VIEW_FILES",
    "UPLOAD_FILE",
    "DELETE_FILE",
];

/// Permissions everyone holds, signed in or not. They may always be
/// delegated to a role regardless of the actor's own grants.
pub const FREE_PERMISSIONS: &[&str] = &["VIEW_PAGES", "VIEW_BUSINESSES", "ASK_INQUIRY"];

/// Whether a permission string exists in the catalog
pub fn is_valid_permission(permission: &str) -> bool {
    ALL_PERMISSIONS.contains(&permission)
}

/// Whether a permission is granted to everyone implicitly
pub fn is_free_permission(permission: &str) -> bool {
    FREE_PERMISSIONS.contains(&permission)
}
