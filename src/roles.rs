use serde::{Deserialize, Serialize};
use std::fmt;

use crate::contacts::Contact;

/// Console roles. Each role sees a different slice of the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    AccountManager,
    Freelancer,
    SuperAdmin,
}

impl Role {
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Role::Admin => "admin",
            Role::AccountManager => "account_manager",
            Role::Freelancer => "freelancer",
            Role::SuperAdmin => "super_admin",
        };
        f.write_str(label)
    }
}

/// The signed-in user, passed explicitly to anything that authorises
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserContext {
    pub user_id: String,
    pub role: Role,
}

impl UserContext {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn owns(&self, owner_id: &str) -> bool {
        self.user_id == owner_id
    }
}

/// Contacts the user may see: everything for admins, own assignments otherwise
pub fn visible_contacts<'a>(user: &UserContext, contacts: &'a [Contact]) -> Vec<&'a Contact> {
    contacts
        .iter()
        .filter(|contact| {
            user.is_admin() || contact.assigned_to.as_deref().is_some_and(|owner| user.owns(owner))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contact(name: &str, assigned_to: Option<&str>) -> Contact {
        let mut contact = Contact::new(name, format!("{name}@example.com"));
        contact.assigned_to = assigned_to.map(str::to_string);
        contact
    }

    #[test]
    fn test_admin_roles() {
        assert!(Role::Admin.is_admin());
        assert!(Role::SuperAdmin.is_admin());
        assert!(!Role::AccountManager.is_admin());
        assert!(!Role::Freelancer.is_admin());
    }

    #[test]
    fn test_visible_contacts_by_role() {
        let contacts = vec![
            contact("alice", Some("am-1")),
            contact("bob", Some("fl-1")),
            contact("carol", None),
        ];

        let admin = UserContext::new("admin-1", Role::Admin);
        assert_eq!(visible_contacts(&admin, &contacts).len(), 3);

        let manager = UserContext::new("am-1", Role::AccountManager);
        let seen = visible_contacts(&manager, &contacts);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].name, "alice");

        let freelancer = UserContext::new("fl-1", Role::Freelancer);
        let seen = visible_contacts(&freelancer, &contacts);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].name, "bob");
    }

    #[test]
    fn test_role_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&Role::SuperAdmin).unwrap(), "\"super_admin\"");
        assert_eq!(Role::AccountManager.to_string(), "account_manager");
    }
}
