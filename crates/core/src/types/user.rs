//! Signed-in user profile.

use serde::{Deserialize, Serialize};

use super::status::Role;

/// Identifier used for guest sessions.
pub const GUEST_ID: &str = "guest";

/// The current user of a session.
///
/// Users are not stored in the database: the profile comes from whichever
/// identity provider signed them in and lives in the session until logout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    /// Email address; also the owner key for tasks. Empty for guests
    /// without one.
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub picture: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl User {
    /// A guest user with the given role.
    #[must_use]
    pub fn guest(role: Role) -> Self {
        Self {
            id: GUEST_ID.to_owned(),
            name: "Guest Farmer".to_owned(),
            email: "guest@shetiman.app".to_owned(),
            role,
            picture: None,
            phone: None,
        }
    }

    /// Whether this is a guest session.
    #[must_use]
    pub fn is_guest(&self) -> bool {
        self.id == GUEST_ID
    }

    /// Whether this user may manage products and fulfil orders.
    #[must_use]
    pub fn is_supplier(&self) -> bool {
        self.role == Role::Supplier
    }

    /// Key used to own tasks and orders: the email, or the id for
    /// phone-only accounts.
    #[must_use]
    pub fn owner_key(&self) -> &str {
        if self.email.is_empty() {
            &self.id
        } else {
            &self.email
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_is_guest() {
        let guest = User::guest(Role::Supplier);
        assert!(guest.is_guest());
        assert!(guest.is_supplier());
        assert_eq!(guest.owner_key(), "guest@shetiman.app");
    }

    #[test]
    fn test_serializes_camel_case_without_empty_optionals() {
        let user = User {
            id: "u-1".to_owned(),
            name: "Asha".to_owned(),
            email: "asha@example.in".to_owned(),
            role: Role::Farmer,
            picture: None,
            phone: Some("+919800000000".to_owned()),
        };
        let json = serde_json::to_value(&user).unwrap_or_default();
        assert_eq!(json["role"], "farmer");
        assert_eq!(json["phone"], "+919800000000");
        assert!(json.get("picture").is_none());
        assert!(!user.is_guest());
    }

    #[test]
    fn test_owner_key_falls_back_to_id() {
        let user = User {
            id: "5f0c-phone".to_owned(),
            name: "Ravi".to_owned(),
            email: String::new(),
            role: Role::Farmer,
            picture: None,
            phone: Some("+919811111111".to_owned()),
        };
        assert_eq!(user.owner_key(), "5f0c-phone");
    }
}
