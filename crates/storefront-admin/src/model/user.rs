use super::UserId;
use admin_framework::Resource;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Editor,
    Vendor,
    #[default]
    Customer,
}

impl UserRole {
    pub fn as_str(self) -> &'static str {
        match self {
            UserRole::Admin => "admin",
            UserRole::Editor => "editor",
            UserRole::Vendor => "vendor",
            UserRole::Customer => "customer",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A back-office or storefront account. Also the session user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    /// Roles this account may switch to.
    #[serde(default)]
    pub roles: Vec<UserRole>,
    #[serde(default = "active_by_default")]
    pub active: bool,
    #[serde(default)]
    pub created_at: Option<String>,
}

fn active_by_default() -> bool {
    true
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }
}

impl Resource for User {
    type Id = UserId;
    type Create = UserCreate;
    type Update = UserUpdate;
    const PATH: &'static str = "users";

    fn id(&self) -> &UserId {
        &self.id
    }
}

#[derive(Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCreate {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

// Keep passwords out of logs.
impl fmt::Debug for UserCreate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCreate")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("role", &self.role)
            .finish()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<UserRole>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_debug_hides_password() {
        let create = UserCreate {
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password: "correct horse".into(),
            role: UserRole::Editor,
        };
        assert!(!format!("{:?}", create).contains("correct horse"));
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": 1, "name": "Ada", "email": "ada@example.com"
        }))
        .unwrap();
        assert!(user.active);
        assert_eq!(user.role, UserRole::Customer);
        assert!(!user.is_admin());
    }
}
