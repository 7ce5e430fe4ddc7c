use super::{record_id, require};
use resource_framework::AdminResource;
use serde::{Deserialize, Serialize};

record_id!(
    /// Type-safe identifier for admin Users.
    UserId
);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Editor,
}

/// An account that can sign in to the admin site.
///
/// The signed-in user is passed to the delete controller as the acting identity, which
/// is what stops an admin from deleting their own account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Form data for a user. `password` is only sent when set; an edit that leaves it empty
/// keeps the current one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

const MIN_PASSWORD_LEN: usize = 8;

impl AdminResource for User {
    type Id = UserId;
    type Payload = UserForm;
    const COLLECTION: &'static str = "users";
    const LABEL: &'static str = "User";

    fn id(&self) -> &UserId {
        &self.id
    }

    fn to_payload(&self) -> UserForm {
        UserForm {
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            password: None,
        }
    }

    fn validate(form: &UserForm) -> Result<(), String> {
        require(&form.name, "Name is required")?;
        let email = form.email.trim();
        match email.split_once('@') {
            Some((local, domain)) if !local.is_empty() && domain.contains('.') => {}
            _ => return Err("Enter a valid email address".to_string()),
        }
        if let Some(password) = &form.password {
            if password.chars().count() < MIN_PASSWORD_LEN {
                return Err(format!(
                    "Password must be at least {MIN_PASSWORD_LEN} characters"
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(email: &str, password: Option<&str>) -> UserForm {
        UserForm {
            name: "Alice".to_string(),
            email: email.to_string(),
            role: Role::Admin,
            password: password.map(str::to_string),
        }
    }

    #[test]
    fn test_validate_user_form() {
        assert!(User::validate(&form("alice@example.com", None)).is_ok());
        assert_eq!(
            User::validate(&form("alice", None)),
            Err("Enter a valid email address".to_string())
        );
        assert_eq!(
            User::validate(&form("alice@example.com", Some("short"))),
            Err("Password must be at least 8 characters".to_string())
        );
    }

    #[test]
    fn test_edit_form_omits_password() {
        let user = User {
            id: UserId(3),
            name: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            role: Role::Admin,
        };
        let json = serde_json::to_value(user.to_payload()).unwrap();
        assert!(json.get("password").is_none());
        assert_eq!(json["role"], "admin");
    }
}
