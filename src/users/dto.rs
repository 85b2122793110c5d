use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Request body for login.
#[derive(Debug, Clone, Deserialize)]
pub struct UserLogin {
    pub username: String,
    pub password: String,
}

/// Request body for registration and for full updates.
#[derive(Debug, Clone, Deserialize)]
pub struct UserRegister {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl UserRegister {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.username.is_empty() {
            return Err(AppError::Validation("username must not be empty".into()));
        }
        if !is_valid_email(&self.email) {
            return Err(AppError::Validation("email must be a valid email".into()));
        }
        Ok(())
    }
}

/// Query string of `/users/search`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserQuery {
    pub id: Option<i32>,
    pub username: Option<String>,
    pub email: Option<String>,
}

impl UserQuery {
    pub fn by_id(id: i32) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn by_username(username: &str) -> Self {
        Self {
            username: Some(username.to_string()),
            ..Self::default()
        }
    }

    pub fn by_email(email: &str) -> Self {
        Self {
            email: Some(email.to_string()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DeleteParams {
    #[serde(default, deserialize_with = "crate::extract::flag")]
    pub delete: bool,
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserPublic {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub full_name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsersPublic {
    pub users: Vec<UserPublic>,
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registration(email: &str) -> UserRegister {
        UserRegister {
            username: "alice".into(),
            password: "pw1".into(),
            first_name: "Alice".into(),
            last_name: "Lee".into(),
            email: email.into(),
        }
    }

    #[test]
    fn accepts_plain_addresses() {
        assert!(is_valid_email("alice@example.com"));
        assert!(is_valid_email("a.b+tag@sub.example.org"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        for bad in ["", "alice", "alice@", "@example.com", "alice@example", "al ice@example.com"] {
            assert!(!is_valid_email(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn registration_validation() {
        assert!(registration("alice@example.com").validate().is_ok());
        assert!(matches!(
            registration("not-an-email").validate(),
            Err(AppError::Validation(_))
        ));

        let mut nameless = registration("alice@example.com");
        nameless.username.clear();
        assert!(matches!(nameless.validate(), Err(AppError::Validation(_))));
    }

    #[test]
    fn register_body_requires_every_field() {
        let err = serde_json::from_str::<UserRegister>(
            r#"{"username":"alice","password":"pw1","email":"alice@example.com"}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("first_name"));
    }

    #[test]
    fn delete_flag_defaults_to_false() {
        let params: DeleteParams = serde_json::from_str("{}").unwrap();
        assert!(!params.delete);
    }

    #[test]
    fn users_public_serializes_under_users_key() {
        let body = UsersPublic {
            users: vec![UserPublic {
                id: 1,
                username: "alice".into(),
                email: "alice@example.com".into(),
                full_name: "Alice Lee".into(),
            }],
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["users"][0]["full_name"], "Alice Lee");
        assert_eq!(json["users"][0]["id"], 1);
    }
}
