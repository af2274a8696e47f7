use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A registered account. The password hash travels with the record inside
/// the backend but is never serialized outward.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub id: i64,
    pub user_id: i64,
    pub message_text: String,
    pub sender_type: SenderType,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SenderType {
    User,
    System,
}

impl SenderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SenderType::User => "user",
            SenderType::System => "system",
        }
    }
}

impl fmt::Display for SenderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SenderType {
    type Err = UnknownSenderType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(SenderType::User),
            "system" => Ok(SenderType::System),
            other => Err(UnknownSenderType(other.to_string())),
        }
    }
}

#[derive(Debug)]
pub struct UnknownSenderType(pub String);

impl fmt::Display for UnknownSenderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sender type '{}'", self.0)
    }
}

impl std::error::Error for UnknownSenderType {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_never_serializes_password_hash() {
        let user = User {
            id: 7,
            email: "a@b.test".into(),
            password_hash: b"$argon2id$secret".to_vec(),
            created_at: Utc::now(),
            is_active: true,
        };

        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("password"));
        assert!(!json.contains("argon2id"));
        assert!(json.contains("\"email\":\"a@b.test\""));
    }

    #[test]
    fn sender_type_round_trips_as_lowercase() {
        assert_eq!(SenderType::System.as_str(), "system");
        assert_eq!("user".parse::<SenderType>().unwrap(), SenderType::User);
        assert!("bot".parse::<SenderType>().is_err());
    }
}
