pub mod handle;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents the role of a campus member.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    #[default]
    Student,
    Faculty,
    Staff,
}

/// Represents a user's public profile.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub id: u64,
    pub username: String,
    pub email: lettre::Address,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub department: Option<String>,
    pub batch_year: Option<u16>,
    pub student_id: Option<String>,
    #[serde(default)]
    pub orgs: Vec<String>,
    pub avatar: Option<String>,
    pub background_image: Option<String>,
    #[serde(default)]
    pub bio: String,
    /// Accounts following this user.
    #[serde(default)]
    pub followers: Vec<u64>,
    /// Accounts this user follows.
    #[serde(default)]
    pub following: Vec<u64>,
    pub created_at: DateTime<Utc>,
}

/// Author of a content item, populated from the account store
/// when the item is read.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Author {
    pub id: u64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub avatar: Option<String>,
    pub department: Option<String>,
    #[serde(default)]
    pub followers: Vec<u64>,
}

/// Accepted password lengths, in characters.
pub const PASSWORD_LEN: std::ops::RangeInclusive<usize> = 8..=64;

/// Whether `password` has an accepted length.
#[inline]
pub fn password_len_valid(password: &str) -> bool {
    PASSWORD_LEN.contains(&password.chars().count())
}

/// Whether `username` is 3 to 30 characters of ascii letters, digits, `_` or `.`.
pub fn username_valid(username: &str) -> bool {
    (3..=30).contains(&username.len())
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_bounds() {
        assert!(!password_len_valid("1234567"));
        assert!(password_len_valid("12345678"));
        assert!(password_len_valid(&"x".repeat(64)));
        assert!(!password_len_valid(&"x".repeat(65)));
    }

    #[test]
    fn usernames() {
        assert!(username_valid("juan.dela_cruz"));
        assert!(!username_valid("ab"));
        assert!(!username_valid("has space"));
        assert!(!username_valid("ñandu"));
    }
}
