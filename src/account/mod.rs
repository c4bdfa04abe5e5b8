pub mod google;
pub mod handle;
pub mod verify;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use adnuverse_shared::account::*;
use adnuverse_shared::account::handle::{ChangePasswordDescriptor, UpdateProfileDescriptor};

use crate::{store::Record, Error};

/// Whether two addresses are equal, ignoring case.
pub fn same_email(a: &lettre::Address, b: &lettre::Address) -> bool {
    AsRef::<str>::as_ref(a).eq_ignore_ascii_case(AsRef::<str>::as_ref(b))
}

/// Represent an account.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Account {
    /// Identifier of this user.
    pub id: u64,
    pub username: String,
    pub email: lettre::Address,
    /// Salted digest of the password, absent for accounts created by Google sign-in.
    pub password_sha: Option<String>,
    /// Subject of the linked Google account.
    pub google_id: Option<String>,
    /// Attributes of this user.
    pub attributes: UserAttributes,
    #[serde(default)]
    pub followers: Vec<u64>,
    #[serde(default)]
    pub following: Vec<u64>,
    /// This account's token manager.
    #[serde(default)]
    pub tokens: verify::Tokens,
    pub created_at: DateTime<Utc>,
}

/// Editable attributes of a user.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct UserAttributes {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
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
}

impl Record for Account {
    const KIND: &'static str = "account";

    #[inline]
    fn id(&self) -> u64 {
        self.id
    }
}

/// Digest of `password` salted with the account id.
fn password_digest(id: u64, password: &str) -> String {
    sha256::digest(format!("{id}:{password}"))
}

/// Trims `value`, mapping blank strings to `None`.
fn non_blank(value: String) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

impl Account {
    /// Creates an account without password.
    ///
    /// # Errors
    ///
    /// - Errors if the username is not valid.
    pub fn new(
        id: u64,
        username: String,
        email: lettre::Address,
        first_name: String,
        last_name: String,
    ) -> Result<Self, Error> {
        if !username_valid(&username) {
            return Err(Error::InvalidUsername);
        }
        Ok(Self {
            id,
            username,
            email,
            password_sha: None,
            google_id: None,
            attributes: UserAttributes {
                first_name: first_name.trim().to_owned(),
                last_name: last_name.trim().to_owned(),
                ..Default::default()
            },
            followers: vec![],
            following: vec![],
            tokens: verify::Tokens::new(),
            created_at: Utc::now(),
        })
    }

    /// Sets the password of this account.
    ///
    /// # Errors
    ///
    /// - Errors if the password length is out of range.
    pub fn set_password(&mut self, password: &str) -> Result<(), Error> {
        if !password_len_valid(password) {
            return Err(Error::PasswordLength);
        }
        self.password_sha = Some(password_digest(self.id, password));
        Ok(())
    }

    /// Whether `password` is the password of this account.
    pub fn password_matches(&self, password: &str) -> bool {
        self.password_sha
            .as_deref()
            .map_or(false, |sha| sha == password_digest(self.id, password))
    }

    /// Issues a new token, returned in `{account}:{token}` form.
    pub fn issue_token(&mut self, expiration_days: u16) -> String {
        let token = self.tokens.new_token(self.id, expiration_days);
        format!("{}:{token}", self.id)
    }

    /// Login into the account and return back a credential in a `Result`.
    pub fn login(&mut self, password: &str, expiration_days: u16) -> Result<String, Error> {
        if self.password_matches(password) {
            Ok(self.issue_token(expiration_days))
        } else {
            Err(Error::UsernameOrPasswordIncorrect)
        }
    }

    /// Changes the password of this account.
    ///
    /// Accounts without password can't change it.
    pub fn change_password(&mut self, descriptor: &ChangePasswordDescriptor) -> Result<(), Error> {
        if !self.password_matches(&descriptor.old_password) {
            return Err(Error::PasswordIncorrect);
        }
        if descriptor.new_password != descriptor.confirm_new_password {
            return Err(Error::PasswordMismatch);
        }
        self.set_password(&descriptor.new_password)
    }

    /// Applies profile edits, blank strings clear optional fields.
    ///
    /// # Errors
    ///
    /// - Errors if a name is blank or an image is not a media url.
    pub fn apply(&mut self, descriptor: UpdateProfileDescriptor) -> Result<(), Error> {
        let mut attributes = self.attributes.clone();

        if let Some(first_name) = descriptor.first_name {
            attributes.first_name = non_blank(first_name).ok_or(Error::InvalidField {
                field: "first_name",
                reason: "must not be blank",
            })?;
        }
        if let Some(last_name) = descriptor.last_name {
            attributes.last_name = non_blank(last_name).ok_or(Error::InvalidField {
                field: "last_name",
                reason: "must not be blank",
            })?;
        }
        if let Some(role) = descriptor.role {
            attributes.role = role;
        }
        if let Some(department) = descriptor.department {
            attributes.department = non_blank(department);
        }
        if let Some(batch_year) = descriptor.batch_year {
            attributes.batch_year = Some(batch_year);
        }
        if let Some(student_id) = descriptor.student_id {
            attributes.student_id = non_blank(student_id);
        }
        if let Some(orgs) = descriptor.orgs {
            attributes.orgs = orgs.into_iter().filter_map(non_blank).collect();
        }
        if let Some(avatar) = descriptor.avatar {
            attributes.avatar = crate::content::media_field("avatar", avatar)?;
        }
        if let Some(background_image) = descriptor.background_image {
            attributes.background_image =
                crate::content::media_field("background_image", background_image)?;
        }
        if let Some(bio) = descriptor.bio {
            attributes.bio = bio.trim().to_owned();
        }

        self.attributes = attributes;
        Ok(())
    }

    /// Get the public profile of this user.
    pub fn profile(&self) -> UserProfile {
        let a = &self.attributes;
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            first_name: a.first_name.clone(),
            last_name: a.last_name.clone(),
            role: a.role,
            department: a.department.clone(),
            batch_year: a.batch_year,
            student_id: a.student_id.clone(),
            orgs: a.orgs.clone(),
            avatar: a.avatar.clone(),
            background_image: a.background_image.clone(),
            bio: a.bio.clone(),
            followers: self.followers.clone(),
            following: self.following.clone(),
            created_at: self.created_at,
        }
    }

    /// The author reference embedded into content of this user.
    pub fn author(&self) -> Author {
        Author {
            id: self.id,
            username: self.username.clone(),
            first_name: self.attributes.first_name.clone(),
            last_name: self.attributes.last_name.clone(),
            avatar: self.attributes.avatar.clone(),
            department: self.attributes.department.clone(),
            followers: self.followers.clone(),
        }
    }

    /// Whether `query` is part of the username or the full name, ignoring case.
    pub fn matches(&self, query: &str) -> bool {
        let query = query.to_lowercase();
        self.username.to_lowercase().contains(&query)
            || format!("{} {}", self.attributes.first_name, self.attributes.last_name)
                .to_lowercase()
                .contains(&query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account() -> Account {
        let mut account = Account::new(
            12,
            "juan.dc".to_owned(),
            lettre::Address::new("juan", "gbox.adnu.edu.ph").unwrap(),
            "Juan".to_owned(),
            "Dela Cruz".to_owned(),
        )
        .unwrap();
        account.set_password("password123").unwrap();
        account
    }

    #[test]
    fn password_is_salted() {
        let a = account();
        let mut b = a.clone();
        b.id = 13;
        b.set_password("password123").unwrap();
        assert_ne!(a.password_sha, b.password_sha);
        assert!(a.password_matches("password123"));
        assert!(!a.password_matches("password124"));
    }

    #[test]
    fn login_issues_credential() {
        let mut a = account();
        let credential = a.login("password123", 7).unwrap();
        let (id, token) = credential.split_once(':').unwrap();
        assert_eq!(id, "12");
        assert!(a.tokens.token_usable(token));

        assert!(matches!(
            a.login("wrong-password", 7),
            Err(Error::UsernameOrPasswordIncorrect)
        ));
    }

    #[test]
    fn change_password_checks() {
        let mut a = account();
        let descriptor = |old: &str, new: &str, confirm: &str| ChangePasswordDescriptor {
            old_password: old.to_owned(),
            new_password: new.to_owned(),
            confirm_new_password: confirm.to_owned(),
        };

        assert!(matches!(
            a.change_password(&descriptor("nope-nope", "newpassword", "newpassword")),
            Err(Error::PasswordIncorrect)
        ));
        assert!(matches!(
            a.change_password(&descriptor("password123", "newpassword", "newpassw0rd")),
            Err(Error::PasswordMismatch)
        ));
        assert!(matches!(
            a.change_password(&descriptor("password123", "short", "short")),
            Err(Error::PasswordLength)
        ));
        a.change_password(&descriptor("password123", "newpassword", "newpassword"))
            .unwrap();
        assert!(a.password_matches("newpassword"));
    }

    #[test]
    fn apply_profile_edits() {
        let mut a = account();
        a.apply(UpdateProfileDescriptor {
            department: Some(" Computer Science ".to_owned()),
            orgs: Some(vec!["ACM".to_owned(), " ".to_owned()]),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(a.attributes.department.as_deref(), Some("Computer Science"));
        assert_eq!(a.attributes.orgs, ["ACM"]);

        a.apply(UpdateProfileDescriptor {
            department: Some(String::new()),
            ..Default::default()
        })
        .unwrap();
        assert_eq!(a.attributes.department, None);

        let before = a.attributes.clone();
        assert!(a
            .apply(UpdateProfileDescriptor {
                bio: Some("changed".to_owned()),
                avatar: Some("not a url".to_owned()),
                ..Default::default()
            })
            .is_err());
        assert_eq!(a.attributes, before);
    }

    #[test]
    fn search_matches_name() {
        let a = account();
        assert!(a.matches("JUAN.D"));
        assert!(a.matches("n dela"));
        assert!(!a.matches("maria"));
    }

    #[test]
    fn emails_compare_ignoring_case() {
        let lower = lettre::Address::new("maria.santos", "gbox.adnu.edu.ph").unwrap();
        let mixed = lettre::Address::new("Maria.Santos", "GBOX.adnu.edu.ph").unwrap();
        let other = lettre::Address::new("maria", "gbox.adnu.edu.ph").unwrap();

        assert!(same_email(&lower, &mixed));
        assert!(!same_email(&lower, &other));
    }
}
