use serde::{Deserialize, Serialize};

use super::{Role, UserProfile};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SignupDescriptor {
    pub first_name: String,
    pub last_name: String,
    pub email: lettre::Address,
    pub username: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginDescriptor {
    pub email: lettre::Address,
    pub password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GoogleLoginDescriptor {
    /// The ID token handed to the frontend by Google sign-in.
    pub id_token: String,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginResult {
    /// Bearer credential in `{account}:{token}` form.
    pub token: String,
    pub user: UserProfile,
}

/// Profile fields to change, absent fields are left untouched.
///
/// Blank strings clear optional fields.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct UpdateProfileDescriptor {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub role: Option<Role>,
    pub department: Option<String>,
    pub batch_year: Option<u16>,
    pub student_id: Option<String>,
    pub orgs: Option<Vec<String>>,
    pub avatar: Option<String>,
    pub background_image: Option<String>,
    pub bio: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChangePasswordDescriptor {
    pub old_password: String,
    pub new_password: String,
    pub confirm_new_password: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct SearchUsersQuery {
    /// Case-insensitive fragment of a username or full name.
    pub q: Option<String>,
}
