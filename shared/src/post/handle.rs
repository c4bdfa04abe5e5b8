use serde::{Deserialize, Serialize};

use crate::feed::Visibility;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct PostDescriptor {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub media: Vec<String>,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub tags: Vec<String>,
    pub related_course: Option<String>,
}

/// Edits to apply to a post, absent fields are left untouched.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct EditPostDescriptor {
    pub text: Option<String>,
    pub media: Option<Vec<String>>,
    pub visibility: Option<Visibility>,
    pub tags: Option<Vec<String>>,
    /// A blank course removes the relation.
    pub related_course: Option<String>,
}
