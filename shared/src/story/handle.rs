use serde::{Deserialize, Serialize};

use super::{StoryKind, TextStyle};
use crate::feed::Visibility;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct StoryDescriptor {
    #[serde(rename = "type", default)]
    pub kind: StoryKind,
    #[serde(default)]
    pub text: String,
    pub text_style: Option<TextStyle>,
    /// Required for image and video stories.
    #[serde(default)]
    pub media: Vec<String>,
    #[serde(default)]
    pub visibility: Visibility,
}
