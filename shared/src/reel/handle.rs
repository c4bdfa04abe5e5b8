use serde::{Deserialize, Serialize};

use crate::feed::Visibility;

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct ReelDescriptor {
    pub video_url: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default)]
    pub visibility: Visibility,
    #[serde(default)]
    pub tags: Vec<String>,
    pub related_course: Option<String>,
}
