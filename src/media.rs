//! Media type detection

use serde::{Deserialize, Serialize};
use std::fmt;
use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
}

impl MediaType {
    /// Classify a file name by its extension, ignoring case
    ///
    /// Only the text after the last dot counts. Leading dots are part of the
    /// stem, so ".png" and "..png" have no extension.
    pub fn classify(file_name: &str, config: &Config) -> Option<Self> {
        let lower = file_name.to_lowercase();
        let (_, ext) = lower.trim_start_matches('.').rsplit_once('.')?;

        if config.image_extensions.iter().any(|e| e == ext) {
            Some(MediaType::Image)
        } else if config.video_extensions.iter().any(|e| e == ext) {
            Some(MediaType::Video)
        } else {
            None
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MediaType::Image => "image",
            MediaType::Video => "video",
        };
        f.pad(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaEntry {
    #[serde(rename = "type")]
    pub media_type: MediaType,
    pub src: String,
}

impl MediaEntry {
    /// Entry for `file_name` inside folder `id`; `src` always uses forward slashes
    pub fn new(media_type: MediaType, prefix: &str, id: u32, file_name: &str) -> Self {
        Self {
            media_type,
            src: format!("{}/{}/{}", prefix, id, file_name),
        }
    }
}
