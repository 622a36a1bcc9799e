//! context_gen - builds the contexts.json media manifest

pub mod config;
pub mod media;
pub mod manifest;
pub mod builder;
pub mod cli;

// Re-exports for easy access
pub use config::Config;
pub use media::{MediaEntry, MediaType};
pub use manifest::{ContextRecord, Manifest, ManifestError};
pub use builder::{BuildReport, FolderOutcome, ManifestBuilder};
pub use cli::{Cli, Commands};

pub mod colors {
    use colored::Color;

    pub const SUCCESS: Color = Color::TrueColor { r: 77, g: 255, b: 157 };
    pub const HEADER: Color = Color::TrueColor { r: 157, g: 77, b: 255 };
    pub const PATH: Color = Color::TrueColor { r: 77, g: 195, b: 255 };
    pub const WARNING: Color = Color::TrueColor { r: 255, g: 217, b: 61 };
    pub const MUTED: Color = Color::TrueColor { r: 140, g: 140, b: 160 };
}

/// Default root holding the numbered context folders
pub const DEFAULT_CONTEXTS_DIR: &str = "contexts";

/// Default manifest location
pub const DEFAULT_OUTPUT_FILE: &str = "data/contexts.json";

/// Config file picked up from the working directory when no --config is given
pub const DEFAULT_CONFIG_FILE: &str = "context_gen.json";

/// Default identifier range (inclusive)
pub const DEFAULT_FIRST_ID: u32 = 1;
pub const DEFAULT_LAST_ID: u32 = 50;

/// Prefix of every `src` entry
pub const DEFAULT_SRC_PREFIX: &str = "contexts";

/// Image extensions
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Video extensions
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "webm", "mov"];
