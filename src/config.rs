use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use anyhow::{Result, Context};
use colored::*;
use crate::colors;
use crate::manifest::ManifestError;
use crate::{
    DEFAULT_CONFIG_FILE, DEFAULT_CONTEXTS_DIR, DEFAULT_FIRST_ID, DEFAULT_LAST_ID,
    DEFAULT_OUTPUT_FILE, DEFAULT_SRC_PREFIX, IMAGE_EXTENSIONS, VIDEO_EXTENSIONS,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    // Paths
    pub contexts_dir: PathBuf,
    pub output_file: PathBuf,

    // Classification
    pub image_extensions: Vec<String>,
    pub video_extensions: Vec<String>,

    // Scan range and output shape
    pub first_id: u32,
    pub last_id: u32,
    pub src_prefix: String,
    pub sort_listing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            contexts_dir: PathBuf::from(DEFAULT_CONTEXTS_DIR),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            image_extensions: IMAGE_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            video_extensions: VIDEO_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
            first_id: DEFAULT_FIRST_ID,
            last_id: DEFAULT_LAST_ID,
            src_prefix: DEFAULT_SRC_PREFIX.to_string(),
            sort_listing: true,
        }
    }
}

impl Config {
    /// Config used for a root/output pair with every other setting at its default
    pub fn new(contexts_dir: impl Into<PathBuf>, output_file: impl Into<PathBuf>) -> Self {
        Self {
            contexts_dir: contexts_dir.into(),
            output_file: output_file.into(),
            ..Self::default()
        }
    }

    /// Load config from an explicit path, the working-directory default, or fall back to defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::load_from(path)?,
            None => {
                let local = PathBuf::from(DEFAULT_CONFIG_FILE);
                if local.exists() {
                    Self::load_from(&local)?
                } else {
                    Self::default()
                }
            }
        };

        config.validate()?;
        Ok(config.normalized())
    }

    fn load_from(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Save config to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        // Write to temp file first
        let temp_path = path.with_extension("json.tmp");
        let data = serde_json::to_string_pretty(self)
            .context("Failed to serialize config")?;
        fs::write(&temp_path, &data)
            .context("Failed to write temp config")?;

        // Atomically rename temp file to final location
        fs::rename(&temp_path, path)
            .context("Failed to finalize config")?;

        Ok(())
    }

    pub fn validate(&self) -> Result<(), ManifestError> {
        if self.first_id > self.last_id {
            return Err(ManifestError::InvalidRange {
                first: self.first_id,
                last: self.last_id,
            });
        }
        Ok(())
    }

    /// Lowercase extensions and drop any leading dot so ".JPG" and "jpg" match alike
    pub fn normalized(mut self) -> Self {
        self.image_extensions = normalize_extensions(&self.image_extensions);
        self.video_extensions = normalize_extensions(&self.video_extensions);
        self
    }

    /// Identifiers scanned, in order
    pub fn ids(&self) -> impl Iterator<Item = u32> {
        self.first_id..=self.last_id
    }

    /// Display current configuration
    pub fn display(&self) {
        println!("{}", "🔧 CURRENT CONFIGURATION".bold().color(colors::HEADER));
        println!();

        println!("{} Contexts folder: {}", "•".cyan(),
            self.contexts_dir.display().to_string().color(colors::PATH));
        println!("{} Output file: {}", "•".cyan(),
            self.output_file.display().to_string().color(colors::PATH));
        println!("{} Identifiers: {}..={}", "•".cyan(), self.first_id, self.last_id);
        println!("{} Image extensions: {}", "•".cyan(), self.image_extensions.join(", "));
        println!("{} Video extensions: {}", "•".cyan(), self.video_extensions.join(", "));
        println!("{} Source prefix: {}/<id>/<file>", "•".cyan(), self.src_prefix);
        println!("{} Listing order: {}", "•".cyan(),
            if self.sort_listing { "Sorted by file name" } else { "As returned by the filesystem" });
    }
}

fn normalize_extensions(extensions: &[String]) -> Vec<String> {
    extensions
        .iter()
        .map(|ext| ext.trim().trim_start_matches('.').to_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_original_script() {
        let config = Config::default();
        assert_eq!(config.first_id, 1);
        assert_eq!(config.last_id, 50);
        assert_eq!(config.ids().count(), 50);
        assert_eq!(config.image_extensions, vec!["jpg", "jpeg", "png", "gif", "webp"]);
        assert_eq!(config.video_extensions, vec!["mp4", "webm", "mov"]);
        assert_eq!(config.output_file, PathBuf::from("data/contexts.json"));
    }

    #[test]
    fn normalizes_dotted_and_uppercase_extensions() {
        let config = Config {
            image_extensions: vec![".JPG".into(), "Png".into(), " ".into()],
            ..Config::default()
        }
        .normalized();
        assert_eq!(config.image_extensions, vec!["jpg", "png"]);
    }

    #[test]
    fn partial_config_file_keeps_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("context_gen.json");
        fs::write(&path, r#"{ "last_id": 3, "video_extensions": [".MKV"] }"#).unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.first_id, 1);
        assert_eq!(config.last_id, 3);
        assert_eq!(config.video_extensions, vec!["mkv"]);
        assert_eq!(config.image_extensions.len(), 5);
    }

    #[test]
    fn rejects_inverted_range() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("context_gen.json");
        fs::write(&path, r#"{ "first_id": 10, "last_id": 2 }"#).unwrap();

        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("context_gen.json");
        let config = Config {
            sort_listing: false,
            src_prefix: "media".into(),
            ..Config::new(dir.path().join("contexts"), dir.path().join("out.json"))
        };

        config.save(&path).unwrap();
        assert!(!path.with_extension("json.tmp").exists());
        assert_eq!(Config::load(Some(&path)).unwrap(), config);
    }
}
