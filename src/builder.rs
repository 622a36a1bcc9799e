use std::path::Path;
use chrono::{DateTime, Duration, Local, Utc};
use walkdir::WalkDir;
use colored::*;
use crate::colors;
use crate::config::Config;
use crate::manifest::{ContextRecord, Manifest, ManifestError};
use crate::media::{MediaEntry, MediaType};

/// What happened to one numbered folder during a build
#[derive(Debug, Clone, PartialEq)]
pub enum FolderOutcome {
    Missing,
    Unreadable(String),
    Scanned { media: usize },
}

#[derive(Debug)]
pub struct BuildReport {
    pub manifest: Manifest,
    pub outcomes: Vec<(u32, FolderOutcome)>,
    pub started_at: DateTime<Utc>,
    pub scan_duration: Duration,
}

impl BuildReport {
    pub fn outcome(&self, id: u32) -> Option<&FolderOutcome> {
        self.outcomes.iter().find(|(i, _)| *i == id).map(|(_, o)| o)
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|(_, o)| !matches!(o, FolderOutcome::Scanned { .. }))
            .count()
    }
}

pub struct ManifestBuilder {
    config: Config,
}

impl ManifestBuilder {
    pub fn new(config: Config) -> Self {
        Self { config: config.normalized() }
    }

    /// Scan every numbered folder and assemble the manifest in memory
    pub fn build(&self) -> BuildReport {
        let started_at = Utc::now();
        let mut manifest = Manifest::new();
        let mut outcomes = Vec::new();

        println!("{} {}", "🔍 Scanning:".color(colors::HEADER),
            self.config.contexts_dir.display().to_string().color(colors::PATH));

        for id in self.config.ids() {
            let outcome = match self.scan_folder(id) {
                Ok(record) => {
                    let media = record.media.len();
                    if media > 0 {
                        println!("{} Context #{}: {} media file{}", "✓".color(colors::SUCCESS),
                            id, media, if media == 1 { "" } else { "s" });
                    } else {
                        println!("  Context #{}: {}", id, "empty".color(colors::MUTED));
                    }
                    manifest.insert(id, record);
                    FolderOutcome::Scanned { media }
                }
                Err(outcome) => {
                    match &outcome {
                        FolderOutcome::Unreadable(reason) => println!("{} Cannot read folder {}: {}",
                            "⚠️".yellow(), id, reason),
                        _ => println!("{} Folder {} does not exist", "•".color(colors::MUTED), id),
                    }
                    outcome
                }
            };
            outcomes.push((id, outcome));
        }

        BuildReport {
            manifest,
            outcomes,
            started_at,
            scan_duration: Utc::now() - started_at,
        }
    }

    /// Build, then write the manifest to the configured output file
    pub fn run(&self) -> Result<BuildReport, ManifestError> {
        let report = self.build();
        report.manifest.write(&self.config.output_file)?;
        Ok(report)
    }

    /// Classify the direct children of one folder; `Err` carries the skip reason
    fn scan_folder(&self, id: u32) -> Result<ContextRecord, FolderOutcome> {
        let folder = self.config.contexts_dir.join(id.to_string());

        if !folder.exists() {
            return Err(FolderOutcome::Missing);
        }
        if !folder.is_dir() {
            return Err(FolderOutcome::Unreadable("not a directory".to_string()));
        }

        let names = self.list_names(&folder)
            .map_err(|e| FolderOutcome::Unreadable(e.to_string()))?;

        let media = names
            .iter()
            .filter_map(|name| {
                MediaType::classify(name, &self.config)
                    .map(|kind| MediaEntry::new(kind, &self.config.src_prefix, id, name))
            })
            .collect();

        Ok(ContextRecord { media })
    }

    /// Entry names directly inside `folder`; any read error fails the whole listing
    ///
    /// Names that are not valid UTF-8 cannot be written as a `src` and are skipped.
    fn list_names(&self, folder: &Path) -> Result<Vec<String>, walkdir::Error> {
        let mut walker = WalkDir::new(folder)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false);

        if self.config.sort_listing {
            walker = walker.sort_by_file_name();
        }

        let mut names = Vec::new();
        for entry in walker {
            let entry = entry?;
            match entry.file_name().to_str() {
                Some(name) => names.push(name.to_string()),
                None => println!("{} Skipping non UTF-8 name: {}", "⚠️".yellow(),
                    entry.path().display()),
            }
        }
        Ok(names)
    }

    /// Print the closing summary of a run
    pub fn print_summary(&self, report: &BuildReport, written: bool) {
        println!();
        if written {
            println!("{} Generated {}", "✅".green(),
                self.config.output_file.display().to_string().color(colors::PATH));
        }
        println!("📁 Identifiers processed: {}",
            report.manifest.len().to_string().color(colors::SUCCESS));
        println!("🖼️  Media entries: {}",
            report.manifest.total_media().to_string().color(colors::SUCCESS));
        if report.skipped() > 0 {
            println!("⏭️  Skipped folders: {}",
                report.skipped().to_string().color(colors::WARNING));
        }
        println!("⏱️  Scan time: {} ms, at {}",
            report.scan_duration.num_milliseconds().to_string().dimmed(),
            report.started_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string().dimmed());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn builder_for(root: &Path) -> ManifestBuilder {
        let config = Config {
            last_id: 5,
            ..Config::new(root.join("contexts"), root.join("contexts.json"))
        };
        ManifestBuilder::new(config)
    }

    #[test]
    fn missing_folders_are_omitted() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("contexts").join("2")).unwrap();

        let report = builder_for(dir.path()).build();
        assert_eq!(report.manifest.len(), 1);
        assert!(report.manifest.contains(2));
        assert_eq!(report.outcome(1), Some(&FolderOutcome::Missing));
        assert_eq!(report.outcome(2), Some(&FolderOutcome::Scanned { media: 0 }));
        assert_eq!(report.skipped(), 4);
    }

    #[test]
    fn file_in_place_of_folder_is_skipped() {
        let dir = tempdir().unwrap();
        let contexts = dir.path().join("contexts");
        fs::create_dir_all(&contexts).unwrap();
        fs::write(contexts.join("3"), b"not a folder").unwrap();

        let report = builder_for(dir.path()).build();
        assert!(!report.manifest.contains(3));
        assert!(matches!(report.outcome(3), Some(FolderOutcome::Unreadable(_))));
    }

    #[test]
    fn sorted_listing_orders_entries_by_name() {
        let dir = tempdir().unwrap();
        let folder = dir.path().join("contexts").join("1");
        fs::create_dir_all(&folder).unwrap();
        for name in ["c.png", "a.png", "b.mov"] {
            fs::write(folder.join(name), b"").unwrap();
        }

        let report = builder_for(dir.path()).build();
        let srcs: Vec<_> = report.manifest.get(1).unwrap().media.iter()
            .map(|m| m.src.as_str())
            .collect();
        assert_eq!(srcs, vec!["contexts/1/a.png", "contexts/1/b.mov", "contexts/1/c.png"]);
    }

    #[test]
    fn dotted_uppercase_extensions_in_code_built_config() {
        let dir = tempdir().unwrap();
        let folder = dir.path().join("contexts").join("1");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("a.JPG"), b"").unwrap();
        fs::write(folder.join("b.Mp4"), b"").unwrap();

        let config = Config {
            last_id: 1,
            image_extensions: vec![".JPG".into()],
            video_extensions: vec![".mp4".into()],
            ..Config::new(dir.path().join("contexts"), dir.path().join("contexts.json"))
        };
        let report = ManifestBuilder::new(config).build();
        let kinds: Vec<_> = report.manifest.get(1).unwrap().media.iter()
            .map(|m| m.media_type)
            .collect();
        assert_eq!(kinds, vec![MediaType::Image, MediaType::Video]);
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn non_utf8_names_are_skipped() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let dir = tempdir().unwrap();
        let folder = dir.path().join("contexts").join("2");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("ok.png"), b"").unwrap();
        fs::write(folder.join(OsStr::from_bytes(b"bad\xff.png")), b"").unwrap();

        let report = builder_for(dir.path()).build();
        let srcs: Vec<_> = report.manifest.get(2).unwrap().media.iter()
            .map(|m| m.src.as_str())
            .collect();
        assert_eq!(srcs, vec!["contexts/2/ok.png"]);
    }

    #[test]
    fn custom_prefix_is_used_in_src() {
        let dir = tempdir().unwrap();
        let folder = dir.path().join("contexts").join("4");
        fs::create_dir_all(&folder).unwrap();
        fs::write(folder.join("x.gif"), b"").unwrap();

        let mut builder = builder_for(dir.path());
        builder.config.src_prefix = "static/ctx".to_string();
        let report = builder.build();
        assert_eq!(report.manifest.get(4).unwrap().media[0].src, "static/ctx/4/x.gif");
    }
}
