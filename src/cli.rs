use clap::{Parser, Subcommand, Args};
use std::path::PathBuf;
use crate::config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "context_gen",
    about = "Builds the contexts.json media manifest from numbered context folders",
    version,
    long_about = "context_gen scans the numbered folders under the contexts directory\n\
                  (1 through 50 by default), picks out images and videos by extension\n\
                  and writes a JSON manifest mapping each folder number to its media.\n\n\
                  Folders that are missing or unreadable are skipped and left out\n\
                  of the manifest. Empty folders are kept with an empty media list."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (defaults to ./context_gen.json when present)
    #[arg(long = "config", global = true, env = "CONTEXT_GEN_CONFIG")]
    pub config_file: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Scan the context folders and write the manifest
    Build(BuildArgs),

    /// Exit non-zero when the manifest on disk is missing or out of date
    Check(PathArgs),

    /// Show the media recorded for one identifier
    Show(ShowArgs),

    /// Show the effective configuration, or write it out with --init
    Config(ConfigArgs),
}

#[derive(Args, Debug, Default)]
pub struct PathArgs {
    /// Folder holding the numbered context folders
    #[arg(short = 'd', long)]
    pub contexts_dir: Option<PathBuf>,

    /// Manifest file to write or compare against
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    #[command(flatten)]
    pub paths: PathArgs,

    /// Keep entries in filesystem listing order instead of sorting by name
    #[arg(long)]
    pub listing_order: bool,
}

#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// Write the effective configuration to the config file
    #[arg(long)]
    pub init: bool,

    /// Overwrite an existing config file when used with --init
    #[arg(long, requires = "init")]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Identifier to look up
    pub id: u32,

    /// Manifest file to read
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

impl PathArgs {
    /// Apply command-line overrides on top of the loaded config
    pub fn apply(&self, config: &mut Config) {
        if let Some(dir) = &self.contexts_dir {
            config.contexts_dir = dir.clone();
        }
        if let Some(output) = &self.output {
            config.output_file = output.clone();
        }
    }
}
