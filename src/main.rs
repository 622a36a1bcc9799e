use anyhow::{bail, Context, Result};
use clap::Parser;
use colored::*;
use std::path::PathBuf;
use context_gen::cli::{BuildArgs, Cli, Commands, ConfigArgs, PathArgs, ShowArgs};
use context_gen::{colors, Config, Manifest, ManifestBuilder, MediaType, DEFAULT_CONFIG_FILE};

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Disable colors if requested
    if cli.no_color {
        colored::control::set_override(false);
    }

    // `config --init` may name a file that does not exist yet
    let creating = matches!(&cli.command, Commands::Config(args) if args.init)
        && cli.config_file.as_ref().is_some_and(|p| !p.exists());

    let config = if creating {
        Config::default()
    } else {
        Config::load(cli.config_file.as_deref())
            .context("Failed to load configuration")?
    };

    match cli.command {
        Commands::Build(args) => handle_build(config, &args)?,
        Commands::Check(args) => handle_check(config, &args)?,
        Commands::Show(args) => handle_show(config, &args)?,
        Commands::Config(args) => handle_config(&config, cli.config_file, &args)?,
    }

    Ok(())
}

fn handle_build(mut config: Config, args: &BuildArgs) -> Result<()> {
    args.paths.apply(&mut config);
    if args.listing_order {
        config.sort_listing = false;
    }

    let builder = ManifestBuilder::new(config);
    let report = builder.run()
        .context("Failed to write manifest")?;

    builder.print_summary(&report, true);
    println!("🔑 Digest: {}", report.manifest.digest()?.dimmed());

    Ok(())
}

fn handle_check(mut config: Config, args: &PathArgs) -> Result<()> {
    args.apply(&mut config);

    let output = config.output_file.clone();
    let builder = ManifestBuilder::new(config);
    let report = builder.build();
    builder.print_summary(&report, false);

    println!();

    if !output.exists() {
        bail!("Manifest {} does not exist; run `context_gen build`", output.display());
    }

    let current = report.manifest.is_current(&output)
        .context("Failed to compare manifest")?;
    if !current {
        bail!("Manifest {} is out of date; run `context_gen build`", output.display());
    }

    println!("{} {} is up to date ({})", "✅".green(),
        output.display().to_string().color(colors::PATH), report.manifest.digest()?.dimmed());
    Ok(())
}

fn handle_config(config: &Config, config_file: Option<PathBuf>, args: &ConfigArgs) -> Result<()> {
    if !args.init {
        config.display();
        return Ok(());
    }

    let path = config_file.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
    if path.exists() && !args.force {
        bail!("{} already exists; pass --force to overwrite", path.display());
    }

    config.save(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    println!("{} Wrote {}", "✅".green(), path.display().to_string().color(colors::PATH));
    Ok(())
}

fn handle_show(mut config: Config, args: &ShowArgs) -> Result<()> {
    if let Some(output) = &args.output {
        config.output_file = output.clone();
    }

    let manifest = Manifest::load(&config.output_file)
        .context("Failed to load manifest")?;

    let record = match manifest.get(args.id) {
        Some(record) if !record.is_empty() => record,
        Some(_) => {
            println!("  Context #{}: {}", args.id, "no media".color(colors::MUTED));
            return Ok(());
        }
        None => {
            println!("{} Context #{} is not in {}", "⚠️".yellow(), args.id,
                config.output_file.display());
            return Ok(());
        }
    };

    println!("{}", format!("🎞️  CONTEXT #{}", args.id).bold().color(colors::HEADER));
    println!("{}", "─".repeat(50).color(colors::PATH));
    for (i, entry) in record.media.iter().enumerate() {
        let icon = match entry.media_type {
            MediaType::Image => "🖼️ ",
            MediaType::Video => "🎬",
        };
        println!("{:3}. {} {:<5} {}", i + 1, icon, entry.media_type,
            entry.src.color(colors::PATH));
    }

    Ok(())
}
