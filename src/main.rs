//! Visage CLI - Command-line tool for transferring faces between saves.
//!
//! This is the main entry point for the Visage command-line application.

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use tracing_subscriber::EnvFilter;

use visage::prelude::*;
use visage::{verify_file, PlayerRecord};

/// Visage - copy a character's face from one save game to another
#[derive(Parser)]
#[command(name = "visage")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Log decoding details (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Folder that relative save names are looked up in
    #[arg(long, env = "VISAGE_SAVES_DIR", global = true)]
    saves_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the player summary of a save
    Info {
        /// Save file
        save: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Copy the face of the source player into the target save
    Transfer {
        /// Save to take the face from
        #[arg(short, long, env = "VISAGE_SOURCE")]
        source: PathBuf,

        /// Save to write the face into (kept as .facebakN)
        #[arg(short, long, env = "VISAGE_TARGET")]
        target: PathBuf,
    },

    /// Write the screenshot of a save as an image
    Preview {
        /// Save file
        save: PathBuf,

        /// Output image (PNG, JPEG or BMP by extension)
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Check that saves decode and re-encode unchanged
    Verify {
        /// Save files
        #[arg(required = true)]
        saves: Vec<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let saves_dir = cli.saves_dir.as_deref();

    match cli.command {
        Commands::Info { save, json } => {
            cmd_info(&resolve_save(&save, saves_dir), json)?;
        }
        Commands::Transfer { source, target } => {
            cmd_transfer(&resolve_save(&source, saves_dir), &resolve_save(&target, saves_dir))?;
        }
        Commands::Preview { save, output } => {
            cmd_preview(&resolve_save(&save, saves_dir), &output)?;
        }
        Commands::Verify { saves } => {
            let saves: Vec<PathBuf> = saves.iter().map(|s| resolve_save(s, saves_dir)).collect();
            cmd_verify(&saves)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Use `path` as given if it exists, else look for it in the saves folder.
fn resolve_save(path: &Path, saves_dir: Option<&Path>) -> PathBuf {
    if path.is_absolute() || path.exists() {
        return path.to_path_buf();
    }

    let mut folders: Vec<PathBuf> = saves_dir.map(Path::to_path_buf).into_iter().collect();
    folders.extend(
        Flavor::all()
            .iter()
            .map(|&flavor| default_save_dir(flavor))
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from),
    );

    match folders
        .iter()
        .map(|dir| dir.join(path))
        .find(|candidate| candidate.exists())
    {
        Some(found) => {
            tracing::debug!(name = %path.display(), path = %found.display(), "resolved save");
            found
        }
        None => path.to_path_buf(),
    }
}

fn open_save(path: &Path) -> Result<SaveFile> {
    SaveFile::open(path).with_context(|| format!("Failed to read save {}", path.display()))
}

fn print_summary(label: &str, summary: &SaveSummary) {
    println!("{}:", label);
    println!("  Game:         {}", summary.game);
    println!("  Save number:  {}", summary.save_number);
    println!("  Name:         {}", summary.name);
    println!("  Level:        {}", summary.level);
    println!("  Race:         {}", summary.race);
    println!("  Sex:          {}", summary.sex);
    println!("  Location:     {}", summary.location);
    println!("  Playing time: {}", summary.playing_time);
    println!(
        "  Screenshot:   {}x{}",
        summary.screenshot_width, summary.screenshot_height
    );
}

fn cmd_info(path: &PathBuf, json: bool) -> Result<()> {
    let save = open_save(path)?;
    let summary = SaveSummary::from_save(&save);

    if json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    print_summary(&path.display().to_string(), &summary);

    match PlayerRecord::load(&save) {
        Ok(player) => {
            println!(
                "Player changeform: {} of {} records, flags {}, {} groups",
                player.index + 1,
                player.table.len(),
                player.flags,
                player.actor.groups().len()
            );
            if let Some(face) = player.actor.face() {
                println!(
                    "Face: {} head parts, {} morphs, {} tint layers",
                    face.head_parts.len(),
                    face.morphs.len(),
                    face.tints.len()
                );
            } else {
                println!("Face: none");
            }
        }
        Err(e) => println!("Player changeform: unreadable ({})", e),
    }

    Ok(())
}

fn cmd_transfer(source: &PathBuf, target: &PathBuf) -> Result<()> {
    println!("Transferring face: {} -> {}", source.display(), target.display());

    let start = Instant::now();
    let report = transfer_face(source, target).with_context(|| {
        format!(
            "Failed to transfer face from {} to {}",
            source.display(),
            target.display()
        )
    })?;

    println!(
        "Wrote {} bytes to {} in {:?}",
        report.bytes_written,
        report.target.display(),
        start.elapsed()
    );
    println!("Original saved as {}", report.backup.display());

    Ok(())
}

fn cmd_preview(path: &PathBuf, output: &PathBuf) -> Result<()> {
    let save = open_save(path)?;
    let image = preview_image(&save);

    image
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Preview {}x{} written to {}",
        image.width(),
        image.height(),
        output.display()
    );

    Ok(())
}

fn cmd_verify(saves: &[PathBuf]) -> Result<()> {
    println!("Verifying {} saves...", saves.len());

    let pb = ProgressBar::new(saves.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    let results: Vec<_> = saves
        .par_iter()
        .map(|path| {
            let result = verify_file(path);
            pb.inc(1);
            (path, result)
        })
        .collect();
    pb.finish_with_message("Done");

    let mut failed = 0;
    for (path, result) in &results {
        match result {
            Ok(report) => println!(
                "  OK    {} ({}, {} changeforms, {} player groups{})",
                path.display(),
                report.game,
                report.changeforms,
                report.player_groups,
                if report.has_face { ", face" } else { "" }
            ),
            Err(e) => {
                failed += 1;
                println!("  FAIL  {} [{:?}] {}", path.display(), e.kind(), e);
            }
        }
    }

    println!("Verification completed in {:?}", start.elapsed());
    if failed > 0 {
        bail!("{} of {} saves failed verification", failed, saves.len());
    }

    Ok(())
}
