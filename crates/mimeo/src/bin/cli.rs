//! mimeo CLI
//!
//! Plays macro documents against the system mouse.

use std::fs;
use std::io::{self, Write};
use std::path::Path;
use std::thread;
use std::time::Duration;

use anyhow::Result;
use clap::{Parser, Subcommand};

use mimeo::prelude::*;

#[derive(Parser)]
#[command(name = "mimeo")]
#[command(about = "Mouse macro playback")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a macro
    Play {
        /// Macro file (a path, or a name in the macro directory)
        file: String,

        /// Playback speed (1.0 = realtime, 2.0 = 2x)
        #[arg(short, long, default_value = "1.0")]
        speed: f64,

        /// Restart from the top after the last step, until stopped
        #[arg(long)]
        repeat: bool,

        /// Execute without touching the mouse
        #[arg(long)]
        dry_run: bool,

        /// Seconds to wait before the first step
        #[arg(long, default_value = "2")]
        countdown: u64,
    },

    /// List saved macros
    List,

    /// Show macro info
    Show {
        /// Macro file
        file: String,

        /// Show every step
        #[arg(long)]
        all: bool,
    },

    /// Delete a saved macro
    Delete {
        /// Macro file
        file: String,
    },

    /// Check whether this platform can play macros
    Check,
}

fn main() {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            file,
            speed,
            repeat,
            dry_run,
            countdown,
        } => play(&file, speed, repeat, dry_run, countdown),
        Commands::List => list(),
        Commands::Show { file, all } => show(&file, all),
        Commands::Delete { file } => delete(&file),
        Commands::Check => check(),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Load from an explicit path, falling back to the macro directory.
fn load_document(file: &str) -> Result<MacroDocument> {
    let path = Path::new(file);
    if path.exists() {
        return MacroDocument::load(path);
    }
    MacroStorage::new()?.load(file)
}

fn play(file: &str, speed: f64, repeat: bool, dry_run: bool, countdown: u64) -> Result<()> {
    let doc = load_document(file)?;
    let player = if dry_run {
        Player::with_adapter(NoopMouse)
    } else {
        Player::new()
    };
    if !player.is_supported() {
        return Err(PlaybackError::UnsupportedPlatform.into());
    }

    let total = doc.steps.len();
    println!(
        "Playing {} ({} steps){}",
        file,
        total,
        if repeat { " on repeat" } else { "" }
    );
    if countdown > 0 {
        println!("Starting in {} seconds... (Ctrl+C stops playback)", countdown);
        thread::sleep(Duration::from_secs(countdown));
    }

    let stopper = player.clone();
    ctrlc::set_handler(move || stopper.stop())?;

    let status = player.subscribe();
    let printer = thread::spawn(move || {
        for event in status.iter() {
            match event {
                StatusEvent::Playing {
                    current_index: Some(i),
                } => {
                    print!("\rstep {}/{}", i + 1, total);
                    let _ = io::stdout().flush();
                }
                StatusEvent::Playing { .. } => {}
                StatusEvent::Error { error } => {
                    println!();
                    eprintln!("click failed: {}", error);
                    break;
                }
                StatusEvent::Stopped => {
                    println!();
                    break;
                }
            }
        }
    });

    let result = player.run(&doc.steps, PlayOptions { speed, repeat });
    let _ = printer.join();

    match result? {
        RunOutcome::Completed => println!("Finished playback"),
        RunOutcome::Stopped => println!("Playback stopped"),
    }
    Ok(())
}

fn list() -> Result<()> {
    let storage = MacroStorage::new()?;
    let files = storage.list()?;

    if files.is_empty() {
        println!("No macros saved.");
        return Ok(());
    }
    for f in files {
        let meta = fs::metadata(storage.path().join(&f))?;
        let modified: chrono::DateTime<chrono::Local> = meta.modified()?.into();
        println!("{}  {}", modified.format("%Y-%m-%d %H:%M"), f);
    }
    Ok(())
}

fn show(file: &str, all: bool) -> Result<()> {
    let doc = load_document(file)?;

    let mut waits = 0;
    let mut clicks = 0;
    let mut total_ms = 0u64;
    for step in &doc.steps {
        match step {
            Step::Wait(_) => waits += 1,
            Step::Click(_) => clicks += 1,
        }
        total_ms += step.delay_ms();
    }

    println!("Version: {}", doc.version);
    println!("Steps: {}", doc.steps.len());
    println!("  Clicks: {}", clicks);
    println!("  Waits: {}", waits);
    println!("  Total delay: {:.2}s", total_ms as f64 / 1000.0);

    if all {
        println!("\nSteps:");
        for (i, step) in doc.steps.iter().enumerate() {
            println!("{}: {:?}", i, step);
        }
    }
    Ok(())
}

fn delete(file: &str) -> Result<()> {
    let storage = MacroStorage::new()?;
    storage.delete(file)?;
    println!("Deleted: {}", file);
    Ok(())
}

fn check() -> Result<()> {
    let player = Player::new();
    if player.is_supported() {
        println!("Mouse backend: available");
    } else {
        println!("Mouse backend: unavailable on this platform");
    }
    Ok(())
}
