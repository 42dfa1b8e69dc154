//! Command-line access to the map annotation store.
//!
//! Usage:
//!   mapnote-cli list
//!   mapnote-cli add 48.137 11.575 --name "Clinic" --color "#EF4444"
//!   mapnote-cli export --output backup.json.br
//!   mapnote-cli import backup.json --mode add --json
//!
//! Operates on the same storage file as the GUI unless `--store` is given.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use mapnote::{
    read_backup_file, write_backup_file, BackupCoordinator, FileStore, ImportMode, ImportOutcome,
    KeyValueStore, SharedStorage, Workspace,
};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Debug)]
#[command(name = "mapnote-cli")]
#[command(about = "Inspect and edit map annotations, export and import backups")]
struct Args {
    /// Storage file to operate on (defaults to the per-user data directory)
    #[arg(short, long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List all locations
    List,
    /// Add a location
    Add {
        /// Latitude in degrees (-90..=90)
        #[arg(allow_hyphen_values = true)]
        lat: f64,
        /// Longitude in degrees (-180..=180)
        #[arg(allow_hyphen_values = true)]
        lng: f64,
        #[arg(short, long)]
        name: Option<String>,
        /// Hex color such as #3B82F6
        #[arg(short, long)]
        color: Option<String>,
    },
    /// Remove a location by id
    Remove { id: String },
    /// Remove every location, area and boundary point
    Clear,
    /// Show the main area and all sub-areas
    Areas,
    /// Write a backup of everything (stdout when no output is given)
    Export {
        /// Output file; a `.br` extension enables Brotli compression
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Import a backup file
    Import {
        path: PathBuf,
        /// replace or add
        #[arg(short, long, default_value = "replace")]
        mode: String,
        /// Print the outcome as JSON
        #[arg(long)]
        json: bool,
    },
}

// ============================================================================
// Commands
// ============================================================================

fn open_workspace(store: Option<PathBuf>) -> Result<Workspace> {
    let store = match store {
        Some(path) => FileStore::open(&path)
            .with_context(|| format!("Failed to open storage {}", path.display()))?,
        None => FileStore::open_default().context("Failed to open default storage")?,
    };
    log::debug!("Using storage {}", store.path().display());
    let storage: SharedStorage = Rc::new(RefCell::new(store));
    Ok(Workspace::open(storage))
}

fn list(workspace: &Workspace) {
    if workspace.coordinates.is_empty() {
        println!("No locations");
        return;
    }
    for c in workspace.coordinates.list() {
        let kind = c.location_type.map(|t| format!(" [{}]", t)).unwrap_or_default();
        println!("{}  {:>10.5} {:>11.5}  {}  {}{}", c.id, c.lat, c.lng, c.color, c.display_name(), kind);
    }
}

fn areas(workspace: &Workspace) {
    let main_area = &workspace.main_area;
    println!(
        "Main area: {} points, color {}{}",
        main_area.area_points().len(),
        main_area.color(),
        if main_area.is_editing() { " (editing)" } else { "" }
    );
    for area in workspace.sub_areas.areas() {
        println!(
            "{}  {}  {} points  {}{}",
            area.id,
            area.color,
            area.points.len(),
            area.name,
            if area.is_editing { " (editing)" } else { "" }
        );
    }
}

fn run(args: Args) -> Result<()> {
    let mut workspace = open_workspace(args.store)?;

    match args.command {
        Command::List => list(&workspace),
        Command::Add { lat, lng, name, color } => {
            let c = workspace
                .coordinates
                .add(lat, lng, name.as_deref(), color.as_deref())
                .context("Invalid location")?;
            println!("{}", c.id);
        }
        Command::Remove { id } => {
            if workspace.coordinates.get(&id).is_none() {
                anyhow::bail!("No location with id {}", id);
            }
            workspace.coordinates.remove(&id);
        }
        Command::Clear => workspace.clear_all(),
        Command::Areas => areas(&workspace),
        Command::Export { output } => {
            let json = BackupCoordinator::export_all(&workspace).context("Failed to encode backup")?;
            match output {
                Some(path) => {
                    write_backup_file(&path, &json)?;
                    eprintln!("Wrote {}", path.display());
                }
                None => println!("{}", json),
            }
        }
        Command::Import { path, mode, json } => {
            let text = read_backup_file(&path)?;
            let result = mode
                .parse::<ImportMode>()
                .and_then(|mode| BackupCoordinator::import_all(&mut workspace, &text, mode));

            if json {
                println!("{}", serde_json::to_string(&ImportOutcome::from(&result))?);
            }
            let summary = result.with_context(|| format!("Failed to import {}", path.display()))?;
            if !json {
                println!(
                    "Imported {} locations ({} rejected), {} areas, {} boundary points",
                    summary.locations.unwrap_or(0),
                    summary.rejected_locations,
                    summary.sub_areas.unwrap_or(0),
                    summary.main_area_points.unwrap_or(0)
                );
            }
        }
    }

    workspace
        .storage()
        .borrow_mut()
        .flush()
        .context("Failed to write storage")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    run(Args::parse())
}
