// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use std::path::Path;

use teamsync::cli::{Cli, Command, ListSource};
use teamsync::logging;
use teamsync::{
    duplicate_summary, find_duplicate_names, source_for, write_export, DrawController,
    DrawError, GroupSize, Grouping,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        None => run_ui_mode(&cli, None),
        Some(Command::Ui { file }) => run_ui_mode(&cli, file.as_deref()),
        Some(Command::Draw {
            source,
            count,
            allow_repeats,
            json,
        }) => {
            init_logging(&cli)?;
            run_draw(source, *count, *allow_repeats, *json, cli.seed)
        }
        Some(Command::Group {
            source,
            size,
            export,
            json,
        }) => {
            init_logging(&cli)?;
            run_group(source, GroupSize::new(*size), export.as_deref(), *json, cli.seed)
        }
        Some(Command::Duplicates { source }) => {
            init_logging(&cli)?;
            run_duplicates(source)
        }
    }
}

fn init_logging(cli: &Cli) -> Result<()> {
    match &cli.log_file {
        Some(path) => logging::init_file_logger(path, cli.verbose)
            .with_context(|| format!("Failed to open log file {}", path.display())),
        None => {
            logging::init_cli_logger(cli.verbose);
            Ok(())
        }
    }
}

fn run_draw(
    source: &ListSource,
    count: usize,
    allow_repeats: bool,
    json: bool,
    seed: Option<u64>,
) -> Result<()> {
    let participants = source.load().context("Failed to load participants")?;
    tracing::info!(count = participants.len(), "loaded participants");

    let mut controller = DrawController::new(participants);
    controller.set_allow_repeats(allow_repeats);
    let mut rng = source_for(seed);

    let mut winners = Vec::new();
    for _ in 0..count {
        match controller.draw(rng.as_mut()) {
            Ok(winner) => winners.push(winner.clone()),
            Err(DrawError::PoolEmpty) => {
                tracing::warn!(drawn = winners.len(), requested = count, "pool exhausted");
                break;
            }
            Err(e) => return Err(e.into()),
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&winners)?);
        return Ok(());
    }

    if winners.is_empty() {
        println!("⚠️  Nobody left to draw");
        return Ok(());
    }

    println!("🏆 Winners");
    println!("━━━━━━━━━━━━━━━━━━━━");
    for (i, winner) in winners.iter().enumerate() {
        println!("{:>3}. {}", i + 1, winner.name);
    }
    if winners.len() < count {
        println!("\n✓ Everyone has won! ({} of {} requested)", winners.len(), count);
    }

    Ok(())
}

fn run_group(
    source: &ListSource,
    size: GroupSize,
    export_dir: Option<&Path>,
    json: bool,
    seed: Option<u64>,
) -> Result<()> {
    let participants = source.load().context("Failed to load participants")?;
    let mut rng = source_for(seed);

    let grouping = Grouping::generate(&participants, size, rng.as_mut())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&grouping)?);
    } else {
        println!(
            "👥 {} participants → {} groups of {}",
            grouping.member_count(),
            grouping.groups.len(),
            grouping.group_size
        );
        for (i, group) in grouping.groups.iter().enumerate() {
            println!("\nGroup {} ({})", i + 1, group.len());
            for member in group {
                println!("  • {}", member.name);
            }
        }
    }

    if let Some(dir) = export_dir {
        let path = write_export(dir, &grouping.groups, Local::now().date_naive())
            .with_context(|| format!("Failed to export groups to {}", dir.display()))?;
        eprintln!("💾 Exported to {}", path.display());
    }

    Ok(())
}

fn run_duplicates(source: &ListSource) -> Result<()> {
    let participants = source.load().context("Failed to load participants")?;
    let duplicates = find_duplicate_names(&participants);

    if duplicates.is_empty() {
        println!("✓ No duplicate names among {} participants", participants.len());
    } else {
        println!("⚠️  {} duplicate names: {}", duplicates.len(), duplicate_summary(&duplicates));
        for name in &duplicates {
            println!("{}", name);
        }
    }

    Ok(())
}

#[cfg(feature = "tui")]
fn run_ui_mode(cli: &Cli, file: Option<&Path>) -> Result<()> {
    if let Some(path) = &cli.log_file {
        logging::init_file_logger(path, cli.verbose)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
    }

    let mut app = ui::App::new(cli.seed);
    if let Some(path) = file {
        app.import(path);
    }

    ui::run_ui(&mut app)?;
    Ok(())
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_cli: &Cli, _file: Option<&Path>) -> Result<()> {
    eprintln!("❌ TUI mode not available!");
    eprintln!("   Rebuild with: cargo build --features tui");
    eprintln!("   Or use: teamsync draw|group|duplicates --names \"...\"");
    std::process::exit(1);
}
