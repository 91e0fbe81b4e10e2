use chrono::{Local, Utc};
use clap::{Parser, Subcommand};
use fitlog_core::*;
use std::io::{self, Write};
use std::path::PathBuf;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "fitlog")]
#[command(about = "100-day workout check-in tracker", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Record today's workout check-in
    Log {
        /// Minutes of exercise
        #[arg(long)]
        duration: Option<u32>,

        /// Exercise kind (cardio, strength)
        #[arg(long)]
        kind: Option<String>,

        /// Kilocalories burned
        #[arg(long)]
        calories: Option<u32>,

        /// Body weight today in kg
        #[arg(long)]
        weight: Option<f64>,
    },

    /// Show the dashboard (default)
    Stats,

    /// Exercise split, BMI, weight trend and badges
    Analytics {
        /// Height in cm for the BMI reading (overrides config)
        #[arg(long)]
        height: Option<String>,
    },

    /// List every logged session, newest first
    History,

    /// Delete a logged session by id
    Delete {
        id: Uuid,

        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

fn main() -> Result<()> {
    // Initialize logging
    fitlog_core::logging::init();

    let cli = Cli::parse();

    // Determine data directory
    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());

    match cli.command {
        Some(Commands::Log {
            duration,
            kind,
            calories,
            weight,
        }) => cmd_log(&config, data_dir, duration, kind, calories, weight),
        Some(Commands::Analytics { height }) => cmd_analytics(&config, data_dir, height),
        Some(Commands::History) => cmd_history(&config, data_dir),
        Some(Commands::Delete { id, yes }) => cmd_delete(&config, data_dir, id, yes),
        Some(Commands::Stats) | None => cmd_stats(&config, data_dir),
    }
}

fn cmd_log(
    config: &Config,
    data_dir: PathBuf,
    duration: Option<u32>,
    kind: Option<String>,
    calories: Option<u32>,
    weight: Option<f64>,
) -> Result<()> {
    let kind = kind
        .as_deref()
        .map(parse_kind)
        .unwrap_or(ExerciseKind::Cardio);

    let record = LogRecord {
        id: Uuid::new_v4(),
        user_id: config.user.user_id.clone(),
        date: Utc::now(),
        duration_minutes: duration.unwrap_or(0),
        kind,
        calories: calories.unwrap_or(0),
        weight_kg: weight,
        checked_in: true,
    };

    let mut store = open_store(config, &data_dir);
    store.create(&record)?;
    tracing::info!("Logged session {}", record.id);

    println!("\n✓ Checked in for today!");

    // Refetch and re-derive, then show the updated dashboard
    let logs = store.list(&config.user.user_id)?;
    let snapshot = derive(&logs, Local::now(), &config.stats);
    display_dashboard(&snapshot);
    Ok(())
}

fn cmd_stats(config: &Config, data_dir: PathBuf) -> Result<()> {
    let store = open_store(config, &data_dir);
    let logs = store.list(&config.user.user_id)?;
    let snapshot = derive(&logs, Local::now(), &config.stats);
    display_dashboard(&snapshot);
    Ok(())
}

fn cmd_analytics(config: &Config, data_dir: PathBuf, height: Option<String>) -> Result<()> {
    let store = open_store(config, &data_dir);
    let logs = store.list(&config.user.user_id)?;
    let snapshot = derive(&logs, Local::now(), &config.stats);

    let height = height.unwrap_or_else(|| config.user.height_cm.clone());
    let bmi = bmi_reading(&snapshot, &height);

    println!("\n╭─────────────────────────────────────────╮");
    println!("│  ANALYTICS");
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!(
        "  Cardio vs strength: {} : {}",
        snapshot.cardio_count, snapshot.strength_count
    );
    match bmi.class {
        BmiClass::Unknown => println!("  BMI: unknown (log a weight and set your height)"),
        class => println!("  BMI: {:.1} ({})", bmi.value, class.label()),
    }
    println!();

    if snapshot.weight_history.is_empty() {
        println!("  No weights recorded yet.");
    } else {
        println!("  Weight trend:");
        for point in &snapshot.weight_history {
            println!("    {:>5}  {:.1} kg", point.date_label, point.weight_kg);
        }
    }
    println!();

    println!("  Badges:");
    for badge in &snapshot.badges {
        let marker = if badge.unlocked { badge.icon } else { "🔒" };
        println!("    {} {} ({})", marker, badge.name, badge.description);
    }
    println!();
    Ok(())
}

fn cmd_history(config: &Config, data_dir: PathBuf) -> Result<()> {
    let store = open_store(config, &data_dir);
    let logs = store.list(&config.user.user_id)?;

    if logs.is_empty() {
        println!("No sessions logged yet. Start with: fitlog log");
        return Ok(());
    }

    println!("\n  {} logged sessions (newest first):\n", logs.len());
    for log in &logs {
        let local = log.date.with_timezone(&Local);
        let weight = log
            .weight_kg
            .map(|w| format!(", {} kg", w))
            .unwrap_or_default();
        println!(
            "  {}  {:<17} {:>3} min{}",
            local.format("%Y-%m-%d"),
            log.kind.label(),
            log.duration_minutes,
            weight
        );
        println!("      id: {}", log.id);
    }
    println!();
    Ok(())
}

fn cmd_delete(config: &Config, data_dir: PathBuf, id: Uuid, yes: bool) -> Result<()> {
    if !yes && !confirm_delete()? {
        println!("Aborted.");
        return Ok(());
    }

    let mut store = open_store(config, &data_dir);
    store.delete(id)?;
    println!("\n✓ Record deleted");

    let logs = store.list(&config.user.user_id)?;
    let snapshot = derive(&logs, Local::now(), &config.stats);
    display_dashboard(&snapshot);
    Ok(())
}

fn parse_kind(value: &str) -> ExerciseKind {
    match value.to_lowercase().as_str() {
        "strength" => ExerciseKind::Strength,
        "cardio" => ExerciseKind::Cardio,
        other => {
            eprintln!("Unknown exercise kind: {}. Using cardio.", other);
            ExerciseKind::Cardio
        }
    }
}

fn display_dashboard(snapshot: &StatsSnapshot) {
    println!("\n╭─────────────────────────────────────────╮");
    println!("│  {}-DAY CHALLENGE", snapshot.goal_days);
    println!("╰─────────────────────────────────────────╯");
    println!();
    println!("  ⚡ {}-day streak", snapshot.current_streak);
    println!(
        "  Day {} of {} ({} to go)",
        snapshot.total_days,
        snapshot.goal_days,
        snapshot.remaining_days()
    );
    println!(
        "  Progress: {} {:.1}%",
        progress_bar(snapshot.progress_percent, 20),
        snapshot.progress_percent
    );
    println!();
    println!("  🔥 {} kcal burned", snapshot.total_calories);
    println!(
        "  ⏱ {} h logged",
        (snapshot.total_duration_minutes + 30) / 60
    );
    println!();

    println!("  Last {} days:", snapshot.heatmap.len());
    for week in snapshot.heatmap.chunks(7) {
        let row: String = week
            .iter()
            .map(|day| if day.active { '█' } else { '·' })
            .collect();
        println!("  {}", row);
    }
    println!();
}

fn progress_bar(percent: f64, width: usize) -> String {
    let filled = ((percent / 100.0) * width as f64).round() as usize;
    let filled = filled.min(width);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(width - filled))
}

fn confirm_delete() -> Result<bool> {
    print!("Delete this record? [y/N] ");
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}
