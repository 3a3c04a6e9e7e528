//! Terminal front-end for the student fee desk.
//!
//! # Responsibility
//! - Resolve configuration, start logging and open the slot database.
//! - Drive the core `Dashboard` contract; no fee rules live here.

use clap::{Parser, Subcommand};
use feedesk_core::db::open_db;
use feedesk_core::{
    core_version, init_logging, Dashboard, DeskConfig, RosterPersistence, SlotRepository,
    SqliteSlotRepository, Stats, StudentForm, StudentRecord,
};
use log::info;
use serde_json::json;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "feedesk")]
#[command(about = "Track student fees: who owes what and how much was collected")]
struct Cli {
    /// Directory holding the slot database and logs.
    #[arg(long, global = true, default_value = ".feedesk")]
    data_dir: PathBuf,
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Slot key the roster is stored under.
    #[arg(long, global = true)]
    storage_key: Option<String>,
    /// Slot database file name inside the data directory.
    #[arg(long, global = true)]
    db_file: Option<String>,
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a student; fee amounts are read like a form field.
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        mobile: String,
        #[arg(long)]
        total_fees: String,
        #[arg(long, default_value = "")]
        paid_fees: String,
    },
    /// Remove a student by id.
    Remove {
        id: String,
        /// Skip the confirmation prompt.
        #[arg(long, short = 'y', default_value_t = false)]
        yes: bool,
    },
    /// List students, newest first.
    List,
    /// Show summary figures.
    Stats,
    /// Print the core version.
    Version,
}

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<(), String> {
    let cli = Cli::parse();
    if let Commands::Version = cli.command {
        println!("feedesk_core version={}", core_version());
        return Ok(());
    }

    let config = resolve_config(&cli)?;
    std::fs::create_dir_all(&config.data_dir).map_err(|err| {
        format!(
            "failed to create data dir `{}`: {err}",
            config.data_dir.display()
        )
    })?;
    init_logging(&config.log_level, config.log_dir()).map_err(|err| err.to_string())?;

    let conn = open_db(config.db_path()).map_err(|err| err.to_string())?;
    let persistence =
        RosterPersistence::with_key(SqliteSlotRepository::new(&conn), config.storage_key.clone());
    let mut dashboard = Dashboard::on_mount(persistence);
    info!(
        "event=cli_command module=cli status=start command={}",
        command_name(&cli.command)
    );

    match cli.command {
        Commands::Add {
            name,
            mobile,
            total_fees,
            paid_fees,
        } => {
            let response = dashboard.add_student(&StudentForm {
                name,
                mobile,
                total_fees,
                paid_fees,
            });
            if !response.ok {
                return Err(response.message);
            }
            if cli.json {
                println!(
                    "{}",
                    json!({ "id": response.student_id, "message": response.message })
                );
            } else {
                println!(
                    "{} (id {})",
                    response.message,
                    response.student_id.unwrap_or_default()
                );
            }
            print_stats(&dashboard.get_stats(), cli.json);
        }
        Commands::Remove { id, yes } => {
            let outcome = remove_student(&mut dashboard, &id, |name| {
                Ok(yes || confirm(&format!("Remove {name}?"))?)
            })?;
            match outcome {
                RemoveOutcome::Removed(name) => {
                    println!("removed {name}");
                    print_stats(&dashboard.get_stats(), cli.json);
                }
                RemoveOutcome::Cancelled => println!("cancelled"),
                RemoveOutcome::NotFound => println!("no student with id `{id}`; nothing removed"),
            }
        }
        Commands::List => print_students(dashboard.students(), cli.json)?,
        Commands::Stats => print_stats(&dashboard.get_stats(), cli.json),
        Commands::Version => {}
    }
    Ok(())
}

#[derive(Debug, PartialEq, Eq)]
enum RemoveOutcome {
    Removed(String),
    Cancelled,
    NotFound,
}

/// Removes `id` once `confirmed` approves; unknown ids are not an error.
fn remove_student<R: SlotRepository>(
    dashboard: &mut Dashboard<R>,
    id: &str,
    confirmed: impl FnOnce(&str) -> Result<bool, String>,
) -> Result<RemoveOutcome, String> {
    let Some(name) = dashboard
        .students()
        .iter()
        .find(|record| record.id.as_str() == id.trim())
        .map(|record| record.name.clone())
    else {
        return Ok(RemoveOutcome::NotFound);
    };
    if !confirmed(&name)? {
        return Ok(RemoveOutcome::Cancelled);
    }
    dashboard.remove_student(id);
    Ok(RemoveOutcome::Removed(name))
}

fn command_name(command: &Commands) -> &'static str {
    match command {
        Commands::Add { .. } => "add",
        Commands::Remove { .. } => "remove",
        Commands::List => "list",
        Commands::Stats => "stats",
        Commands::Version => "version",
    }
}

fn resolve_config(cli: &Cli) -> Result<DeskConfig, String> {
    let cwd = std::env::current_dir().map_err(|err| format!("cannot read current dir: {err}"))?;
    let mut config = DeskConfig::new(cli.data_dir.clone()).resolve_relative_to(&cwd);
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(key) = &cli.storage_key {
        config.storage_key = key.clone();
    }
    if let Some(file) = &cli.db_file {
        config.db_file_name = file.clone();
    }
    config.validate().map_err(|err| err.to_string())?;
    Ok(config)
}

fn confirm(prompt: &str) -> Result<bool, String> {
    print!("{prompt} [y/N] ");
    io::stdout().flush().map_err(|err| err.to_string())?;
    let mut answer = String::new();
    io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|err| err.to_string())?;
    Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
}

fn print_students(students: &[StudentRecord], as_json: bool) -> Result<(), String> {
    if as_json {
        let rendered = serde_json::to_string_pretty(students).map_err(|err| err.to_string())?;
        println!("{rendered}");
        return Ok(());
    }
    if students.is_empty() {
        println!("no students recorded");
        return Ok(());
    }
    for record in students {
        let status = if record.has_dues() { "due" } else { "paid" };
        println!(
            "{}  {}  {}  total={} paid={} due={} [{status}]",
            record.id, record.name, record.mobile, record.total_fees, record.paid_fees,
            record.due_fees
        );
    }
    Ok(())
}

fn print_stats(stats: &Stats, as_json: bool) {
    if as_json {
        println!("{}", json!(stats));
        return;
    }
    println!(
        "students={} total_fees={} collected={} due={}",
        stats.total_students, stats.total_fees, stats.total_collected, stats.total_due
    );
}
