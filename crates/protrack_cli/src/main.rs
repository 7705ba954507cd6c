//! ProTrack command-line host.
//!
//! # Responsibility
//! - Drive the task board, journal, observations and settings from a shell.
//! - Run backups with a native directory picker (flag or interactive prompt).

use anyhow::{bail, Context};
use chrono::Local;
use clap::{Parser, Subcommand};
use protrack_core::backup::detect_directory_picker;
use protrack_core::db::open_db;
use protrack_core::model::validate_date;
use protrack_core::{
    default_log_level, init_logging, AppStore, BackupGateway, BackupService, CorePaths, NewTask,
    ObservationStatus, ReportPeriod, TaskStatus, WeeklyDigest,
};
use std::path::PathBuf;

/// ProTrack -- task board, daily journal and local backups.
#[derive(Parser)]
#[command(name = "protrack", version, about)]
struct Cli {
    /// State store file.
    #[arg(long, global = true, env = "PROTRACK_DB_PATH")]
    db: Option<PathBuf>,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// trace|debug|info|warn|error
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage task cards.
    #[command(subcommand)]
    Task(TaskCommand),
    /// Write or read daily journal entries.
    #[command(subcommand)]
    Log(LogCommand),
    /// Manage the observations log.
    #[command(subcommand)]
    Obs(ObsCommand),
    /// Manage days excluded from reporting periods.
    #[command(subcommand)]
    Offday(OffDayCommand),
    /// Write a JSON backup of the full state.
    Backup {
        /// Backup folder; prompts interactively when omitted.
        #[arg(long)]
        dir: Option<PathBuf>,
    },
    /// Print the weekly digest as JSON.
    Digest {
        /// Any date inside the week; defaults to today.
        #[arg(long)]
        week_of: Option<String>,
    },
}

#[derive(Subcommand)]
enum TaskCommand {
    Add {
        display_id: String,
        description: String,
        #[arg(long)]
        due: String,
        #[arg(long, default_value_t = 0)]
        priority: u32,
    },
    List {
        /// Only tasks whose display id or description contains this keyword.
        #[arg(long)]
        query: Option<String>,
    },
    Status {
        id: String,
        /// not-started|in-progress|done
        status: String,
    },
    Due {
        id: String,
        date: String,
    },
    Remove {
        id: String,
    },
}

#[derive(Subcommand)]
enum LogCommand {
    Add {
        task_id: String,
        content: String,
        /// Defaults to today.
        #[arg(long)]
        date: Option<String>,
    },
    List {
        #[arg(long)]
        date: Option<String>,
    },
    Remove {
        id: String,
    },
}

#[derive(Subcommand)]
enum ObsCommand {
    Add {
        content: String,
    },
    List,
    Status {
        id: String,
        /// new|reviewing|resolved|archived
        status: String,
    },
    Remove {
        id: String,
    },
}

#[derive(Subcommand)]
enum OffDayCommand {
    Add { date: String },
    Remove { date: String },
    List,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let paths = CorePaths::resolve(cli.db, cli.log_dir);

    if let Some(log_dir) = &paths.log_dir {
        let level = cli
            .log_level
            .unwrap_or_else(|| default_log_level().as_str().to_string());
        let log_dir = log_dir
            .to_str()
            .context("log directory must be valid UTF-8")?;
        init_logging(&level, log_dir).map_err(anyhow::Error::msg)?;
    }

    let conn = open_db(&paths.db_path)
        .with_context(|| format!("failed to open {}", paths.db_path.display()))?;
    let store = AppStore::new(&conn);

    match cli.command {
        Commands::Task(command) => run_task(store, command)?,
        Commands::Log(command) => run_log(store, command)?,
        Commands::Obs(command) => run_obs(store, command)?,
        Commands::Offday(command) => run_off_day(store, command)?,
        Commands::Backup { dir } => {
            let gateway = BackupGateway::native(detect_directory_picker(dir));
            let mut service = BackupService::new(store, gateway);
            match service.backup_now() {
                None => println!("Backup cancelled."),
                Some(outcome) if outcome.ok => println!("{}", outcome.message),
                Some(outcome) => bail!(outcome.message),
            }
        }
        Commands::Digest { week_of } => {
            let anchor = match week_of {
                Some(raw) => validate_date("week-of", raw.trim())?,
                None => Local::now().date_naive(),
            };
            let digest = WeeklyDigest::build(&store.snapshot()?, ReportPeriod::week_of(anchor));
            println!("{}", serde_json::to_string_pretty(&digest)?);
        }
    }

    Ok(())
}

fn run_task(store: AppStore<'_>, command: TaskCommand) -> anyhow::Result<()> {
    let tasks = store.tasks();
    match command {
        TaskCommand::Add {
            display_id,
            description,
            due,
            priority,
        } => {
            let task = tasks.create_task(NewTask {
                display_id,
                description,
                due_date: due,
                priority,
            })?;
            println!("{}", task.id);
        }
        TaskCommand::List { query } => {
            let listed = match query {
                Some(keyword) => tasks.search(&keyword)?,
                None => tasks.board()?,
            };
            for task in listed {
                println!(
                    "{}\t{}\t{}\t{}\tP{}\t{}",
                    task.id,
                    task.display_id,
                    task.status.as_str(),
                    task.due_date,
                    task.priority,
                    task.description
                );
            }
        }
        TaskCommand::Status { id, status } => {
            let Some(status) = TaskStatus::parse(&status) else {
                bail!("unknown task status `{status}`");
            };
            tasks.set_status(&id, status)?;
        }
        TaskCommand::Due { id, date } => {
            tasks.set_due_date(&id, &date)?;
        }
        TaskCommand::Remove { id } => tasks.delete_task(&id)?,
    }
    Ok(())
}

fn run_log(store: AppStore<'_>, command: LogCommand) -> anyhow::Result<()> {
    let journal = store.journal();
    match command {
        LogCommand::Add {
            task_id,
            content,
            date,
        } => {
            let date = date.unwrap_or_else(today);
            let log = journal.add_log(&date, &task_id, &content)?;
            println!("{}", log.id);
        }
        LogCommand::List { date } => {
            let date = date.unwrap_or_else(today);
            for log in journal.logs_for_date(&date)? {
                let label = store
                    .tasks()
                    .get_task(&log.task_id)?
                    .map_or_else(|| "Unknown".to_string(), |task| task.display_id);
                println!("{}\t{}\t{}\t{}", log.id, log.date, label, log.content);
            }
        }
        LogCommand::Remove { id } => journal.delete_log(&id)?,
    }
    Ok(())
}

fn run_obs(store: AppStore<'_>, command: ObsCommand) -> anyhow::Result<()> {
    let observations = store.observations();
    match command {
        ObsCommand::Add { content } => {
            let observation = observations.add_observation(&content)?;
            println!("{}", observation.id);
        }
        ObsCommand::List => {
            for observation in observations.list_newest_first()? {
                println!(
                    "{}\t{}\t{}\t{}",
                    observation.id,
                    observation.timestamp,
                    observation.status.as_str(),
                    observation.content
                );
            }
        }
        ObsCommand::Status { id, status } => {
            let Some(status) = ObservationStatus::parse(&status) else {
                bail!("unknown observation status `{status}`");
            };
            observations.set_status(&id, status)?;
        }
        ObsCommand::Remove { id } => observations.delete_observation(&id)?,
    }
    Ok(())
}

fn run_off_day(store: AppStore<'_>, command: OffDayCommand) -> anyhow::Result<()> {
    let settings = store.settings();
    match command {
        OffDayCommand::Add { date } => settings.add_off_day(&date)?,
        OffDayCommand::Remove { date } => settings.remove_off_day(&date)?,
        OffDayCommand::List => {
            for date in settings.off_days()? {
                println!("{date}");
            }
        }
    }
    Ok(())
}

fn today() -> String {
    Local::now().date_naive().format("%Y-%m-%d").to_string()
}
