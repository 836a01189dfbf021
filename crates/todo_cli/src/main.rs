//! Command-line front end for the task core.
//!
//! # Responsibility
//! - Parse commands and drive `TaskService` over a SQLite store and the
//!   simulated remote.
//! - Keep tasks in a file database so consecutive runs see the same list.
//!
//! The simulated remote lives only as long as the process, so background
//! pushes still in flight at exit are dropped.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::sync::Arc;
use todo_core::store::{open_db, open_db_in_memory};
use todo_core::{
    init_from_config, CoreConfig, DefaultTaskRepository, SimulatedNetworkDataSource,
    SqliteTaskStore, Task, TaskFilter, TaskRepository, TaskService,
};
use tokio::runtime::Handle;

#[derive(Debug, Parser)]
#[command(name = "todo", version, about = "Local-first to-do list")]
struct Cli {
    /// TOML config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database file (defaults to the user data directory).
    #[arg(long, global = true, conflicts_with = "in_memory")]
    db: Option<PathBuf>,

    /// Keep tasks in memory for this run only.
    #[arg(long, global = true)]
    in_memory: bool,

    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files.
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,

    /// Simulated remote latency in milliseconds.
    #[arg(long, global = true)]
    latency_ms: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List tasks.
    List {
        #[arg(long, value_enum, default_value_t = FilterArg::All)]
        filter: FilterArg,
        /// Reload from the remote before listing.
        #[arg(long)]
        refresh: bool,
    },
    /// Show one task.
    Show {
        id: String,
        #[arg(long)]
        refresh: bool,
    },
    /// Create a task and print its id.
    Add {
        title: String,
        #[arg(default_value = "")]
        description: String,
    },
    /// Replace a task's title and description.
    Edit {
        id: String,
        title: String,
        description: String,
    },
    Complete {
        id: String,
    },
    Activate {
        id: String,
    },
    Delete {
        id: String,
    },
    /// Delete every completed task.
    ClearCompleted,
    DeleteAll,
    /// Replace local tasks with the remote collection.
    Refresh,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FilterArg {
    All,
    Active,
    Completed,
}

impl From<FilterArg> for TaskFilter {
    fn from(value: FilterArg) -> Self {
        match value {
            FilterArg::All => TaskFilter::All,
            FilterArg::Active => TaskFilter::Active,
            FilterArg::Completed => TaskFilter::Completed,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    init_from_config(&config).context("failed to initialize logging")?;

    let conn = match &config.db_path {
        Some(path) => open_db(path)
            .with_context(|| format!("failed to open task database `{}`", path.display()))?,
        None => open_db_in_memory().context("failed to open in-memory task database")?,
    };
    let store = Arc::new(SqliteTaskStore::new(conn));
    let network = Arc::new(SimulatedNetworkDataSource::new(config.remote_latency()));
    let repo = DefaultTaskRepository::new(store, network, Handle::current());
    let service = TaskService::new(repo);

    run(&service, cli.command).await
}

/// `<data dir>/todo/todo.sqlite3`, creating the directory on first use.
fn default_db_path() -> Result<PathBuf> {
    let dir = dirs::data_dir()
        .context("no user data directory; pass --db or --in-memory")?
        .join("todo");
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create `{}`", dir.display()))?;
    Ok(dir.join("todo.sqlite3"))
}

fn resolve_config(cli: &Cli) -> Result<CoreConfig> {
    let mut config = match &cli.config {
        Some(path) => CoreConfig::load(path)
            .with_context(|| format!("failed to load config `{}`", path.display()))?,
        None => CoreConfig::default(),
    };

    if let Some(db) = &cli.db {
        config.db_path = Some(db.clone());
    }
    if cli.in_memory {
        config.db_path = None;
    } else if config.db_path.is_none() {
        config.db_path = Some(default_db_path()?);
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    if let Some(dir) = &cli.log_dir {
        config.log_dir = Some(dir.clone());
    }
    if let Some(latency) = cli.latency_ms {
        config.remote_latency_ms = latency;
    }
    config.validate()?;
    Ok(config)
}

async fn run<R: TaskRepository>(service: &TaskService<R>, command: Command) -> Result<()> {
    match command {
        Command::List { filter, refresh } => {
            let tasks = service.list_tasks(filter.into(), refresh).await?;
            if tasks.is_empty() {
                println!("no tasks");
            }
            for task in &tasks {
                print_task(task);
            }
            Ok(())
        }
        Command::Show { id, refresh } => {
            let Some(task) = service.repository().get_task(&id, refresh).await? else {
                bail!("task not found: {id}");
            };
            print_task(&task);
            if !task.description.is_empty() {
                println!("    {}", task.description);
            }
            Ok(())
        }
        Command::Add { title, description } => {
            let id = service.add_task(&title, &description).await?;
            println!("{id}");
            Ok(())
        }
        Command::Edit {
            id,
            title,
            description,
        } => {
            service.edit_task(&id, &title, &description).await?;
            Ok(())
        }
        Command::Complete { id } => {
            service.set_task_completed(&id, true).await?;
            Ok(())
        }
        Command::Activate { id } => {
            service.set_task_completed(&id, false).await?;
            Ok(())
        }
        Command::Delete { id } => {
            service.remove_task(&id).await?;
            Ok(())
        }
        Command::ClearCompleted => {
            service.repository().clear_completed_tasks().await?;
            Ok(())
        }
        Command::DeleteAll => {
            service.repository().delete_all_tasks().await?;
            Ok(())
        }
        Command::Refresh => {
            service.refresh().await?;
            println!("refreshed");
            Ok(())
        }
    }
}

fn print_task(task: &Task) {
    let mark = if task.is_completed { "x" } else { " " };
    println!("[{mark}] {}  {}", task.id, task.title_for_list());
}
