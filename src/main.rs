//! tsugu: Sync tasks from an Asana "Today" section into Google Tasks
//!
//! Usage:
//!   tsugu sync            # Create one Google Task per Asana task
//!   tsugu sync --dry-run  # Preview what would be created
//!   tsugu config          # Show current configuration
//!   tsugu tasks           # List tasks in the destination task list

use anyhow::Result;
use clap::{Parser, Subcommand};
use tsugu::config::SyncConfig;
use tsugu::gtasks::GtasksClient;
use tsugu::sync::SyncRunner;

#[derive(Parser)]
#[command(name = "tsugu")]
#[command(about = "Sync tasks from an Asana \"Today\" section into Google Tasks")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Synchronize the Asana section to Google Tasks
    Sync {
        /// Preview changes without applying them
        #[arg(long)]
        dry_run: bool,
    },

    /// Show current configuration
    Config,

    /// List tasks in the destination task list
    Tasks,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };
    simplelog::TermLogger::init(
        log_level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    )?;

    match cli.command {
        Commands::Sync { dry_run } => {
            if dry_run {
                println!("🔍 Dry run mode - no changes will be made");
                println!();
            }

            let config = SyncConfig::load()?;
            let section_name = config.asana.section_name.clone();
            let runner = SyncRunner::new(config)?;

            println!(
                "📋 Syncing Asana section \"{}\" to Google Tasks...",
                section_name
            );
            println!();

            let stats = runner.run(dry_run).await?;

            println!();
            if dry_run {
                println!("📊 Would make the following changes:");
            } else {
                println!("📊 Sync complete:");
            }
            println!("  📥 Fetched: {}", stats.fetched);
            println!("  ✅ Created: {}", stats.created);
            println!("  ⏭️  Skipped: {}", stats.skipped);

            if !stats.errors.is_empty() {
                println!();
                println!("⚠️  Errors ({}):", stats.errors.len());
                for error in &stats.errors {
                    println!("  - {}", error);
                }
            }
        }

        Commands::Config => {
            let config = SyncConfig::load()?;
            println!("📋 Current configuration:");
            println!();
            println!("Config file: {:?}", SyncConfig::config_file_path()?);
            println!();
            println!("[asana]");
            println!(
                "access_token = {}",
                if config.asana.access_token.is_empty() {
                    "(not set)"
                } else {
                    "(configured)"
                }
            );
            println!("workspace_gid = \"{}\"", config.asana.workspace_gid);
            println!("section_name = \"{}\"", config.asana.section_name);
            println!();
            println!("[google_tasks]");
            println!(
                "access_token = {}",
                if config.google_tasks.access_token.is_empty() {
                    "(not set)"
                } else {
                    "(configured)"
                }
            );
            println!(
                "tasklist_id = {}",
                config
                    .google_tasks
                    .tasklist_id
                    .as_deref()
                    .unwrap_or("(first list of the account)")
            );
            println!("pacing_ms = {}", config.google_tasks.pacing_ms);
        }

        Commands::Tasks => {
            let config = SyncConfig::load()?;
            config.validate()?;

            let gtasks = GtasksClient::new(&config.google_tasks.access_token);
            let tasklist_id = match &config.google_tasks.tasklist_id {
                Some(id) => id.clone(),
                None => match gtasks.first_tasklist().await? {
                    Some(list) => {
                        println!("Using default task list: {} ({})", list.id, list.title);
                        list.id
                    }
                    None => {
                        println!("No task list found.");
                        return Ok(());
                    }
                },
            };

            let tasks = gtasks.list_tasks(&tasklist_id).await?;
            if tasks.is_empty() {
                println!("No tasks in this list.");
            } else {
                for task in &tasks {
                    println!(
                        "- {} (due: {}, id: {})",
                        task.title,
                        task.due.as_deref().unwrap_or("none"),
                        task.id
                    );
                    if let Some(notes) = task.notes.as_deref() {
                        for line in notes.lines() {
                            println!("    {}", line);
                        }
                    }
                }
            }
        }
    }

    Ok(())
}
