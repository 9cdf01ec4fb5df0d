use clap::{Parser, Subcommand};
use daylist::core::logging::init_logging_or_warn;
use daylist::core::settings::load_settings;
use daylist::tasks::confirm::{AutoConfirm, ConfirmationProvider};
use daylist::tasks::export::FileExportSink;
use daylist::tasks::helpers::resolve_id;
use daylist::tasks::init_controller;
use daylist::terminal::{render_groups, render_notice, render_stats, render_task, TerminalConfirm};
use daylist::TaskController;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "daylist", about = "A small task list grouped by day")]
struct Cli {
    /// Answer yes to every confirmation
    #[arg(short, long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Subcommand)]
enum Commands {
    /// Add a task
    Add { text: Vec<String> },
    /// Show tasks grouped by day
    List,
    /// Mark a task done or not done
    Toggle { id: String },
    /// Delete a task
    Delete { id: String },
    /// Delete every task
    DeleteAll,
    /// Mark all tasks done, or all not done if they already are
    ToggleAll,
    /// Remove completed tasks
    ClearCompleted,
    /// Show counts and progress
    Stats,
    /// Write a JSON snapshot of all tasks
    Export {
        /// Target directory (defaults to the current directory)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Cli::parse();

    let settings = load_settings();
    let _logging = init_logging_or_warn(&settings.resolved_data_dir(), &settings.log_level);

    let confirm: Arc<dyn ConfirmationProvider> = if args.yes {
        Arc::new(AutoConfirm)
    } else {
        Arc::new(TerminalConfirm::new())
    };

    let mut controller = init_controller(&settings, confirm).await;
    let result = run_command(&mut controller, args.command).await;

    if let Err(e) = controller.flush().await {
        tracing::error!(target: "system", error = %e, "Failed to flush pending saves");
    }
    for notice in controller.take_notices() {
        eprintln!("{}", render_notice(&notice));
    }

    result
}

async fn run_command(
    controller: &mut TaskController,
    command: Commands,
) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Add { text } => {
            controller.set_draft(text.join(" "));
            if let Ok(task) = controller.submit_draft() {
                println!("Added:\n{}", render_task(&task));
            }
        }
        Commands::List => print_list(controller),
        Commands::Toggle { id } => match lookup(controller, &id) {
            Some(id) => {
                controller.toggle(&id)?;
                print_list(controller);
            }
            None => eprintln!("No task matches '{}'", id),
        },
        Commands::Delete { id } => match lookup(controller, &id) {
            Some(id) => {
                if controller.delete(&id).await? {
                    println!("Task deleted");
                }
            }
            None => eprintln!("No task matches '{}'", id),
        },
        Commands::DeleteAll => {
            if controller.delete_all().await? {
                println!("All tasks deleted");
            }
        }
        Commands::ToggleAll => {
            controller.toggle_all_completion()?;
            print_list(controller);
        }
        Commands::ClearCompleted => {
            let removed = controller.clear_completed().await?;
            if removed > 0 {
                println!("Removed {} completed task(s)", removed);
            }
        }
        Commands::Stats => {
            if let Some(stats) = controller.stats() {
                println!("{}", render_stats(&stats));
            }
        }
        Commands::Export { out } => {
            let dir = match out {
                Some(dir) => dir,
                None => std::env::current_dir()?,
            };
            let location = controller.export(&FileExportSink::new(dir)).await?;
            println!("Exported to {}", location);
        }
    }

    Ok(())
}

fn lookup(controller: &TaskController, needle: &str) -> Option<String> {
    controller
        .tasks()
        .and_then(|tasks| resolve_id(tasks, needle))
}

fn print_list(controller: &TaskController) {
    match (controller.date_groups(), controller.stats()) {
        (Some(groups), Some(stats)) => print!("{}", render_groups(&groups, &stats)),
        _ => println!("Loading..."),
    }
}
