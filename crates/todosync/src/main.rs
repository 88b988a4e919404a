//! todosync CLI entry point.

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use todosync::cli::{edit_request, Cli, Commands, OutputFormat};
use todosync::output::{format_output, pretty};
use todosync::{app, Config, TaskListModel};
use todosync_core::task::{find_task, Task, TaskId, UpdateTaskRequest};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so JSON output stays parseable
    let default_filter = if cli.quiet { "todosync=warn" } else { "todosync=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::from_env();
    if let Some(db) = cli.db.clone() {
        config.db_path = db;
    }

    let repository = app::build_repository(&config)
        .await
        .with_context(|| format!("failed to open task database at {}", config.db_path))?;
    let mut model = TaskListModel::new(repository);
    model.load().await;
    if let Some(err) = model.error() {
        bail!("{err}");
    }

    match cli.command {
        Commands::List => print_tasks(model.tasks(), cli.format),
        Commands::Sync => {
            let report = model.refresh().await.ok_or_else(|| failure(&model))?;
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&report, cli.format)),
                OutputFormat::Pretty => {
                    println!("{}", pretty::format_sync_report(&report));
                    if !cli.quiet {
                        println!("{}", pretty::format_tasks(model.tasks()));
                    }
                }
            }
        }
        Commands::Add { title, image_url } => {
            let task = model
                .add_task(&title, image_url)
                .await
                .ok_or_else(|| failure(&model))?;
            print_task("Created", &task, cli.format);
        }
        Commands::Edit {
            id,
            title,
            image_url,
            clear_image,
            completed,
        } => {
            let request = edit_request(title, image_url, clear_image, completed);
            if request.is_empty() {
                bail!("nothing to change for task {id}");
            }
            let task = model
                .edit_task(id, request)
                .await
                .ok_or_else(|| failure(&model))?;
            print_task("Updated", &task, cli.format);
        }
        Commands::Toggle { id } => {
            let task = model
                .toggle_task(id)
                .await
                .ok_or_else(|| failure(&model))?;
            print_task("Toggled", &task, cli.format);
        }
        Commands::Delete { id } => {
            if !model.delete_task(id).await {
                return Err(failure(&model));
            }
            if !cli.quiet {
                println!("Deleted task {}", id);
            }
        }
        Commands::Photos { count } => {
            if !model.load_photos(Some(count)).await {
                return Err(failure(&model));
            }
            match cli.format {
                OutputFormat::Json => println!("{}", format_output(&model.photos(), cli.format)),
                OutputFormat::Pretty => println!("{}", pretty::format_photos(model.photos())),
            }
        }
        Commands::Pick { id, index, count } => {
            require(&model, id)?;
            if !model.load_photos(Some(count)).await {
                return Err(failure(&model));
            }
            let photo = model.photos().get(index).cloned().ok_or_else(|| {
                anyhow!(
                    "photo index {index} out of range ({} photos fetched)",
                    model.photos().len()
                )
            })?;
            model.clear_photos();

            let request = UpdateTaskRequest::new().with_image_url(photo.small_url);
            let task = model
                .edit_task(id, request)
                .await
                .ok_or_else(|| failure(&model))?;
            print_task("Updated", &task, cli.format);
        }
    }

    Ok(())
}

fn require(model: &TaskListModel, id: TaskId) -> Result<()> {
    find_task(model.tasks(), id)
        .map(|_| ())
        .ok_or_else(|| anyhow!("Task not found: {id}"))
}

fn failure(model: &TaskListModel) -> anyhow::Error {
    anyhow!(model.error().unwrap_or("operation failed").to_string())
}

fn print_tasks(tasks: &[Task], format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", format_output(&tasks, format)),
        OutputFormat::Pretty => println!("{}", pretty::format_tasks(tasks)),
    }
}

fn print_task(action: &str, task: &Task, format: OutputFormat) {
    match format {
        OutputFormat::Json => println!("{}", format_output(task, format)),
        OutputFormat::Pretty => println!("{}:\n{}", action, pretty::format_task(task)),
    }
}
