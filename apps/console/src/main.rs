use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::Parser;
use client_core::{EntityController, EntitySchema, Outcome, OrderWorkspace};
use tokio::{
    io::{AsyncBufReadExt, BufReader},
    sync::broadcast::error::RecvError,
    task::JoinHandle,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod command;
mod config;
mod render;

use command::{parse_line, ConsoleCommand, Target, HELP};
use config::{load_settings, select_log_filter};

#[derive(Parser, Debug)]
#[command(about = "Order and order item console over the REST backend")]
struct Args {
    /// Overrides the configured server url.
    #[arg(long)]
    server_url: Option<String>,
    /// Config file; defaults to ./console.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    log_filter: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let mut settings = load_settings(args.config.as_deref())?;
    if let Some(url) = args.server_url {
        settings.server_url = url;
    }
    settings.log_filter = select_log_filter(
        args.log_filter,
        std::env::var("RUST_LOG").ok(),
        &settings.log_filter,
    );

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_filter))
        .with_writer(std::io::stderr)
        .init();

    let workspace = OrderWorkspace::connect(&settings.server_url)
        .with_context(|| format!("cannot use server url '{}'", settings.server_url))?;
    info!(server_url = %settings.server_url, "console ready");

    let printers = [
        spawn_printer(&workspace.orders),
        spawn_printer(&workspace.items),
    ];

    println!("{HELP}");
    let mut inflight: Vec<JoinHandle<Outcome>> = Vec::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        inflight.retain(|task| !task.is_finished());
        let command = match parse_line(&line) {
            Ok(command) => command,
            Err(err) => {
                println!("error: {err}");
                continue;
            }
        };

        match command {
            ConsoleCommand::Empty => {}
            ConsoleCommand::Help => println!("{HELP}"),
            ConsoleCommand::Quit => break,
            ConsoleCommand::Show(target) => {
                if target != Some(Target::Item) {
                    print!("{}", render::render_view(&workspace.orders.snapshot().await));
                }
                if target != Some(Target::Order) {
                    print!("{}", render::render_view(&workspace.items.snapshot().await));
                }
            }
            ConsoleCommand::Set {
                target,
                field,
                value,
            } => {
                let result = match target {
                    Target::Order => workspace.orders.set_field(&field, &value).await,
                    Target::Item => workspace.items.set_field(&field, &value).await,
                };
                if let Err(err) = result {
                    println!("error: {}", err.user_message());
                }
            }
            ConsoleCommand::Act { target, action } => {
                let task = match target {
                    Target::Order => workspace.orders.dispatch(action).await,
                    Target::Item => workspace.items.dispatch(action).await,
                };
                inflight.push(task);
            }
        }
    }

    for task in inflight {
        join_logged(task, "action task").await;
    }
    // dropping the controllers closes the event streams once drained
    drop(workspace);
    for printer in printers {
        join_logged(printer, "event printer").await;
    }
    Ok(())
}

/// Awaits a spawned task; a panic or abort is logged instead of dropped.
async fn join_logged<T>(task: JoinHandle<T>, what: &str) -> Option<T> {
    match task.await {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(task = what, "task ended abnormally: {err}");
            None
        }
    }
}

fn spawn_printer<S: EntitySchema>(controller: &Arc<EntityController<S>>) -> JoinHandle<()> {
    let mut events = controller.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => print!("{}", render::render_event(&event)),
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "console fell behind controller events");
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn join_logged_reports_aborted_tasks() {
        let task = tokio::spawn(async {
            tokio::time::sleep(std::time::Duration::from_secs(60)).await;
        });
        task.abort();
        assert_eq!(join_logged(task, "sleeper").await, None);

        let done = tokio::spawn(async { 7 });
        assert_eq!(join_logged(done, "value").await, Some(7));
    }
}
