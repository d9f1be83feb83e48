use anyhow::{Context, Result};
use serde::Serialize;

use neona_tui::projection::{detail_panel, task_rows};
use neona_tui::remote::{ClientConfig, DaemonClient, MemoryItem, short_id};
use neona_tui::session::Detail;
use neona_tui::tui::TuiRunOptions;

use crate::{Commands, MemoryCommands};

pub(super) fn handle_command(config: &ClientConfig, command: Commands) -> Result<()> {
    if let Commands::Tui = command {
        return neona_tui::tui::run_with_options(TuiRunOptions {
            client: config.clone(),
        });
    }

    let client = DaemonClient::new(config)?;
    tracing::debug!(base_url = client.base_url(), "one-shot command");

    match command {
        Commands::Tui => {}
        Commands::Health { json } => {
            let health = client.check_health();
            if json {
                print_json(&health, "health")?;
            } else if health.ok {
                println!("online  version={} db={} time={}", health.version, health.db, health.time);
            } else {
                println!("offline ({})", health.db);
            }
            if !health.ok {
                anyhow::bail!("daemon at {} is offline", client.base_url());
            }
        }
        Commands::Tasks { status, json } => {
            let tasks = client.list_tasks(status.as_deref())?;
            if json {
                print_json(&tasks, "tasks")?;
            } else {
                println!("{: <11} {: <8}  {: <20} TITLE", "STATUS", "ID", "CLAIMED BY");
                for r in task_rows(&tasks) {
                    println!("{: <11} {: <8}  {: <20} {}", r.status, r.id, r.claimed_by, r.title);
                }
                println!("{} tasks", tasks.len());
            }
        }
        Commands::Show { task_id, json } => {
            let task = client.get_task(&task_id)?;
            if json {
                print_json(&task, "task")?;
            } else {
                print_lines(&Detail::Task(task));
            }
        }
        Commands::Logs { task_id, json } => {
            let runs = client.task_logs(&task_id)?;
            if json {
                print_json(&runs, "runs")?;
            } else {
                print_lines(&Detail::Logs { task_id, runs });
            }
        }
        Commands::Workers { json } => {
            let stats = client.workers()?;
            if json {
                print_json(&stats, "workers")?;
            } else {
                print_lines(&Detail::Workers(stats));
            }
        }
        Commands::Memory { command } => handle_memory_command(&client, command)?,
    }
    Ok(())
}

fn handle_memory_command(client: &DaemonClient, command: MemoryCommands) -> Result<()> {
    match command {
        MemoryCommands::Add {
            content,
            tags,
            task,
            json,
        } => {
            if content.trim().is_empty() {
                anyhow::bail!("--content must not be empty");
            }
            let item = client.add_memory(task.as_deref().unwrap_or(""), &content, &tags)?;
            if json {
                print_json(&item, "memory item")?;
            } else {
                println!("Added memory {}", item.id);
            }
        }
        MemoryCommands::Query { query, json } => {
            let items = client.query_memory(&query)?;
            if json {
                print_json(&items, "memory items")?;
            } else {
                for m in &items {
                    println!("{}", memory_line(m));
                }
                println!("{} results", items.len());
            }
        }
    }
    Ok(())
}

fn memory_line(m: &MemoryItem) -> String {
    let task = if m.task_id.is_empty() {
        "-".to_string()
    } else {
        short_id(&m.task_id)
    };
    format!("{: <8}  {: <8}  [{}] {}", short_id(&m.id), task, m.tags, m.content)
}

fn print_lines(detail: &Detail) {
    let panel = detail_panel(detail);
    println!("{}", panel.title);
    for l in panel.lines {
        println!("{}", l);
    }
}

fn print_json<T: Serialize>(value: &T, what: &str) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(value).with_context(|| format!("serialize {} json", what))?
    );
    Ok(())
}
