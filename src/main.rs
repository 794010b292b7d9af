use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::watch;

use lembrete_core::channel::{ConsoleNotifier, ConsoleSpeaker};
use lembrete_core::config::{self, Config};
use lembrete_core::service::{shared, Assistant, NotificationScheduler};
use lembrete_core::store::{FileReminderBackend, ReminderStore};
use lembrete_core::util::{format_due, Clock, SystemClock};

#[derive(Parser)]
#[command(
    name = "lembrete",
    about = format!("{} lembrete - Voice-command reminders", lembrete_core::LOGO),
    version = lembrete_core::VERSION,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Handle one utterance, e.g. `lembrete say criar lembrete para comprar pão amanhã às 8`
    Say {
        /// Words of the utterance
        #[arg(required = true)]
        words: Vec<String>,
    },
    /// Read utterances line by line while delivering due reminders
    Listen,
    /// List reminders, earliest first
    List,
    /// Remove a reminder by ID
    Remove {
        /// Reminder ID
        id: String,
    },
    /// Deliver every due reminder now
    Sweep,
    /// Show lembrete status
    Status,
    /// Write the default configuration
    Onboard,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("lembrete=info".parse()?),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Say { words } => cmd_say(words.join(" ")).await?,
        Commands::Listen => cmd_listen().await?,
        Commands::List => cmd_list().await?,
        Commands::Remove { id } => cmd_remove(id).await?,
        Commands::Sweep => cmd_sweep().await?,
        Commands::Status => cmd_status()?,
        Commands::Onboard => cmd_onboard()?,
    }

    Ok(())
}

/// Wire store, console channels, scheduler and assistant from the config.
fn build_assistant(cfg: &Config) -> Assistant {
    let store = shared(ReminderStore::new(Box::new(FileReminderBackend::new(
        cfg.store_path(),
    ))));
    let notifier = Arc::new(ConsoleNotifier::new(cfg.notifications.enabled));
    let speaker = Arc::new(ConsoleSpeaker::new(cfg.speech.enabled));

    let scheduler = NotificationScheduler::new(store, notifier, speaker.clone())
        .with_sweep_interval(cfg.sweep_interval())
        .with_timers(cfg.scheduler.timers_enabled);

    Assistant::new(Arc::new(scheduler), speaker, Arc::new(SystemClock))
}

async fn cmd_say(utterance: String) -> Result<()> {
    let cfg = config::load_config_from_env();
    let assistant = build_assistant(&cfg);

    let reply = assistant.handle(&utterance).await;
    if !cfg.speech.enabled {
        println!("{} {}", lembrete_core::LOGO, reply.text);
    }
    if reply.created.is_some() {
        println!("Run `lembrete listen` to be notified when it is due.");
    }
    Ok(())
}

async fn cmd_listen() -> Result<()> {
    let cfg = config::load_config_from_env();
    let assistant = build_assistant(&cfg);
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    let armed = assistant.scheduler().arm_pending(clock.now()).await;
    tracing::info!("Re-armed {} pending reminder(s)", armed);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let scheduler = assistant.scheduler().clone();
    let sweep_clock = clock.clone();
    let sweep_handle = tokio::spawn(async move { scheduler.run(sweep_clock, shutdown_rx).await });

    println!(
        "{} Listening (one utterance per line, Ctrl+D to exit)\n",
        lembrete_core::LOGO
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                let reply = assistant.handle(line).await;
                if !cfg.speech.enabled {
                    println!("{} {}\n", lembrete_core::LOGO, reply.text);
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    shutdown_tx.send(true).ok();
    sweep_handle.await?;
    Ok(())
}

async fn cmd_list() -> Result<()> {
    let cfg = config::load_config_from_env();
    let assistant = build_assistant(&cfg);
    let now = SystemClock.now();

    let reminders = assistant.reminders().await;
    if reminders.is_empty() {
        println!("No reminders.");
        return Ok(());
    }

    println!("Reminders\n");
    println!("  {:<10} {:<30} {:<26} {:<10}", "ID", "Title", "Due", "Status");
    println!("  {}", "-".repeat(76));

    for r in &reminders {
        let status = if r.notified {
            "notified"
        } else if r.due_at <= now {
            "past"
        } else {
            "pending"
        };
        println!(
            "  {:<10} {:<30} {:<26} {:<10}",
            r.id,
            r.title,
            format_due(r.due_at, now),
            status
        );
    }

    Ok(())
}

async fn cmd_remove(id: String) -> Result<()> {
    let cfg = config::load_config_from_env();
    let assistant = build_assistant(&cfg);

    if assistant.delete_reminder(&id).await? {
        println!("✓ Removed reminder {}", id);
    } else {
        println!("Reminder {} not found", id);
    }

    Ok(())
}

async fn cmd_sweep() -> Result<()> {
    let cfg = config::load_config_from_env();
    let assistant = build_assistant(&cfg);

    let delivered = assistant.scheduler().sweep(SystemClock.now()).await;
    println!("{} Delivered {} reminder(s)", lembrete_core::LOGO, delivered);
    Ok(())
}

fn cmd_status() -> Result<()> {
    let config_path = config::get_config_path();
    let cfg = config::load_config_from_env();
    let store_path = cfg.store_path();

    println!("{} lembrete Status\n", lembrete_core::LOGO);

    println!(
        "Config: {} {}",
        config_path.display(),
        if config_path.exists() { "✓" } else { "✗" }
    );
    println!(
        "Store: {} {}",
        store_path.display(),
        if store_path.exists() { "✓" } else { "✗" }
    );

    let store = ReminderStore::new(Box::new(FileReminderBackend::new(store_path)));
    let now = SystemClock.now();
    println!(
        "Reminders: {} ({} due, not yet notified)",
        store.len(),
        store.due_unnotified(now).len()
    );
    println!("Sweep interval: {}s", cfg.sweep_interval().as_secs());
    println!(
        "Timers: {}",
        if cfg.scheduler.timers_enabled { "✓" } else { "off" }
    );
    println!(
        "Notifications: {}",
        if cfg.notifications.enabled { "✓" } else { "off" }
    );
    println!(
        "Speech: {}",
        if cfg.speech.enabled { "✓" } else { "off" }
    );

    Ok(())
}

fn cmd_onboard() -> Result<()> {
    let config_path = config::get_config_path();

    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        println!("Delete it first to re-onboard.");
        return Ok(());
    }

    let cfg = Config::default();
    config::save_config(&cfg, None)?;
    println!("{} Created config at {}", lembrete_core::LOGO, config_path.display());

    println!("\n{} lembrete is ready!", lembrete_core::LOGO);
    println!("\nNext steps:");
    println!("  1. Add a reminder: lembrete say criar lembrete para comprar pão amanhã às 8");
    println!("  2. Stay notified:  lembrete listen");
    Ok(())
}
