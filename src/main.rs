//! ChronoX CLI
//!
//! Terminal front-end for the event actor:
//! - List and inspect events
//! - Create events
//! - Attend and complete events

use anyhow::{bail, Context};
use candid::Principal;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use chronox::auth::{DevIdentityConfig, DevIdentityProvider, Session};
use chronox::config::{generate_default_config, Config, Network};
use chronox::dates::{format_date_time, now_millis};
use chronox::form::EventDraft;
use chronox::ledger::HttpConnector;
use chronox::remote::{Action, EventActions, EventQuery, EventsQuery};
use chronox::types::{attendee_label, Event, EventId, EventSummary};
use chronox::view::{
    principal_label, relative_label, status_label, DetailPanel, EventFilter,
    CARD_PRINCIPAL_CHARS, DETAIL_PRINCIPAL_CHARS,
};

#[derive(Parser)]
#[command(name = "chronox")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Decentralized event management")]
#[command(long_about = "ChronoX keeps events and attendance on a ledger-backed actor.\nBrowse events anonymously; sign in to create, attend and complete them.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: user config dir, /etc/chronox, ./config.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Network: ic or local
    #[arg(long, global = true)]
    pub network: Option<Network>,

    /// Canister hosting the event actor
    #[arg(long, global = true)]
    pub canister_id: Option<String>,

    /// Gateway URL override
    #[arg(long, global = true)]
    pub host: Option<String>,

    /// Sign in with a development identity derived from this seed
    #[arg(short, long, global = true)]
    pub identity: Option<String>,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List events
    Events {
        /// all, upcoming or completed
        #[arg(long, default_value = "all")]
        filter: EventFilter,
    },

    /// Show one event and what you can do with it
    Show {
        id: EventId,
    },

    /// Create an event
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        location: String,
        /// Local start time, e.g. 2026-05-01T14:30
        #[arg(long)]
        start: String,
    },

    /// Register as an attendee
    Attend {
        id: EventId,
    },

    /// Mark an event you organize as completed
    Complete {
        id: EventId,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Commands::Config { output } = &cli.command {
        let content = generate_default_config();
        match output {
            Some(path) => {
                std::fs::write(path, content)
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                println!("Config written to {}", path.display());
            }
            None => print!("{}", content),
        }
        return Ok(());
    }

    let config = load_config(&cli)?;
    chronox::logging::init(&config.logging, &[]);

    let connector = HttpConnector::new(config.network.clone())?;
    tracing::debug!(host = %config.network.host(), network = %config.network.network, "Using gateway");

    let mut session = Session::new();
    if let Some(seed) = &cli.identity {
        let provider = DevIdentityProvider::new(DevIdentityConfig::with_seed(seed.as_str()));
        if !session.login(&provider).await {
            bail!("Sign-in failed for identity seed '{}'", seed);
        }
    }
    let viewer = session.principal();
    let json = cli.format.eq_ignore_ascii_case("json");

    match cli.command {
        Commands::Events { filter } => {
            let mut query = EventsQuery::new();
            if !query.fetch(&connector).await {
                bail!("{}", query.error().unwrap_or_default());
            }

            let events = filter.apply(query.events());
            if json {
                println!("{}", serde_json::to_string_pretty(&events)?);
            } else {
                print_counts(query.events(), filter);
                if events.is_empty() {
                    println!("{}", filter.empty_message());
                } else {
                    print_table(&events, viewer);
                }
            }
        }

        Commands::Show { id } => {
            let event = fetch_event(&connector, id).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&event)?);
            } else {
                print_event(&event, viewer);
            }
        }

        Commands::Create {
            title,
            location,
            start,
        } => {
            let payload = match EventDraft::new(title, location, start).validate(now_millis()) {
                Ok(payload) => payload,
                Err(errors) => {
                    for message in [&errors.title, &errors.location, &errors.start_time]
                        .into_iter()
                        .flatten()
                    {
                        eprintln!("  {}", message);
                    }
                    bail!("Invalid event");
                }
            };

            let mut actions = EventActions::new();
            let id = actions
                .create_event(&connector, &session, &payload)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message(Action::Create)))?;

            if json {
                println!("{}", serde_json::json!({ "id": id }));
            } else {
                println!("Created event {}", id);
            }
        }

        Commands::Attend { id } => {
            let mut actions = EventActions::new();
            actions
                .attend_event(&connector, &session, id)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message(Action::Attend)))?;
            report_action(&connector, &session, Action::Attend, id, json).await?;
        }

        Commands::Complete { id } => {
            let mut actions = EventActions::new();
            actions
                .complete_event(&connector, &session, id)
                .await
                .map_err(|e| anyhow::anyhow!(e.user_message(Action::Complete)))?;
            report_action(&connector, &session, Action::Complete, id, json).await?;
        }

        Commands::Config { .. } => {}
    }

    Ok(())
}

/// Config file, then environment, then flags
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default()?,
    };

    if let Some(network) = cli.network {
        config.network.network = network;
    }
    if let Some(canister_id) = &cli.canister_id {
        config.network.canister_id = canister_id.clone();
    }
    if let Some(host) = &cli.host {
        config.network.host = Some(host.clone());
    }
    Ok(config)
}

async fn fetch_event(connector: &HttpConnector, id: EventId) -> anyhow::Result<Event> {
    let mut query = EventQuery::new();
    query.watch(connector, Some(id)).await;
    match query.event() {
        Some(event) => Ok(event.clone()),
        None => bail!(
            "{}",
            query.error().unwrap_or("The requested event could not be found.")
        ),
    }
}

/// Show the refreshed record after a successful write
async fn report_action(
    connector: &HttpConnector,
    session: &Session,
    action: Action,
    id: EventId,
    json: bool,
) -> anyhow::Result<()> {
    let event = fetch_event(connector, id).await?;
    if json {
        println!("{}", serde_json::to_string_pretty(&event)?);
    } else {
        println!("{}", action.success_message());
        println!();
        print_event(&event, session.principal());
    }
    Ok(())
}

fn print_counts(events: &[EventSummary], active: EventFilter) {
    let parts: Vec<String> = EventFilter::ALL
        .iter()
        .map(|filter| {
            let label = format!("{} ({})", filter.label(), filter.count(events));
            if *filter == active {
                format!("[{}]", label)
            } else {
                label
            }
        })
        .collect();
    println!("{}", parts.join("  "));
    println!();
}

fn print_table(events: &[&EventSummary], viewer: Option<Principal>) {
    let now = now_millis();

    // Header
    println!(
        "{:<5} | {:<28} | {:<25} | {:<16} | {:<10} | {:<13} | {}",
        "ID", "Title", "Starts", "", "Status", "Attendees", "Organizer"
    );

    // Separator
    println!("{}", "-".repeat(128));

    for event in events {
        println!(
            "{:<5} | {:<28} | {:<25} | {:<16} | {:<10} | {:<13} | {}",
            event.id,
            truncate(&event.title, 28),
            format_date_time(event.start_time),
            relative_label(event.start_time, event.completed, now).unwrap_or_default(),
            status_label(event.completed),
            attendee_label(event.num_of_attendees),
            principal_label(&event.creator, viewer, CARD_PRINCIPAL_CHARS),
        );
    }
}

fn print_event(event: &Event, viewer: Option<Principal>) {
    let now = now_millis();

    println!("{}  [{}]", event.title, status_label(event.completed));
    println!();
    println!("  Location:   {}", event.location);
    match relative_label(event.start_time, event.completed, now) {
        Some(relative) => println!("  Date/Time:  {} ({})", format_date_time(event.start_time), relative),
        None => println!("  Date/Time:  {}", format_date_time(event.start_time)),
    }
    println!("  Attendees:  {}", attendee_label(event.attendee_count()));
    println!(
        "  Organizer:  {}",
        principal_label(&event.creator, viewer, DETAIL_PRINCIPAL_CHARS)
    );
    println!("  Event ID:   {}", event.id);

    println!();
    if event.attendees.is_empty() {
        println!("No attendees yet. Be the first to join!");
    } else {
        println!("Attendees ({})", event.attendees.len());
        for (index, attendee) in event.attendees.iter().enumerate() {
            println!(
                "  {:>3}. {}",
                index + 1,
                principal_label(attendee, viewer, DETAIL_PRINCIPAL_CHARS)
            );
        }
    }

    let panel = DetailPanel::decide(event, viewer, now);
    println!();
    if let Some(notice) = panel.notice() {
        println!("{}", notice);
    }
    let mut commands = Vec::new();
    if panel.can_attend() {
        commands.push(format!("chronox attend {}", event.id));
    }
    if panel.can_complete() {
        commands.push(format!("chronox complete {}", event.id));
    }
    if panel == DetailPanel::SignIn {
        commands.push(format!("chronox --identity <seed> attend {}", event.id));
    }
    if !commands.is_empty() {
        println!("Available: {}", commands.join(", "));
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    }
}
