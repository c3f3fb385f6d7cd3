//! Habesha Feedback CLI
//!
//! Command-line interface for front-desk and admin operations:
//! - Check server status
//! - Browse feedback and statistics
//! - Submit guest feedback and staff logs
//! - Issue QR-code session links
//! - Watch a live dashboard
//! - Export to CSV

use anyhow::Context;
use clap::{Parser, Subcommand};
use habesha_core::analytics::{
    display_details, display_location, source_heading, Highlight, NO_RATINGS_MESSAGE,
    RATING_LABELS,
};
use habesha_core::chat::BOT_NAME;
use habesha_core::dashboard::EMPTY_MESSAGE;
use habesha_core::{
    DashboardView, FeedbackEntry, FeedbackSource, GuestSubmission, Language, Severity,
    StaffCategory, StaffLog,
};
use habesha_feedback::api::dto::IssueTokenRequest;
use habesha_feedback::client::{ApiClient, ClientError};
use habesha_feedback::dashboard::{
    DashboardPoller, DashboardSnapshot, PollerCommand, PollerEvent,
};
use habesha_feedback::export::write_csv;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "habesha")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Hotel guest feedback from the command line")]
#[command(long_about = "Habesha Hospitality Hub feedback CLI.\nSubmit feedback, issue QR-code links and watch the live dashboard.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API server URL
    #[arg(long, default_value = "http://localhost:8082", global = true)]
    pub api_url: String,

    /// Output format (table, json)
    #[arg(short, long, default_value = "table", global = true)]
    pub format: String,

    /// Request timeout in seconds
    #[arg(long, default_value = "10", global = true)]
    pub timeout: u64,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show server status
    Status,

    /// List feedback entries, newest first
    List {
        /// Only guest or staff entries
        #[arg(short, long)]
        source: Option<FeedbackSource>,
        /// Maximum number of entries
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Show dashboard statistics
    Stats,

    /// Submit general guest feedback
    Guest {
        /// Star rating (1-5)
        #[arg(short, long)]
        rating: u8,
        /// Comment
        #[arg(short, long)]
        comment: String,
        /// Room number
        #[arg(long)]
        room: Option<String>,
        /// Form language (ENG, AMH)
        #[arg(long, default_value = "ENG")]
        lang: Language,
    },

    /// Log verbal or observed feedback as staff
    Staff {
        /// Room, Food, Service, Maintenance or Other
        #[arg(short, long)]
        category: StaffCategory,
        /// Low, Medium or High
        #[arg(short, long)]
        severity: Severity,
        /// Where it happened
        #[arg(short, long)]
        location: Option<String>,
        /// What the guest said or what was observed
        details: String,
    },

    /// Issue a session link for a room or checkout QR code
    IssueToken {
        /// Location code (checkout, room, dining_table, pool, lobby, restroom_lobby)
        #[arg(short, long)]
        loc: String,
        /// Room number or table id
        #[arg(short, long)]
        id: Option<String>,
        /// Guest name shown on the form
        #[arg(short, long)]
        guest_name: Option<String>,
        /// Lifetime in hours
        #[arg(long)]
        ttl_hours: Option<u32>,
    },

    /// Ask the chat assistant a question
    Chat {
        /// Message text
        message: Vec<String>,
    },

    /// Live dashboard in the terminal (r = refresh, p = toggle polling, q = quit)
    Watch {
        /// Start with auto-refresh turned off
        #[arg(long)]
        no_poll: bool,
        /// Poll period in seconds
        #[arg(long, default_value = "15")]
        interval: u64,
    },

    /// Export feedback as CSV
    Export {
        /// Only guest or staff entries
        #[arg(short, long)]
        source: Option<FeedbackSource>,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
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
    let client = ApiClient::new(&cli.api_url, Duration::from_secs(cli.timeout))
        .context("Failed to create HTTP client")?;
    let json = cli.format == "json";

    match cli.command {
        Commands::Status => match client.health().await {
            Ok(health) => {
                println!("Habesha Feedback v{}", env!("CARGO_PKG_VERSION"));
                println!();
                println!("API Status: {}", health.status);
                println!("Storage: {}", health.storage);
                println!("Chat backend: {}", health.chat_backend);
                println!("Entries: {}", health.entries);
                println!();
                println!("Uptime: {}", format_duration(health.uptime_seconds));
            }
            Err(e) => {
                eprintln!("Cannot connect to Habesha feedback API at {}", cli.api_url);
                eprintln!("Error: {}", e);
                eprintln!();
                eprintln!("Make sure the API server is running:");
                eprintln!("  cargo run --bin habesha-api");
                std::process::exit(1);
            }
        },

        Commands::List { source, limit } => {
            let entries = client.list(source, limit).await.unwrap_or_else(|e| fail(e));

            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("{}", EMPTY_MESSAGE);
            } else {
                print_entries(&entries);
            }
        }

        Commands::Stats => {
            let stats = client.stats().await.unwrap_or_else(|e| fail(e));

            if json {
                println!("{}", serde_json::to_string_pretty(&stats)?);
            } else {
                println!("Total entries:        {}", stats.stats.total_entries);
                println!("Negative entries:     {}", stats.stats.negative_entries);
                println!("Average guest rating: {}", stats.stats.average_display());
                println!("Top staff category:   {}", stats.stats.top_category_display());
                println!();
                println!("Rating distribution:");
                for slice in &stats.rating_distribution {
                    println!("  {:<16} {}", slice.label, bar(slice.percentage));
                }
            }
        }

        Commands::Guest {
            rating,
            comment,
            room,
            lang,
        } => {
            let sub = GuestSubmission {
                rating,
                comment,
                room_number: room,
                language: lang,
            };
            let entry = client.submit_guest(&sub).await.unwrap_or_else(|e| fail(e));
            println!("Thank you! Feedback {} recorded.", entry.id);
        }

        Commands::Staff {
            category,
            severity,
            location,
            details,
        } => {
            let log = StaffLog {
                category: Some(category),
                severity: Some(severity),
                location,
                details,
            };
            let entry = client.submit_staff(&log).await.unwrap_or_else(|e| fail(e));
            println!("Staff log {} recorded.", entry.id);
        }

        Commands::IssueToken {
            loc,
            id,
            guest_name,
            ttl_hours,
        } => {
            let req = IssueTokenRequest {
                loc,
                id,
                guest_name,
                ttl_hours,
            };
            let issued = client.issue_token(&req).await.unwrap_or_else(|e| fail(e));

            if json {
                println!("{}", serde_json::to_string_pretty(&issued)?);
            } else {
                println!("Token:   {}", issued.token);
                println!("Expires: {}", issued.expires_at.format("%Y-%m-%d %H:%M UTC"));
                println!("Link:    {}{}", client.base_url(), issued.link);
            }
        }

        Commands::Chat { message } => {
            let message = message.join(" ");
            let reply = client.chat(&message).await.unwrap_or_else(|e| fail(e));
            println!("{}: {}", BOT_NAME, reply);
        }

        Commands::Watch { no_poll, interval } => {
            watch(client, !no_poll, Duration::from_secs(interval.max(1))).await?;
        }

        Commands::Export { source, output } => {
            let entries = client.list(source, None).await.unwrap_or_else(|e| fail(e));

            match output {
                Some(path) => {
                    let file = std::fs::File::create(&path)
                        .with_context(|| format!("Cannot create {:?}", path))?;
                    write_csv(&entries, file)?;
                    println!("Exported {} entries to {:?}", entries.len(), path);
                }
                None => {
                    write_csv(&entries, std::io::stdout().lock())?;
                }
            }
        }

        Commands::Config { output } => {
            let config = habesha_feedback::config::generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(&path, &config)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", config);
                }
            }
        }
    }

    Ok(())
}

/// Print a client error (with per-field messages) and exit
fn fail(err: ClientError) -> ! {
    eprintln!("Error: {}", err);
    if let Some(fields) = err.fields() {
        for (field, message) in fields.iter() {
            eprintln!("  {}: {}", field, message);
        }
    }
    std::process::exit(1);
}

/// Run the terminal dashboard until `q` or end of input
async fn watch(client: ApiClient, polling: bool, period: Duration) -> anyhow::Result<()> {
    let mut handle = DashboardPoller::new(Arc::new(client), polling)
        .with_period(period)
        .spawn();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut last: Option<DashboardSnapshot> = None;
    let mut notice = String::new();

    loop {
        tokio::select! {
            event = handle.events.recv() => {
                let Some(event) = event else { break };
                match event {
                    PollerEvent::Updated { snapshot, outcome } => {
                        if let Some(outcome) = outcome {
                            notice = outcome.message().to_string();
                        }
                        last = Some(snapshot);
                    }
                    PollerEvent::Rejected(reason) => notice = reason.to_string(),
                    PollerEvent::PollingChanged(on) => {
                        notice = format!("Auto-refresh {}", if on { "on" } else { "off" });
                        if let Some(snapshot) = last.as_mut() {
                            snapshot.polling = on;
                        }
                    }
                }
                render(last.as_ref(), &notice);
            }
            line = lines.next_line() => {
                let command = match line?.as_deref().map(str::trim) {
                    Some("r") => PollerCommand::Refresh,
                    Some("p") => PollerCommand::TogglePolling,
                    Some("q") | None => PollerCommand::Stop,
                    Some(_) => continue,
                };
                let stop = command == PollerCommand::Stop;
                if handle.commands.send(command).await.is_err() || stop {
                    break;
                }
            }
        }
    }

    handle.task.await?;
    Ok(())
}

fn render(snapshot: Option<&DashboardSnapshot>, notice: &str) {
    print!("\x1B[2J\x1B[H");
    println!("Habesha Hospitality Hub - Admin Dashboard");
    println!("{}", "=".repeat(60));

    let Some(snapshot) = snapshot else {
        println!("Loading feedback data...");
        return;
    };

    if let Some(banner) = &snapshot.error_banner {
        println!("! {}", banner);
        println!();
    }

    match snapshot.view {
        DashboardView::Loading => println!("Loading feedback data..."),
        DashboardView::Empty => {
            if snapshot.error_banner.is_none() {
                println!("{}", EMPTY_MESSAGE);
            }
        }
        DashboardView::Content => {
            let stats = &snapshot.stats;
            println!(
                "Total: {}   Negative: {}   Avg rating: {}   Top staff category: {}",
                stats.total_entries,
                stats.negative_entries,
                stats.average_display(),
                stats.top_category_display()
            );
            println!();

            if snapshot.distribution.is_empty() {
                println!("{}", NO_RATINGS_MESSAGE);
            } else {
                for (i, label) in RATING_LABELS.iter().enumerate() {
                    println!(
                        "  {:<16} {:<22} {}",
                        label,
                        bar(snapshot.distribution.percentage(i)),
                        snapshot.distribution.slice_label(i)
                    );
                }
            }
            println!();
            print_entries(&snapshot.entries);
        }
    }

    println!();
    println!(
        "[r] refresh  [p] auto-refresh ({})  [q] quit   {}",
        if snapshot.polling { "on" } else { "off" },
        notice
    );
}

fn print_entries(entries: &[FeedbackEntry]) {
    println!(
        "{:<2} {:<16} {:<15} {:<6} {:<12} {}",
        "", "Date", "Type", "Rating", "Location", "Details"
    );
    println!("{}", "-".repeat(80));

    for entry in entries {
        let marker = match Highlight::classify(entry) {
            Highlight::Alert => "!!",
            Highlight::Warning => "! ",
            Highlight::Positive => "+ ",
            Highlight::Neutral => "  ",
        };
        let rating = entry
            .rating
            .map(|r| format!("{}/5", r))
            .or_else(|| entry.severity.map(|s| s.as_str().to_string()))
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{} {:<16} {:<15} {:<6} {:<12} {}",
            marker,
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            source_heading(entry.source),
            rating,
            truncate(display_location(entry), 12),
            truncate(display_details(entry), 40)
        );
    }
}

fn bar(percentage: Option<f64>) -> String {
    let width = percentage.map(|p| (p / 5.0).round() as usize).unwrap_or(0);
    format!("{:<20}", "#".repeat(width.min(20)))
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max.saturating_sub(1)).collect();
        format!("{}…", cut)
    }
}

fn format_duration(seconds: u64) -> String {
    if seconds < 60 {
        format!("{}s", seconds)
    } else if seconds < 3600 {
        format!("{}m {}s", seconds / 60, seconds % 60)
    } else if seconds < 86400 {
        format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60)
    } else {
        format!("{}d {}h", seconds / 86400, (seconds % 86400) / 3600)
    }
}
