// SPDX-License-Identifier: MPL-2.0

use clap::{Parser, Subcommand};
use roost::{config, runtime, Credentials, PostResult, RoostClient, Span, TimelineEntry, Worker};
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = config::APP_NAME, version, about = "Legacy microblogging client")]
struct Cli {
    /// Account identifier (mail address) for basic authentication.
    #[arg(long, env = "ROOST_USER")]
    user: String,

    /// Account password for basic authentication.
    #[arg(long, env = "ROOST_PASSWORD", hide_env_values = true)]
    password: String,

    /// Service base URL.
    #[arg(long, default_value = config::DEFAULT_SERVICE)]
    service: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch and print the friends timeline.
    Timeline {
        /// Emit the parsed records and spans as JSON instead of text.
        #[arg(long)]
        json: bool,
    },
    /// Post a new status, then print the refreshed timeline.
    Post { text: String },
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let credentials = Credentials::new(cli.user, cli.password);
    let worker = Worker::new(Arc::new(RoostClient::with_service(&cli.service)));

    let result = match cli.command {
        Command::Timeline { json } => {
            runtime::block_on(worker.refresh(&credentials)).map(|timeline| {
                if json {
                    print_json(&timeline);
                } else {
                    print_timeline(&timeline);
                }
            })
        }
        Command::Post { text } => runtime::block_on(worker.post(&credentials, &text)).map(
            |result| match result {
                PostResult::Posted { timeline } => print_timeline(&timeline),
                PostResult::SkippedEmpty => println!("nothing to post"),
            },
        ),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // The message is the same string a dialog would show.
            eprintln!("{}: {}", config::APP_NAME, e.message());
            ExitCode::FAILURE
        }
    }
}

fn print_timeline(timeline: &[TimelineEntry]) {
    for entry in timeline {
        let avatar = match &entry.avatar {
            Some(avatar) => format!("[{}x{}] ", avatar.width, avatar.height),
            None => String::new(),
        };
        println!(
            "{}{} (@{})",
            avatar, entry.status.author_name, entry.status.author_handle
        );

        let body: String = entry
            .spans
            .iter()
            .map(|span| match span {
                Span::Text { text } => text.clone(),
                Span::Link { text, .. } => format!("<{text}>"),
                Span::Mention { text, url } => format!("{text} ({url})"),
            })
            .collect();
        println!("  {body}");
        println!("  {}\n", format_created_at(&entry.status.created_at));
    }
}

fn print_json(timeline: &[TimelineEntry]) {
    let records: Vec<serde_json::Value> = timeline
        .iter()
        .map(|entry| {
            serde_json::json!({
                "status": &entry.status,
                "spans": &entry.spans,
            })
        })
        .collect();
    match serde_json::to_string_pretty(&records) {
        Ok(out) => println!("{out}"),
        Err(e) => eprintln!("{}: failed to serialize timeline: {e}", config::APP_NAME),
    }
}

/// Render the service timestamp in local time, falling back to the raw
/// string when it does not match the documented format.
fn format_created_at(raw: &str) -> String {
    chrono::DateTime::parse_from_str(raw, config::CREATED_AT_FORMAT)
        .map(|dt| dt.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|_| raw.to_string())
}
