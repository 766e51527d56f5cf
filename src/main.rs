// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Health-Tracker CLI
//!
//! Thin presentation layer over the client core: forwards commands to the
//! session/synchronization layer and renders the outcomes. All state and
//! failure handling lives in the library.

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use health_tracker_client::config::Config;
use health_tracker_client::models::{
    DateRangeFilter, LoginRequest, MetricEntry, NewMetric, RegisterRequest,
};
use health_tracker_client::services::{DashboardSnapshot, FetchState, RestoreOutcome};
use health_tracker_client::App;

#[derive(Parser)]
#[command(name = "health-tracker", about = "Client for the Smart Health Tracker service")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create a new account
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign in and show the dashboard
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the dashboard (profile, summary, metrics)
    Dashboard {
        /// Inclusive start date (YYYY-MM-DD) for the metrics list
        #[arg(long)]
        start: Option<NaiveDate>,
        /// Inclusive end date (YYYY-MM-DD) for the metrics list
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// List metric entries, optionally bounded by date
    Metrics {
        #[arg(long)]
        start: Option<NaiveDate>,
        #[arg(long)]
        end: Option<NaiveDate>,
    },
    /// Record a new wellness entry
    Add {
        /// Day the entry is for (defaults to today, server-side)
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long, default_value_t = 0)]
        steps: u32,
        #[arg(long, default_value_t = 0)]
        calories: u32,
        #[arg(long, default_value_t = 0)]
        heart_rate: u32,
        #[arg(long, default_value_t = 0.0)]
        sleep_hours: f64,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Show the signed-in user
    Whoami,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let app = App::new(config);

    match cli.command {
        Command::Register {
            name,
            email,
            password,
        } => {
            println!("Creating your account...");
            let request = RegisterRequest {
                name,
                email,
                password,
            };
            match app.auth.register(&request).await {
                Ok(()) => println!("Account created! Please sign in."),
                Err(err) => fail(&err.to_string()),
            }
        }

        Command::Login { email, password } => {
            println!("Signing in...");
            let request = LoginRequest { email, password };
            match app.auth.login(&request).await {
                Ok(snapshot) => {
                    println!("Login successful!");
                    render_dashboard(&snapshot);
                }
                Err(err) => fail(&err.to_string()),
            }
        }

        Command::Logout => {
            app.auth.logout();
            println!("Signed out.");
        }

        Command::Dashboard { start, end } => {
            let filter = DateRangeFilter { start, end };
            match app.auth.restore(&filter).await {
                RestoreOutcome::Anonymous => fail("Please sign in."),
                RestoreOutcome::Expired(message) => {
                    fail(&format!("{} Please sign in again.", message))
                }
                RestoreOutcome::Restored(snapshot) => render_dashboard(&snapshot),
            }
        }

        Command::Metrics { start, end } => {
            if app.session.current().is_none() {
                fail("Please sign in.");
            }
            let filter = DateRangeFilter { start, end };
            match app.dashboard.fetch_metrics(&filter).await {
                Ok(metrics) => render_metrics(&metrics),
                Err(err) => fail(&err.to_string()),
            }
        }

        Command::Add {
            date,
            steps,
            calories,
            heart_rate,
            sleep_hours,
            notes,
        } => {
            if app.session.current().is_none() {
                fail("Please sign in.");
            }
            println!("Saving entry...");
            let entry = NewMetric {
                recorded_for: date,
                steps,
                calories,
                heart_rate,
                sleep_hours,
                notes,
            };
            match app
                .dashboard
                .submit_metric(&entry, &DateRangeFilter::default())
                .await
            {
                Ok(snapshot) => {
                    println!("Entry saved!");
                    render_dashboard(&snapshot);
                }
                Err(err) => fail(&err.to_string()),
            }
        }

        Command::Whoami => match app.session.current() {
            Some(session) => {
                let user = session.user;
                println!("{} <{}>", user.name, user.email);
            }
            None => println!("Not signed in."),
        },
    }

    Ok(())
}

/// Print an error message and exit nonzero.
fn fail(message: &str) -> ! {
    eprintln!("{}", message);
    std::process::exit(1);
}

/// Render the three dashboard panels; a failed panel shows its own error
/// without hiding the others.
fn render_dashboard(snapshot: &DashboardSnapshot) {
    match &snapshot.profile {
        FetchState::Ready(user) => {
            println!();
            println!("Welcome back, {}!", user.name);
            println!(
                "You have logged {} wellness {}.",
                user.entries,
                if user.entries == 1 { "entry" } else { "entries" }
            );
        }
        FetchState::Failed(message) => println!("\nProfile unavailable: {}", message),
        FetchState::Idle => {}
    }

    println!("\nSummary (last 30 days)");
    match &snapshot.summary {
        FetchState::Ready(summary) => {
            println!("  Entries        {}", summary.entries);
            println!("  Avg Steps      {}", summary.avg_steps);
            println!("  Avg Calories   {}", summary.avg_calories);
            println!("  Avg Heart Rate {}", summary.avg_heart_rate);
            println!("  Avg Sleep      {} hrs", summary.avg_sleep);
        }
        FetchState::Failed(message) => println!("  {}", message),
        FetchState::Idle => {}
    }

    println!("\nEntries");
    match &snapshot.metrics {
        FetchState::Ready(metrics) => render_metrics(metrics),
        FetchState::Failed(message) => println!("  {}", message),
        FetchState::Idle => {}
    }
}

fn render_metrics(metrics: &[MetricEntry]) {
    if metrics.is_empty() {
        println!("No entries yet. Add your first record!");
        return;
    }

    println!(
        "{:<12} {:>7} {:>9} {:>11} {:>7}  {}",
        "Date", "Steps", "Calories", "Heart Rate", "Sleep", "Notes"
    );
    for entry in metrics {
        println!(
            "{:<12} {:>7} {:>9} {:>11} {:>7}  {}",
            entry.recorded_for,
            entry.steps,
            entry.calories,
            entry.heart_rate,
            entry.sleep_hours,
            entry.display_notes().unwrap_or("-")
        );
    }
}

/// Initialize logging; `RUST_LOG` controls verbosity, warnings by default so
/// normal command output stays clean.
fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_target(false)
        .init();
}
