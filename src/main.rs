mod api;
mod cli_messages;
mod config;
mod consts;
mod dashboard;
mod environment;
mod events;
mod logging;
mod model;
mod runtime;
mod session;
mod ui;

use crate::api::BuddyApiClient;
use crate::config::{Config, get_config_path};
use crate::consts::cli_consts;
use crate::environment::Environment;
use crate::session::{run_headless_mode, run_tui_mode, setup_session};
use clap::{Parser, Subcommand};
use std::io::Write;
use std::time::Duration;
use std::{error::Error, io};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
/// Command-line dashboard for marketplace buddies
struct Args {
    /// Command to execute
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the buddy dashboard
    Start {
        /// Log events to the console instead of running the TUI.
        #[arg(long)]
        headless: bool,

        /// Seconds between periodic full refreshes.
        #[arg(long, value_name = "SECONDS")]
        refresh_secs: Option<u64>,
    },
    /// Sign in and store the session
    Login {
        /// Account email. Prompted for when not provided.
        #[arg(long, value_name = "EMAIL")]
        email: Option<String>,
    },
    /// Clear the stored session and logout.
    Logout,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let environment_str = std::env::var("BUDDY_ENVIRONMENT").unwrap_or_default();
    let environment = environment_str
        .parse::<Environment>()
        .unwrap_or(Environment::default());

    let config_path = get_config_path()?;
    let args = Args::parse();
    match args.command {
        Command::Start {
            headless,
            refresh_secs,
        } => {
            let config = Config::load_from_file(&config_path).map_err(|e| {
                format!(
                    "No stored session ({}). Please run `buddy-dash login` first.",
                    e
                )
            })?;
            let refresh_interval = refresh_secs
                .map(Duration::from_secs)
                .unwrap_or(cli_consts::refresh::default_interval());

            print_cmd_info!("Environment", "Connecting to {:?}", environment);
            let session = setup_session(config, environment, refresh_interval).await?;
            if headless {
                run_headless_mode(session).await
            } else {
                run_tui_mode(session).await
            }
        }
        Command::Login { email } => {
            let email = match email {
                Some(email) => email,
                None => prompt("Email: ")?,
            };
            let password = prompt("Password: ")?;

            let client = BuddyApiClient::new(environment, None);
            match client.login(&email, &password).await {
                Ok(response) => {
                    let config = Config::new(
                        response.access_token,
                        response.refresh_token,
                        response.user,
                    );
                    config
                        .save(&config_path)
                        .map_err(|e| format!("Failed to save session: {}", e))?;
                    print_cmd_success!("Signed in", "Welcome back, {}!", config.user.name);
                    Ok(())
                }
                Err(e) => {
                    print_cmd_error!("Login failed", "{}", e);
                    Err(Box::new(e) as Box<dyn Error>)
                }
            }
        }
        Command::Logout => {
            println!("Signing out and clearing the stored session...");
            Config::clear(&config_path).map_err(Into::into)
        }
    }
}

/// Read one line from stdin after printing a label.
fn prompt(label: &str) -> Result<String, Box<dyn Error>> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}
