use clap::{Parser, Subcommand};
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::{EnvFilter, fmt};

use jyp::commands::{
    cmd_config_show, cmd_discussion, cmd_like, cmd_login, cmd_logout, cmd_personality, cmd_plan,
};
use jyp::{AuthVendor, Config, JypError, Result, ServiceProvider};

#[derive(Parser)]
#[command(name = "jyp")]
#[command(about = "Plan trips together: vote on places, build the itinerary")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a journey's tags and ranked candidate places
    #[command(visible_alias = "d")]
    Discussion {
        /// Journey ID
        id: String,
    },

    /// Show a journey's day-by-day itinerary
    #[command(visible_alias = "p")]
    Plan {
        /// Journey ID
        id: String,
    },

    /// Toggle your like on a candidate place
    Like {
        /// Journey ID
        journey: String,

        /// Candidate place (pikmi) ID
        pikmi: String,
    },

    /// Classify onboarding answers into a travel personality
    Personality {
        /// Prefers planning the whole journey in advance
        #[arg(long)]
        journey: bool,

        /// Prefers deciding places in advance
        #[arg(long)]
        place: bool,

        /// Prefers a detailed plan for each day
        #[arg(long)]
        plan: bool,
    },

    /// Sign in with an identity provider token
    Login {
        /// Identity provider: apple or kakao
        #[arg(value_parser = parse_vendor)]
        vendor: AuthVendor,

        /// Token issued by the identity provider
        token: String,
    },

    /// Forget the stored access token
    Logout,

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show the current configuration
    Show,
}

fn parse_vendor(s: &str) -> std::result::Result<AuthVendor, String> {
    s.parse().map_err(|e: JypError| e.to_string())
}

/// Build the services for commands that talk to the API or the local stores.
fn services() -> Result<(ServiceProvider, Duration)> {
    let config = Config::load()?;
    let provider = ServiceProvider::from_config(&config)?;
    Ok((provider, config.request_timeout()))
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Discussion { id } => {
            let (provider, timeout) = services()?;
            cmd_discussion(&provider, &id, timeout).await
        }
        Commands::Plan { id } => {
            let (provider, timeout) = services()?;
            cmd_plan(&provider, &id, timeout).await
        }
        Commands::Like { journey, pikmi } => {
            let (provider, timeout) = services()?;
            cmd_like(&provider, &journey, &pikmi, timeout).await
        }
        Commands::Personality {
            journey,
            place,
            plan,
        } => {
            let (provider, _) = services()?;
            cmd_personality(provider.preferences.as_ref(), journey, place, plan)
        }
        Commands::Login { vendor, token } => {
            let (provider, timeout) = services()?;
            cmd_login(&provider, vendor, &token, timeout).await
        }
        Commands::Logout => {
            let (provider, _) = services()?;
            cmd_logout(&provider)
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}
