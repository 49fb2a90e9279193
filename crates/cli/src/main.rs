//! Admin Portal CLI - command-line front-end for the admin portal.
//!
//! # Usage
//!
//! ```bash
//! # Where would the app open? (home with a stored session, login otherwise)
//! ap-cli launch
//!
//! # Sign in as a super-admin
//! ap-cli login -e admin@example.com
//!
//! # List admins, optionally filtered by name, email or restaurant
//! ap-cli list -s munchies
//!
//! # Create an admin
//! ap-cli create --name "Jane Smith" --email jane@example.com --password '...' \
//!     --restaurant "Food Palace"
//!
//! # Update an admin (password cannot be changed here)
//! ap-cli update --id 65f1c0ffee --phone 555-0100
//!
//! # Show the cached profile, then sign out
//! ap-cli profile
//! ap-cli logout
//! ```
//!
//! # Environment Variables
//!
//! - `ADMIN_PORTAL_API_URL` - API base URL (default: production `/api/v2`)
//! - `ADMIN_PORTAL_DATA_DIR` - Where the session is stored
//! - `ADMIN_PORTAL_PASSWORD` - Password for `login` (prompted when unset)
//! - `SENTRY_DSN` - Enables Sentry error tracking
//! - `LOG_FORMAT=json` - Structured log output
//! - `RUST_LOG` - Log filter

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use admin_portal::config::ClientConfig;
use admin_portal::notify::{Notification, Notifier};

mod commands;
mod output;
mod state;

use state::AppState;

#[derive(Parser)]
#[command(name = "ap-cli")]
#[command(author, version, about = "Admin portal command-line client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show where the app would open: home with a stored session, login otherwise
    Launch,
    /// Sign in as a super-admin
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,

        /// Account password (prompted when omitted)
        #[arg(short, long, env = "ADMIN_PORTAL_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Sign out and forget the stored session
    Logout,
    /// Show the signed-in admin's cached profile
    Profile,
    /// List admins
    List {
        /// Case-insensitive filter over name, email and restaurant
        #[arg(short, long, default_value = "")]
        search: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Register a new admin
    Create(commands::admin::CreateArgs),
    /// Update an existing admin
    Update(commands::admin::UpdateArgs),
}

/// Initialize Sentry error tracking and return guard that must be kept alive.
fn init_sentry(config: &ClientConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            environment: config
                .sentry_environment
                .clone()
                .map(std::borrow::Cow::Owned),
            sample_rate: config.sentry_sample_rate,
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

/// Filter tracing events to Sentry event types.
fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR => sentry_tracing::EventFilter::Event,
        tracing::Level::WARN | tracing::Level::INFO => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

fn init_tracing() {
    // Logs go to stderr so command output stays machine-readable
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "admin_portal=warn,ap_cli=info".into());

    let is_json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match ClientConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            init_tracing();
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };

    // Sentry must be initialized before the tracing subscriber
    let _sentry_guard = init_sentry(&config);
    init_tracing();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli, config).await;

    if let Err(e) = result {
        tracing::debug!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: ClientConfig) -> Result<(), Box<dyn std::error::Error>> {
    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            output::print_notifications(&[Notification::from_error(&e)]);
            return Err(e.into());
        }
    };

    let result = match cli.command {
        Commands::Launch => commands::session::launch(&state).await,
        Commands::Login { email, password } => {
            commands::session::login(&state, &email, password).await
        }
        Commands::Logout => commands::session::logout(&state).await,
        Commands::Profile => commands::session::profile(&state).await,
        Commands::List { search, json } => commands::admin::list(&state, &search, json).await,
        Commands::Create(args) => commands::admin::create(&state, args).await,
        Commands::Update(args) => commands::admin::update(&state, args).await,
    };

    if let Err(e) = &result
        && let Some(notification) = output::unreported_error(&**e)
    {
        state.notifier.notify(notification);
    }

    // Every command outcome surfaces here, success or failure
    output::print_notifications(&state.notifier.drain());

    result
}
