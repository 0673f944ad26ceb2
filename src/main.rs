mod smoke;

/// Version injected at compile time via CACHET_CLI_VERSION env var (set by CI/CD),
/// or "dev" for local builds.
pub const VERSION: &str = match option_env!("CACHET_CLI_VERSION") {
    Some(v) => v,
    None => "dev",
};

use anyhow::{Context, Result};
use cachet_client::{
    CachetError, Client, ClientConfig, Component, ComponentGroup, Incident, Metric, Subscriber,
};
use clap::{Parser, Subcommand, ValueEnum};
use futures::{Stream, TryStreamExt};
use std::path::PathBuf;
use std::pin::pin;
use tracing::level_filters::LevelFilter;
use tracing::Level;
use tracing_subscriber::fmt::writer::MakeWriterExt;

/// Command line client for the Cachet status page API
#[derive(Parser, Debug)]
#[command(name = "cachet", version, about, long_about = None)]
struct Args {
    /// API endpoint, e.g. https://status.example.com/api/v1 (default: $CACHET_ENDPOINT)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// API token (default: $CACHET_API_TOKEN)
    #[arg(short, long)]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Log level for debugging
    #[arg(long, value_enum, default_value = "off")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Check that the API answers
    Ping,
    /// Show the server version
    Version,
    /// List resources
    List {
        kind: Kind,
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 20)]
        per_page: u32,
    },
    /// Count resources
    Count { kind: Kind },
    /// Create, update and delete test resources on a live installation
    Smoke,
    /// Save --endpoint, --token and --timeout to the config file
    Configure,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Components,
    Groups,
    Incidents,
    Subscribers,
    Metrics,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_tracing_level(self) -> Option<Level> {
        match self {
            LogLevel::Off => None,
            LogLevel::Error => Some(Level::ERROR),
            LogLevel::Warn => Some(Level::WARN),
            LogLevel::Info => Some(Level::INFO),
            LogLevel::Debug => Some(Level::DEBUG),
            LogLevel::Trace => Some(Level::TRACE),
        }
    }
}

fn setup_logging(level: LogLevel) -> Option<tracing_appender::non_blocking::WorkerGuard> {
    let tracing_level = level.to_tracing_level()?;

    let log_path = get_log_path();

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let file = match std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
    {
        Ok(file) => file,
        Err(e) => {
            eprintln!("Cannot open log file {:?}: {}", log_path, e);
            return None;
        }
    };

    let (non_blocking, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(LevelFilter::from_level(tracing_level).into())
                .from_env_lossy(),
        )
        .with_writer(non_blocking.with_max_level(tracing_level))
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(true)
        .with_line_number(true)
        .init();

    tracing::info!("cachet {} started with log level: {:?}", VERSION, level);
    tracing::info!("Log file: {:?}", log_path);

    Some(guard)
}

fn get_log_path() -> PathBuf {
    if let Some(config_dir) = dirs::config_dir() {
        return config_dir.join("cachet").join("cachet.log");
    }
    if let Some(home) = dirs::home_dir() {
        return home.join(".cachet").join("cachet.log");
    }
    PathBuf::from("cachet.log")
}

/// Short user-facing description of a failed call
fn format_error(error: &CachetError) -> String {
    match error {
        CachetError::Api { status: 401, .. } => {
            "Authentication failed. Check the API token.".to_string()
        }
        CachetError::Api { status: 403, .. } => {
            "Permission denied for this API token.".to_string()
        }
        CachetError::Api { status: 429, .. } => {
            "Rate limit exceeded. Please try again later.".to_string()
        }
        CachetError::Api { status, .. } if *status >= 500 => {
            "Cachet server error. Please try again.".to_string()
        }
        other => other.to_string(),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let _log_guard = setup_logging(args.log_level);

    let config = ClientConfig::load().merge(ClientConfig {
        endpoint: args.endpoint.clone(),
        api_token: args.token.clone(),
        timeout_secs: args.timeout,
        user_agent: None,
    });

    if let Command::Configure = args.command {
        let path = config.save().context("Failed to save configuration")?;
        println!("Saved configuration to {}", path.display());
        return Ok(());
    }

    let client = Client::from_config(&config).context("Failed to create Cachet client")?;

    tracing::info!("Using endpoint: {}", client.http().endpoint());

    if let Err(err) = run(&client, args.command).await {
        if let Some(api_err) = err.downcast_ref::<CachetError>() {
            eprintln!("Error: {}", format_error(api_err));
        }
        return Err(err);
    }

    Ok(())
}

async fn run(client: &Client, command: Command) -> Result<()> {
    match command {
        Command::Ping => {
            let up = client.ping().await?;
            println!("{}", if up { "Pong!" } else { "unexpected ping answer" });
        }
        Command::Version => {
            let version = client.version().await?;
            println!("Version   : {}", version.value);
            println!("on_latest : {}", version.on_latest);
            println!("latest    : {}", version.latest);
        }
        Command::List {
            kind,
            page,
            per_page,
        } => list(client, kind, page, per_page).await?,
        Command::Count { kind } => {
            let total = match kind {
                Kind::Components => client.components.count().await?,
                Kind::Groups => client.component_groups.count().await?,
                Kind::Incidents => client.incidents.count().await?,
                Kind::Subscribers => client.subscribers.count().await?,
                Kind::Metrics => client.metrics.count().await?,
            };
            println!("{}", total);
        }
        Command::Smoke => smoke::run(client).await?,
        // Saved in main before a client exists
        Command::Configure => {}
    }
    Ok(())
}

async fn list(client: &Client, kind: Kind, page: u32, per_page: u32) -> Result<()> {
    match kind {
        Kind::Components => {
            print_rows(client.components.list(page, per_page), |c: &Component| {
                format!(
                    "{:>5}  {:<30}  {}",
                    c.id(),
                    c.name().unwrap_or("-"),
                    cachet_client::enums::component_status_name(c.status().unwrap_or_default())
                )
            })
            .await
        }
        Kind::Groups => {
            print_rows(client.component_groups.list(page, per_page), |g: &ComponentGroup| {
                format!("{:>5}  {:<30}  order={}", g.id(), g.name().unwrap_or("-"), g.order())
            })
            .await
        }
        Kind::Incidents => {
            print_rows(client.incidents.list(page, per_page), |i: &Incident| {
                format!(
                    "{:>5}  {:<30}  {}",
                    i.id(),
                    i.name().unwrap_or("-"),
                    i.human_status().unwrap_or("-")
                )
            })
            .await
        }
        Kind::Subscribers => {
            print_rows(client.subscribers.list(page, per_page), |s: &Subscriber| {
                format!("{:>5}  {}", s.id(), s.email().unwrap_or("-"))
            })
            .await
        }
        Kind::Metrics => {
            print_rows(client.metrics.list(page, per_page), |m: &Metric| {
                format!(
                    "{:>5}  {:<30}  {}",
                    m.id(),
                    m.name().unwrap_or("-"),
                    m.suffix().unwrap_or("")
                )
            })
            .await
        }
    }
}

/// Print rows as the stream yields them, one page fetched at a time
async fn print_rows<T, S, F>(rows: S, format: F) -> Result<()>
where
    S: Stream<Item = cachet_client::Result<T>>,
    F: Fn(&T) -> String,
{
    let mut rows = pin!(rows);
    while let Some(row) = rows.try_next().await? {
        println!("{}", format(&row));
    }
    Ok(())
}
