use std::io::BufRead;
use std::sync::Arc;

use anyhow::anyhow;
use clap::{Parser, Subcommand};
use warden_auth::hash_password;
use warden_server::config::loader::load_config;
use warden_server::users::{log_users, user_store};

#[derive(Parser)]
#[command(name = "warden", version, about = "Warden API server")]
struct Cli {
    /// Path to the TOML configuration file (default: warden.toml if present)
    #[arg(short, long, env = "WARDEN_CONFIG")]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the API (default)
    Serve,
    /// Log every stored user through the redacting logger
    LogUsers,
    /// Print an Argon2id hash for a password, for use in the user file
    HashPassword {
        /// The password; read from stdin when omitted
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (before anything else)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist - it's optional
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: Failed to load .env file: {e}");
        }
    }

    let cli = Cli::parse();

    let cfg = load_config(cli.config.as_deref()).map_err(|e| anyhow!("Configuration error: {e}"))?;
    warden_server::init_tracing(&cfg.logging)?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let users = Arc::new(user_store(&cfg.users)?);
            #[cfg(unix)]
            tokio::spawn(reload_on_hangup(cli.config.clone()));
            warden_server::run(&cfg, users).await?;
        }
        Command::LogUsers => {
            let store = user_store(&cfg.users)?;
            let count = log_users(&store, cfg.logging.separator);
            tracing::info!(count, "Users logged");
        }
        Command::HashPassword { password } => {
            let password = match password {
                Some(p) => p,
                None => read_password_line()?,
            };
            let hash = hash_password(&password)?;
            println!("{}", hash.as_str());
        }
    }

    Ok(())
}

/// Re-read configuration on SIGHUP and apply its log level.
#[cfg(unix)]
async fn reload_on_hangup(config_path: Option<String>) {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to install SIGHUP handler; log level reload disabled");
            return;
        }
    };
    while hangup.recv().await.is_some() {
        let applied = load_config(config_path.as_deref())
            .and_then(|cfg| warden_server::apply_logging_level(&cfg.logging.level));
        if let Err(e) = applied {
            tracing::warn!(error = %e, "Configuration reload failed");
        }
    }
}

fn read_password_line() -> anyhow::Result<String> {
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    let password = line.trim_end_matches(['\r', '\n']).to_string();
    if password.is_empty() {
        return Err(anyhow!("no password given on stdin"));
    }
    Ok(password)
}
