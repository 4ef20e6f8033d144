pub mod commands;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "pricing")]
#[command(about = "Tiered pricing API - server and administration commands")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Run the HTTP server")]
    Serve,

    #[command(about = "Apply pending database migrations")]
    Migrate,

    #[command(about = "Create a super admin account (super admins cannot self-register)")]
    CreateSuperAdmin {
        #[arg(long, help = "Login email")]
        email: String,
        #[arg(long, env = "SUPER_ADMIN_PASSWORD", help = "Password (or SUPER_ADMIN_PASSWORD)")]
        password: String,
        #[arg(long, help = "Display name")]
        name: String,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// `RUST_LOG` filter, `info` by default
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Serve => commands::serve::handle().await,
        Commands::Migrate => commands::migrate::handle(output_format).await,
        Commands::CreateSuperAdmin { email, password, name } => {
            commands::admin::create_super_admin(&email, &password, &name, output_format).await
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create_super_admin() {
        let cli = Cli::parse_from([
            "pricing",
            "--json",
            "create-super-admin",
            "--email",
            "root@example.com",
            "--password",
            "changeme123",
            "--name",
            "Root",
        ]);
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));
        match cli.command {
            Commands::CreateSuperAdmin { email, name, .. } => {
                assert_eq!(email, "root@example.com");
                assert_eq!(name, "Root");
            }
            _ => panic!("expected create-super-admin"),
        }
    }

    #[test]
    fn parses_serve_and_migrate() {
        assert!(matches!(Cli::parse_from(["pricing", "serve"]).command, Commands::Serve));
        assert!(matches!(Cli::parse_from(["pricing", "migrate"]).command, Commands::Migrate));
    }
}
