use std::env;

use clap::Subcommand;
use serde_json::json;

use crate::auth::{generate_jwt, validate_jwt, Claims};
use crate::cli::utils::output_success;
use crate::cli::OutputFormat;
use crate::config::{Environment, SecurityConfig};

#[derive(Subcommand)]
pub enum TokenCommands {
    #[command(about = "Mint a signed session token")]
    Mint {
        #[arg(long, help = "Session subject (user name)")]
        subject: String,
        #[arg(long, help = "Organization the user belongs to")]
        org: Option<String>,
        #[arg(long, help = "Grant super-user access")]
        super_user: bool,
        #[arg(long = "network", help = "Allowed network ID (repeatable)")]
        networks: Vec<String>,
        #[arg(long, help = "Lifetime in hours (defaults to SESSION_TOKEN_HOURS)")]
        hours: Option<u64>,
    },

    #[command(about = "Verify a session token and print its claims")]
    Inspect {
        #[arg(help = "Session token")]
        token: String,
    },
}

pub fn handle(cmd: TokenCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let lookup = |key: &str| env::var(key).ok();
    let security = SecurityConfig::from_lookup(Environment::from_lookup(&lookup), &lookup)?;

    match cmd {
        TokenCommands::Mint { subject, org, super_user, networks, hours } => {
            let claims = Claims::new(
                subject,
                org,
                super_user,
                networks,
                hours.unwrap_or(security.token_hours),
            );
            let token = generate_jwt(&security.jwt_secret, &claims)?;

            match output_format {
                OutputFormat::Text => println!("{}", token),
                OutputFormat::Json => output_success(
                    &output_format,
                    "Session token minted",
                    Some(json!({ "token": token, "claims": claims })),
                )?,
            }
            Ok(())
        }
        TokenCommands::Inspect { token } => {
            let claims = validate_jwt(&security.jwt_secret, &token)?;
            output_success(
                &output_format,
                &format!(
                    "Valid session for {} (super_user={}, networks: {})",
                    claims.sub,
                    claims.is_super_user,
                    claims.network_ids.join(",")
                ),
                Some(json!({ "claims": claims })),
            )
        }
    }
}
