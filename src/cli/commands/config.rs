use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::{output_error, output_success};
use crate::cli::{OutputFormat, Reported};
use crate::config::{GateConfig, Lookup};
use crate::state::GateState;

#[derive(Subcommand)]
pub enum ConfigCommands {
    #[command(about = "Load configuration and client credentials exactly as the server would")]
    Check,
}

pub fn handle(cmd: ConfigCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ConfigCommands::Check => check(&|key| std::env::var(key).ok(), &output_format),
    }
}

fn check(lookup: Lookup, output_format: &OutputFormat) -> anyhow::Result<()> {
    let checked = GateConfig::from_lookup(lookup)
        .and_then(|config| GateState::from_config(&config).map(|_| config));

    match checked {
        Ok(config) => output_success(
            output_format,
            &format!(
                "Configuration OK ({:?}, upstream {})",
                config.environment, config.upstream.api_host
            ),
            Some(json!({
                "environment": format!("{:?}", config.environment),
                "listen": format!("{}:{}", config.server.bind, config.server.port),
                "upstream": config.upstream.api_host.as_str(),
                "https_proxy": config.upstream.https_proxy.as_ref().map(|url| url.as_str()),
                "timeout_ms": config.upstream.timeout_ms,
                "fallback_network_ids": config.upstream.fallback_network_ids,
            })),
        ),
        // Text errors are printed once by the binary; JSON callers get the
        // envelope on stdout and only a failing exit status.
        Err(e) => match output_format {
            OutputFormat::Text => Err(e.into()),
            OutputFormat::Json => {
                output_error(output_format, &e.to_string(), Some("CONFIG_ERROR"))?;
                Err(Reported.into())
            }
        },
    }
}
