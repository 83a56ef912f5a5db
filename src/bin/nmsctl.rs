use clap::Parser;
use nms_api_gate::cli::{Cli, Reported};

fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = nms_api_gate::cli::run(cli) {
        if e.downcast_ref::<Reported>().is_some() {
            std::process::exit(1);
        }
        match std::env::var("CLI_VERBOSE").as_deref() {
            Ok("true") | Ok("1") => eprintln!("Error: {e:?}"),
            _ => eprintln!("Error: {e}"),
        }
        std::process::exit(1);
    }

    Ok(())
}
