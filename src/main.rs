use clap::Parser;
use showsearch::app::App;
use showsearch::cli::{Args, Command};
use showsearch::client::{ProxyClient, interactive};
use showsearch::config::Config;
use showsearch::logging::setup_logging;
use std::process::ExitCode;
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            return ExitCode::FAILURE;
        }
    };
    setup_logging(&config, args.tracing);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        command = ?args.command(),
        environment = if cfg!(debug_assertions) {
            "development"
        } else {
            "production"
        },
        "starting showsearch"
    );

    match args.command() {
        Command::Serve => match App::new(config) {
            Ok(app) => app.run().await,
            Err(e) => {
                error!(error = ?e, "failed to initialize application");
                ExitCode::FAILURE
            }
        },
        Command::Search => {
            let result = async {
                let api = ProxyClient::new(&config.api_root_url)?;
                interactive::run(api, config.search_delay).await
            }
            .await;
            match result {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    error!(error = ?e, "search client failed");
                    ExitCode::FAILURE
                }
            }
        }
    }
}
