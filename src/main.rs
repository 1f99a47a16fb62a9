use clap::Parser;
use log::{error, info};
use std::process::exit;
use zdashboard::cli::{self, Cli, Command, Session};
use zdashboard::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Analyser les arguments de ligne de commande
    let cli = Cli::parse();

    // Charger la configuration pour déterminer le niveau de log
    let config_path = cli.config.clone().unwrap_or_else(Config::path);
    let load_result = Config::load_from(&config_path);
    let mut config = match &load_result {
        Ok(config) => config.clone(),
        Err(_) => Config::default(),
    };

    // RUST_LOG reste prioritaire sur la configuration
    env_logger::init_from_env(env_logger::Env::default().default_filter_or(&config.log_level));

    if let Err(e) = load_result {
        error!(
            "Erreur lors du chargement de la configuration {}: {}",
            config_path.display(),
            e
        );
    }

    cli.apply_overrides(&mut config);

    match &cli.command {
        Command::Analyze { file, plain, .. } => {
            let success = cli::run_analyze(&config, file.as_deref(), *plain).await?;
            if !success {
                exit(1);
            }
        }
        Command::Sample { output } => {
            cli::run_sample(&config, output).await?;
        }
        Command::Session { .. } => {
            info!("Session interactive avec {}", config.predict_url());
            Session::new(config).run().await?;
        }
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
