use clap::Parser;
use log::{error, info};
use shopkeep::configuration::config::Config;
use shopkeep::configuration::types::BackendKind;
use shopkeep::controller::controller_handler::Controller;
use std::path::Path;

#[derive(Parser)]
#[command(name = "shopkeep")]
#[command(version = "0.1.0")]
#[command(about = "A single-user inventory administration panel")]
struct Args {
    /// Path to a TOML configuration file; defaults apply when omitted
    #[arg(env = "SHOPKEEP_CONFIG")]
    config_file: Option<String>,

    /// Storage backend override: memory, file or database
    #[arg(long)]
    backend: Option<String>,
}

#[tokio::main]
async fn main() {
    // Example how to log
    // https://docs.rs/env_logger/latest/env_logger/
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_target(false)
        .init();

    println!(
        "
███████╗██╗  ██╗ ██████╗ ██████╗ ██╗  ██╗███████╗███████╗██████╗
██╔════╝██║  ██║██╔═══██╗██╔══██╗██║ ██╔╝██╔════╝██╔════╝██╔══██╗
███████╗███████║██║   ██║██████╔╝█████╔╝ █████╗  █████╗  ██████╔╝
╚════██║██╔══██║██║   ██║██╔═══╝ ██╔═██╗ ██╔══╝  ██╔══╝  ██╔═══╝
███████║██║  ██║╚██████╔╝██║     ██║  ██╗███████╗███████╗██║
╚══════╝╚═╝  ╚═╝ ╚═════╝ ╚═╝     ╚═╝  ╚═╝╚══════╝╚══════╝╚═╝
=================================================================
       A single-user inventory administration panel v0.1.0
=================================================================
"
    );

    info!("Importing configuration");

    // Get command-line arguments
    let args = Args::parse();

    let mut config = match args.config_file {
        Some(path) => match Config::from_file(Path::new(path.as_str())) {
            Ok(config) => config,
            Err(e) => {
                error!("Unable to import configuration from file: {:?}", e);
                std::process::exit(1);
            }
        },
        None => Config::default(),
    };

    if let Some(backend) = args.backend {
        match backend.parse::<BackendKind>() {
            Ok(kind) => config.storage.backend = kind,
            Err(e) => {
                error!("Unable to apply backend override: {:?}", e);
                std::process::exit(1);
            }
        }
    }

    info!("Configuration imported successfully");

    let mut controller = Controller::new(config)
        .map_err(|e| {
            error!(
                "Unable to create a controller instance: {:?}, exiting...",
                e
            );
            std::process::exit(1);
        })
        .unwrap();

    let result = tokio::spawn(async move {
        info!("Spawning the controller");
        controller
            .run()
            .await
            .map_err(|e| {
                error!(
                    "Error occured in the controller process: {:?}, exiting...",
                    e
                )
            })
            .unwrap();
    });

    let _ = result.await.map_err(|e| {
        error!("Error joining at the end of execution: {:?}", e);
        std::process::exit(1);
    });
}
