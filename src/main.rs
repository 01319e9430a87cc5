use std::{env, process};

use anyhow::Context;
use log::info;
use server::configs::ServerConfig;
use trainer::configs::TrainingConfig;

fn usage(program: &str) -> ! {
    eprintln!("Usage: {program} <train <csv-path>|serve>");
    process::exit(1);
}

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("energy");

    match args.get(1).map(String::as_str) {
        Some("train") => {
            let Some(path) = args.get(2) else {
                usage(program);
            };

            let config = TrainingConfig::from_env(path)?;
            let tag = trainer::run(&config).with_context(|| format!("training from {path}"))?;
            info!("done, serve it with MODEL_TAG={tag}");
        }
        Some("serve") => {
            let config = ServerConfig::from_env()?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime
                .block_on(server::serve(config))
                .context("serving the energy model")?;
        }
        _ => usage(program),
    }

    Ok(())
}
