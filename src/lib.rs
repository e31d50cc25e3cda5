pub mod cli;
pub mod client;
pub mod config;
pub mod console;
pub mod controller;
pub mod error;
pub mod models;
pub mod session;

use cli::Args;
use config::ChatConfig;
use controller::{ ChatController, SubmitOutcome };
use log::info;
use std::error::Error;

pub async fn run(args: Args) -> Result<(), Box<dyn Error + Send + Sync>> {
    let config = ChatConfig::from_args(&args)?;

    info!("--- Core Configuration ---");
    info!("Answer URL: {}", config.answer_url);
    info!("Request Timeout: {:?}", config.request_timeout);
    info!("Submit Policy: {:?}", config.submit_policy);
    info!("-------------------------");

    let client = client::new_client(&config)?;
    let controller = ChatController::new(client, &config);

    match args.ask {
        Some(question) => {
            let (outcome, lines) = console::run_once(&controller, &question).await;
            for line in lines {
                println!("{}", line);
            }
            one_shot_result(outcome)
        }
        None => console::run_console(controller).await,
    }
}

fn one_shot_result(outcome: SubmitOutcome) -> Result<(), Box<dyn Error + Send + Sync>> {
    match outcome {
        SubmitOutcome::Delivered => Ok(()),
        SubmitOutcome::Ignored => Err("question must not be empty".into()),
        outcome => Err(format!("question was not answered ({:?})", outcome).into()),
    }
}
