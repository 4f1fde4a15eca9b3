use anyhow::Result;

use recipe_ratings::cli::Command;
use recipe_ratings::{handle_best, handle_init, handle_rating, handle_serve, interpret};

fn main() {
    setup_logging();
    parse_and_execute().unwrap_or_else(|e| {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    });
}

fn setup_logging() {
    sensible_env_logger::init!();
}

fn parse_and_execute() -> Result<()> {
    let command = interpret();
    execute_command(&command)
}

fn execute_command(command: &Command) -> Result<()> {
    match command {
        Command::Serve { port } => handle_serve(*port),
        Command::Init { reset } => handle_init(*reset),
        Command::Best { limit } => handle_best(*limit),
        Command::Rating { recipe_id } => handle_rating(recipe_id),
    }
}
