use clap::Parser;
use std::process;
use tribe_slots::cli::{Cli, Commands};
use tribe_slots::cli_handlers::{self, Output};

fn main() {
    // Logs go to stderr so stdout stays parseable
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli_handlers::store_config(cli.db, cli.install_dir);
    let output = if cli.json { Output::Json } else { Output::Text };

    let result = match cli.command {
        Commands::Init => cli_handlers::handle_init(&config, output),
        Commands::Add { tribe_id } => cli_handlers::handle_add(&config, tribe_id, output),
        Commands::Get { tribe_id } => cli_handlers::handle_get(&config, tribe_id, output),
        Commands::Set { tribe_id, timers } => {
            cli_handlers::handle_set(&config, tribe_id, timers, output)
        }
        Commands::Exists { tribe_id } => cli_handlers::handle_exists(&config, tribe_id, output),
        Commands::Delete { tribe_id } => cli_handlers::handle_delete(&config, tribe_id, output),
        Commands::List => cli_handlers::handle_list(&config, output),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}
