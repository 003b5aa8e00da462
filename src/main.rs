use anyhow::Result;
use rft_metrics::cli::{self, AggregateArgs, Commands};
use rft_metrics::commands;

fn main() -> Result<()> {
    let cli = cli::parse_args();
    cli::init_logging(cli.verbosity);

    let command = cli
        .command
        .unwrap_or_else(|| Commands::Aggregate(AggregateArgs::default()));

    if let Commands::Init { force } = command {
        return commands::init_config(force);
    }

    let config = cli::load_configuration(cli.config.as_deref())?;
    match command {
        Commands::Aggregate(args) => {
            commands::handle_aggregate(&args.apply(config))?;
        }
        Commands::Status(output) => commands::handle_status(&output.apply(config))?,
        Commands::Show { output, json } => commands::handle_show(&output.apply(config), json)?,
        Commands::Init { .. } => {}
    }
    Ok(())
}
