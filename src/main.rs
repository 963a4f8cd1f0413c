use anyhow::Result;
use clap::Parser;
use qadoc::cli::{self, Cli, Commands};
use qadoc::config::Config;
use qadoc::logging::{self, LogTarget};

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let result = run(&cli);

    if let Err(e) = result {
        // Determine exit code based on error type
        let exit_code = if cli::is_user_error(&e) { 1 } else { 2 };
        tracing::error!(error = %format!("{e:#}"), "command failed");
        eprintln!("Error: {e:#}");
        std::process::exit(exit_code);
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Commands::Parse(cmd) => {
            logging::init(LogTarget::Stderr)?;
            cli::handle_parse(cmd)
        }
        Commands::Ask(cmd) => {
            logging::init(LogTarget::Stderr)?;
            let config = cmd.scorer.apply(Config::from_env());
            cli::handle_ask(cmd, &config)
        }
        Commands::Tui(cmd) => {
            let config = Config::from_env();
            // The alternate screen owns stdout and stderr while the UI runs.
            let target = match &config.log_file {
                Some(path) => LogTarget::File(path),
                None => LogTarget::Off,
            };
            logging::init(target)?;
            let config = cmd.scorer.apply(config);
            cli::handle_tui(cmd, &config)
        }
    }
}
