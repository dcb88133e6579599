use clap::Parser;
use funnel::cli::{self, Cli};
use funnel_core::PipelineError;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    cli::init_logging(cli.verbose);

    match cli::run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            // Validation errors are the user's input; anything else is setup.
            let validation = e
                .downcast_ref::<PipelineError>()
                .is_some_and(PipelineError::is_validation);
            if validation {
                ExitCode::from(1)
            } else {
                ExitCode::from(2)
            }
        }
    }
}
