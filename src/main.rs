// src/main.rs

use std::process::ExitCode;

use program_starter::engine::RunReport;
use program_starter::{cli, exit_code, logging, run};

#[tokio::main]
async fn main() -> ExitCode {
    let outcome = run_main().await;

    match &outcome {
        Err(err) => eprintln!("program-starter error: {err:?}"),
        Ok(Some(report)) => {
            for (program, program_outcome) in &report.entries {
                if program_outcome.is_failure() {
                    eprintln!("{} {program}: {program_outcome}", report.lifecycle);
                }
            }
        }
        Ok(None) => {}
    }

    ExitCode::from(exit_code(&outcome))
}

async fn run_main() -> anyhow::Result<Option<RunReport>> {
    let args = cli::parse();
    logging::init_logging(args.log_level, args.log_file.as_deref())?;
    run(args).await
}
