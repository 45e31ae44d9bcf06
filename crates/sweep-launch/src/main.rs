mod cli;
mod load;
mod report;

use std::{io::BufRead, process::ExitCode, sync::Arc};

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use tracing::{info, warn};

use sweep_core::{CancellationHandler, CommandExporter, Scheduler, prepare};
use sweep_exec::ProcRunner;
use sweep_model::{RunConfig, RunSpec, RunSummary};
use sweep_observe::{LoggerConfig, logger_init};

const EXIT_FAILURE: u8 = 1;
const EXIT_INTERRUPTED: u8 = 130;

enum Outcome {
    Prepared,
    Finished(RunSummary),
    Interrupted(RunSummary),
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = cli::Args::parse();

    let mut cfg = match load::load_config(&args.config) {
        Ok(cfg) => cfg,
        Err(e) => return fail(&e, false),
    };
    load::apply_overrides(&mut cfg, &args);
    let pause_requested = cfg.pause_on_finish;

    if let Err(e) = init_logger(&cfg) {
        return fail(&e, pause_requested);
    }

    let spec = match RunSpec::from_config(cfg) {
        Ok(spec) => spec,
        Err(e) => return fail(&anyhow::Error::new(e), pause_requested),
    };

    let code = match run(&spec).await {
        Ok(Outcome::Prepared) => ExitCode::SUCCESS,
        Ok(Outcome::Finished(summary)) => {
            print!("{}", report::render(&summary));
            ExitCode::SUCCESS
        }
        Ok(Outcome::Interrupted(summary)) => {
            print!("{}", report::render(&summary));
            let ids = report::terminated(&summary);
            eprintln!(
                "{} batch interrupted; terminated jobs: {}",
                "warning:".yellow().bold(),
                if ids.is_empty() {
                    "none".to_string()
                } else {
                    ids.iter().map(|i| format!("#{i}")).collect::<Vec<_>>().join(", ")
                }
            );
            ExitCode::from(EXIT_INTERRUPTED)
        }
        Err(e) => return fail(&e, spec.pause_on_finish()),
    };

    if spec.pause_on_finish() {
        pause();
    }
    code
}

fn init_logger(cfg: &RunConfig) -> anyhow::Result<()> {
    let logger = LoggerConfig::from_labels(&cfg.log.level, &cfg.log.format)
        .context("invalid [log] settings")?;
    logger_init(&logger).context("cannot initialize logging")
}

async fn run(spec: &RunSpec) -> anyhow::Result<Outcome> {
    let jobs = prepare(spec)?;

    let exported = CommandExporter::new(spec).write(&jobs)?;
    info!(
        target: "sweep.launch",
        path = %exported.display(),
        jobs = jobs.len(),
        "command log written"
    );

    if !spec.execute() {
        println!(
            "{} {} jobs prepared; command log at {}",
            "dry run:".cyan().bold(),
            jobs.len(),
            exported.display()
        );
        return Ok(Outcome::Prepared);
    }

    let handler = CancellationHandler::new();
    let watcher = handler.install();

    let runner = Arc::new(ProcRunner::new());
    let mut scheduler = Scheduler::new(spec, jobs, runner, handler.token());
    let summary = scheduler.run().await;
    watcher.abort();
    let summary = summary?;

    if let Some(path) = spec.summary_path()
        && let Err(e) = report::write_summary(&summary, path)
    {
        warn!(target: "sweep.launch", error = %format!("{e:#}"), "run summary not written");
    }

    if summary.interrupted {
        Ok(Outcome::Interrupted(summary))
    } else {
        Ok(Outcome::Finished(summary))
    }
}

fn fail(err: &anyhow::Error, pause_requested: bool) -> ExitCode {
    eprintln!("{} {err:#}", "error:".red().bold());
    if pause_requested {
        pause();
    }
    ExitCode::from(EXIT_FAILURE)
}

/// Wait for Enter, but only on an interactive terminal.
fn pause() {
    if !atty::is(atty::Stream::Stdin) {
        return;
    }
    println!("Press Enter to exit...");
    let mut line = String::new();
    let _ = std::io::stdin().lock().read_line(&mut line);
}
