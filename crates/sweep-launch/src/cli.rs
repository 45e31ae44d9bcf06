use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "sweep")]
#[command(version)]
#[command(about = "Run every parameter combination of a simulation template on a bounded pool of slots")]
pub struct Args {
    /// Run configuration file (TOML)
    pub config: PathBuf,

    /// Spawn the jobs, overriding `execute` in the file
    #[arg(long, conflicts_with = "dry_run")]
    pub execute: bool,

    /// Only build the jobs and write the command log
    #[arg(long)]
    pub dry_run: bool,

    /// Where to write the command log
    #[arg(long, value_name = "PATH")]
    pub export: Option<PathBuf>,

    /// Log filter directive, e.g. `debug` or `sweep.core=debug,info`
    #[arg(long)]
    pub log_level: Option<String>,

    /// Log output format: text, json or journald
    #[arg(long)]
    pub log_format: Option<String>,

    /// Never wait for Enter before exiting
    #[arg(long)]
    pub no_pause: bool,
}
