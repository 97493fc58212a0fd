use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};

pub const REPIPE_BEFORE_HELP: &str = concat!(
    "repipe ",
    env!("CARGO_PKG_VERSION"),
    " – pip installs pinned by a lock file\n\n",
    "  install -r FILE           Install FILE.lock if present, else resolve FILE and write FILE.lock.\n",
    "  install -r FILE PKG ...   Pin PKG into FILE, reinstall, and regenerate FILE.lock.\n",
);

#[derive(Parser, Debug)]
#[command(
    name = "repipe",
    author,
    version,
    propagate_version = false,
    disable_help_subcommand = true,
    before_help = REPIPE_BEFORE_HELP
)]
#[allow(clippy::struct_excessive_bools)]
pub struct RepipeCli {
    #[arg(
        short,
        long,
        help = "Suppress human output (errors still print to stderr)",
        global = true
    )]
    pub quiet: bool,
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        help = "Increase logging (-vv reaches trace)",
        global = true
    )]
    pub verbose: u8,
    #[arg(long, help = "Force trace logging regardless of -v/-q", global = true)]
    pub trace: bool,
    #[arg(
        long,
        help = "Emit {status,message,details} JSON envelopes",
        global = true
    )]
    pub json: bool,
    #[arg(long, help = "Disable colored human output", global = true)]
    pub no_color: bool,
    #[arg(
        long,
        value_name = "PATH",
        help = "Python interpreter that runs pip (defaults to REPIPE_PYTHON, then python3 on PATH)",
        global = true
    )]
    pub python: Option<PathBuf>,
    #[command(subcommand)]
    pub command: CommandGroupCli,
}

#[derive(Subcommand, Debug)]
pub enum CommandGroupCli {
    #[command(
        about = "Install a requirements file through its lock, optionally adding packages.",
        override_usage = "repipe install -r <FILE> [PACKAGE ...]"
    )]
    Install(InstallArgs),
}

#[derive(Args, Debug)]
pub struct InstallArgs {
    #[arg(
        short = 'r',
        long = "requirements",
        value_name = "FILE",
        help = "Requirements file; its lock lives next to it as FILE.lock"
    )]
    pub requirements: PathBuf,
    #[arg(
        value_name = "PACKAGE",
        help = "Packages to add or upgrade, pinned to what pip resolves"
    )]
    pub packages: Vec<String>,
}
