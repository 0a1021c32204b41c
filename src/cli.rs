use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(
    name = "license-display",
    about = "Render BOM license trees into license expressions and check policy",
    version
)]
pub struct Cli {
    /// BOM report JSON; `-` reads from stdin
    #[arg(default_value = "-")]
    pub input: PathBuf,

    /// Policy config file [default: ./.license-display/config.toml, fallback ~/.config/license-display/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// Show all components (not just warnings/errors)
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,

    /// Log verbosity on stderr (-d info, -dd debug, -ddd trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub debug: u8,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
}

impl Cli {
    pub fn reads_stdin(&self) -> bool {
        self.input.as_os_str() == "-"
    }
}
