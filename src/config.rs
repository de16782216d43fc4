use crate::prober::ProbeTarget;
use anyhow::Result;
use clap::{Parser, ValueEnum};

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Fixed probe list: plain and TLS variants of the same host.
pub const TARGETS: [ProbeTarget<'static>; 2] = [
    ProbeTarget::new("HTTP", "http://www.baidu.com"),
    ProbeTarget::new("HTTPS", "https://www.baidu.com"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

/// How much of the report reaches stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Quiet,
    Normal,
    Verbose,
}

#[derive(Debug, Parser)]
#[command(name = "reachability-probe", version, about = "Test HTTP/HTTPS connectivity to baidu.com")]
pub struct Cli {
    /// Timeout in seconds for each attempt
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Only show summary (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Diagnostic log level, written to stderr
    #[arg(long, value_name = "LEVEL", default_value = "warn", value_parser = parse_log_level)]
    pub log_level: tracing::Level,

    /// Diagnostic log encoding
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,
}

impl Cli {
    /// `--quiet` wins over `--verbose`.
    pub fn output_mode(&self) -> OutputMode {
        if self.quiet {
            OutputMode::Quiet
        } else if self.verbose {
            OutputMode::Verbose
        } else {
            OutputMode::Normal
        }
    }
}

/// Map a level name onto a tracing::Level.
pub fn parse_log_level(s: &str) -> Result<tracing::Level> {
    match s.to_lowercase().as_str() {
        "trace" => Ok(tracing::Level::TRACE),
        "debug" => Ok(tracing::Level::DEBUG),
        "info" => Ok(tracing::Level::INFO),
        "warn" | "warning" => Ok(tracing::Level::WARN),
        "error" => Ok(tracing::Level::ERROR),
        _ => Err(anyhow::anyhow!(
            "Invalid log level: {}. Valid levels are: trace, debug, info, warn, error",
            s
        )),
    }
}
