//! CLI argument definitions for lookup-enrich.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// Enrich JSON/JSONL data by looking up values from an external data source or DNS.
///
/// ## Mapping rule (-m)
///
///   "<input_field> as <lookup_field> OUTPUT <source> as <target>, <source>, ..."
///
/// Without an OUTPUT clause every column of the matched row is copied.
///
/// ## Examples
///
/// Lookup 'user' in the table's 'username' column, copy two columns:
///   cat input.jsonl | lookup-enrich -c lookup_config.json -m "user as username OUTPUT department as dept, role"
///
/// Reverse-resolve the 'client_ip' field:
///   echo '{"client_ip":"8.8.8.8"}' | lookup-enrich --dns -m "client_ip as ip OUTPUT hostname"
///
/// Generate a config template:
///   lookup-enrich generate-config -f users.csv > lookup_config.json
#[derive(Parser, Debug)]
#[command(name = "lookup-enrich")]
#[command(version, about, long_about = None, args_conflicts_with_subcommands = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Mapping rule (e.g. 'field_in as field_lookup OUTPUT out1 as new1')
    #[arg(short = 'm', long)]
    pub mapping: Option<String>,

    /// Path to the lookup configuration JSON file (required unless --dns)
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Enable DNS lookup mode
    #[arg(long)]
    pub dns: bool,

    /// DNS server address (e.g. '8.8.8.8' or '8.8.8.8:53'); system resolver if not set
    #[arg(long)]
    pub dns_server: Option<String>,

    /// Log level
    #[arg(long, value_enum, default_value = "warn")]
    pub log_level: LogLevel,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a config template for a data source file (CSV or JSON)
    GenerateConfig {
        /// Path to the data source file
        #[arg(short = 'f', long)]
        file: PathBuf,
    },
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}
