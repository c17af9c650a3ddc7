use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gatenet-sandbox")]
#[command(author = "Gatenet")]
#[command(version = "0.1.0")]
#[command(about = "Offline sandbox for the Gatenet networking API: canned results, simulated latency, no real I/O", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[arg(short = 'o', long, value_enum, default_value = "human", global = true, help = "Output format")]
    pub output_format: OutputFormat,

    #[arg(short = 'f', long, global = true, help = "Output file path")]
    pub output_file: Option<PathBuf>,

    #[arg(long, global = true, help = "Skip simulated latency entirely")]
    pub no_delay: bool,

    #[arg(long, default_value_t = 1.0, global = true, help = "Multiply every simulated delay by this factor")]
    pub latency_scale: f64,

    #[arg(long, global = true, help = "Give up on an operation after this many milliseconds")]
    pub timeout: Option<u64>,

    #[arg(long, global = true, help = "Load mock tables from this JSON file (default: <config dir>/gatenet-sandbox/tables.json if present)")]
    pub tables: Option<PathBuf>,

    #[arg(long, global = true, help = "Disable colored output")]
    pub no_color: bool,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Simulated HTTP requests
    Http {
        #[command(subcommand)]
        request: HttpCommand,
    },
    /// Resolve a domain against the mock DNS table
    Dns { domain: String },
    /// Locate an address in the mock geo table
    Geo { address: String },
    /// Simulated ping
    Ping {
        host: String,
        #[arg(short, long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..), help = "Packets to send")]
        count: u32,
    },
    /// Identify a service from the mock signature table
    Identify {
        port: u16,
        #[arg(default_value = "", allow_hyphen_values = true)]
        banner: String,
    },
    /// Fingerprint a banner with the detector chain
    Fingerprint {
        port: u16,
        #[arg(default_value = "", allow_hyphen_values = true)]
        banner: String,
    },
    /// Run one of the scripted sandbox examples
    Demo {
        #[arg(value_enum)]
        scenario: Scenario,
        #[arg(long, help = "Print the example's reference code instead of running it")]
        show_code: bool,
    },
}

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum HttpCommand {
    Get { url: String },
    Post {
        url: String,
        #[arg(short, long, default_value = "{}", help = "JSON request body")]
        body: String,
    },
}

impl Command {
    /// Operation name used in reports and logs.
    pub fn operation(&self) -> &'static str {
        match self {
            Command::Http { request: HttpCommand::Get { .. } } => "http.get",
            Command::Http { request: HttpCommand::Post { .. } } => "http.post",
            Command::Dns { .. } => "dns.lookup",
            Command::Geo { .. } => "geo.lookup",
            Command::Ping { .. } => "ping.test",
            Command::Identify { .. } => "discovery.identify",
            Command::Fingerprint { .. } => "discovery.fingerprint",
            Command::Demo { .. } => "demo",
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, serde::Serialize, serde::Deserialize, PartialEq, Eq)]
pub enum Scenario {
    #[value(name = "http", help = "GET and POST against httpbin")]
    Http,
    #[value(name = "diagnostics", help = "DNS, geo and ping")]
    Diagnostics,
    #[value(name = "discovery", help = "Service identification")]
    Discovery,
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scenario::Http => write!(f, "http"),
            Scenario::Diagnostics => write!(f, "diagnostics"),
            Scenario::Discovery => write!(f, "discovery"),
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum OutputFormat {
    #[value(name = "human", help = "Human-readable output")]
    Human,
    #[value(name = "json", help = "JSON output")]
    Json,
}
