use clap::{Parser, Subcommand};

/// Default per-request timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 5;
pub const DEFAULT_OUTPUT: &str = "text";
pub const DEFAULT_BIND: &str = "127.0.0.1:8090";

#[derive(Parser, Debug, Clone)]
#[command(name = "pageprobe")]
#[command(about = "Analyze a web page: document facts, link classification and dead links", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Timeout in seconds for the page fetch and for each link probe (default: 5)
    #[arg(short, long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout: u64,

    /// Maximum number of concurrent link probes (default: one per link)
    #[arg(short = 'c', long, global = true)]
    pub concurrency: Option<usize>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to configuration file (JSON, TOML, or YAML)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Analyze a single page and print its report
    Analyze {
        /// The page to analyze
        #[arg(value_name = "URL")]
        url: String,

        /// Output format: text or json
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: String,

        /// Save the JSON report to file
        #[arg(short, long)]
        save: Option<String>,
    },

    /// Serve the analysis API (GET /fetch?url=...) over HTTP
    Serve {
        /// Address to listen on
        #[arg(short, long, default_value = DEFAULT_BIND)]
        bind: String,
    },
}
