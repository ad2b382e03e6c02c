use clap::{Parser, Subcommand, ValueEnum};
use clap_complete::Shell;

use crate::book::Lang;

#[derive(Debug, Parser)]
#[command(
    name = "ethica-explorer",
    version,
    about = "Explore the logical structure of the Ethics",
    long_about = "Load a book of numbered entries (definitions, axioms, propositions, ...) and \
                  explore the dependency graph of its proofs: the ancestry of an entry, its \
                  descendancy, or the connection between any two entries. The book is a JSON \
                  document; construction rejects unknown citations and cycles."
)]
pub struct Cli {
    /// Suppress non-essential output
    #[arg(short, long, global = true, default_value_t = false)]
    pub quiet: bool,
    /// Increase output detail (repeatable)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => f.write_str("text"),
            OutputFormat::Json => f.write_str("json"),
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate shell completions
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
    /// List the entries of the book in canonical reading order
    Toc {
        /// Path to the book JSON document
        #[arg(short, long, default_value = "ethica.json", env = "ETHICA_BOOK")]
        book: String,
        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<String>,
        /// Language for entry text
        #[arg(long, value_enum, default_value_t = Lang::En)]
        lang: Lang,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
        /// Skip the first N entries
        #[arg(long, default_value_t = 0)]
        offset: usize,
        /// Show at most N entries
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Show one entry: its text, citations, and reader navigation
    Show {
        /// Entry id, e.g. e1p8
        id: String,
        /// Path to the book JSON document
        #[arg(short, long, default_value = "ethica.json", env = "ETHICA_BOOK")]
        book: String,
        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<String>,
        /// Language for entry text
        #[arg(long, value_enum, default_value_t = Lang::En)]
        lang: Lang,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Run dependency-graph queries
    Query {
        #[command(subcommand)]
        query: QueryCommands,
    },
}

#[derive(Debug, Subcommand)]
pub enum QueryCommands {
    /// The complete chain of proofs for an entry
    Ancestry {
        /// Entry id, e.g. e1p8
        node: String,
        /// Path to the book JSON document
        #[arg(short, long, default_value = "ethica.json", env = "ETHICA_BOOK")]
        book: String,
        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// The complete chain of consequences for an entry
    Descendancy {
        /// Entry id, e.g. e1p8
        node: String,
        /// Path to the book JSON document
        #[arg(short, long, default_value = "ethica.json", env = "ETHICA_BOOK")]
        book: String,
        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// The chain of arguments connecting two entries, in either direction
    Connection {
        /// First entry id
        from: String,
        /// Second entry id
        to: String,
        /// Path to the book JSON document
        #[arg(short, long, default_value = "ethica.json", env = "ETHICA_BOOK")]
        book: String,
        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// The direct citations of an entry, in authored order
    Parents {
        /// Entry id, e.g. e1p8
        node: String,
        /// Path to the book JSON document
        #[arg(short, long, default_value = "ethica.json", env = "ETHICA_BOOK")]
        book: String,
        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
    /// Ancestry and descendancy of an entry in one shot
    Report {
        /// Entry id, e.g. e1p8
        node: String,
        /// Path to the book JSON document
        #[arg(short, long, default_value = "ethica.json", env = "ETHICA_BOOK")]
        book: String,
        /// Path to a TOML configuration file
        #[arg(long)]
        config: Option<String>,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
