//! CLI command definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Full report with history and attempts
    Full,
    /// Only the final draft (or artifact)
    Draft,
    /// JSON output
    Json,
}

impl From<OutputFormat> for draftloop_domain::OutputFormat {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Full => draftloop_domain::OutputFormat::Full,
            OutputFormat::Draft => draftloop_domain::OutputFormat::Draft,
            OutputFormat::Json => draftloop_domain::OutputFormat::Json,
        }
    }
}

/// CLI arguments for draftloop
#[derive(Parser, Debug)]
#[command(name = "draftloop")]
#[command(author, version, about = "Author/critic drafting loop with a media provider cascade")]
#[command(long_about = r#"
draftloop writes an article with an author model, has a critic model review it,
and revises until the critic accepts or the round limit is reached. Cover images
are generated by trying the configured media providers in priority order, with
retries and fallback.

Configuration files are loaded from (in priority order):
1. DRAFTLOOP_* environment variables (e.g. DRAFTLOOP_CASCADE__RETRIES=2)
2. --config <path>          Explicit config file
3. ./draftloop.toml         Project-level config
4. ~/.config/draftloop/config.toml   Global config

Example:
  draftloop write "The history of lighthouses" --max-rounds 4
  draftloop illustrate "a lighthouse in a storm, woodcut" --size 1024x1024
  draftloop article "Tidal power" --out tidal.md
  draftloop config
"#)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output format (defaults to the config file, then "full")
    #[arg(short, long, value_enum, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long, global = true)]
    pub no_config: bool,

    /// Append session events to this JSONL file
    #[arg(long, value_name = "PATH", global = true)]
    pub session_log: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the author/critic loop and print the final draft
    Write {
        #[command(flatten)]
        draft: DraftArgs,
    },

    /// Generate one image or video through the provider cascade
    Illustrate {
        /// What to generate
        prompt: String,

        /// Capability required from providers
        #[arg(long, default_value = "image")]
        capability: String,

        #[command(flatten)]
        media: MediaArgs,

        /// Things the image should avoid
        #[arg(long, value_name = "TEXT")]
        negative_prompt: Option<String>,
    },

    /// Write a draft, then generate a cover illustration for it
    Article {
        #[command(flatten)]
        draft: DraftArgs,

        #[command(flatten)]
        media: MediaArgs,

        /// Style for the cover illustration
        #[arg(long, value_name = "STYLE")]
        illustration_style: Option<String>,

        /// Skip the illustration step
        #[arg(long)]
        no_illustration: bool,
    },

    /// Show configuration sources and validation issues
    Config,
}

/// Arguments shared by commands that run the collaboration loop
#[derive(Args, Debug, Clone)]
pub struct DraftArgs {
    /// Topic of the article
    pub topic: String,

    /// Maximum author/critic rounds (1-10)
    #[arg(short = 'r', long, value_name = "N")]
    pub max_rounds: Option<usize>,

    /// Target length in characters
    #[arg(short = 'l', long, value_name = "CHARS")]
    pub target_length: Option<usize>,

    /// Writing style hint for the author
    #[arg(long)]
    pub style: Option<String>,

    /// Override the author model
    #[arg(long, value_name = "MODEL")]
    pub author_model: Option<String>,

    /// Override the critic model
    #[arg(long, value_name = "MODEL")]
    pub critic_model: Option<String>,

    /// Write the final draft as Markdown to this file
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,
}

/// Arguments shared by commands that run the provider cascade
#[derive(Args, Debug, Clone, Default)]
pub struct MediaArgs {
    /// Tries per provider before falling back
    #[arg(long, value_name = "N")]
    pub retries: Option<u32>,

    /// Requested size, e.g. 1024x1024
    #[arg(long)]
    pub size: Option<String>,
}
