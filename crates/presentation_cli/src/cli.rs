//! Command-line definition

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use domain::DigestRequest;

/// Default server the smoke commands talk to
pub const DEFAULT_SERVER_URL: &str = "http://localhost:8000";

/// Daily digest CLI
#[derive(Debug, Parser)]
#[command(name = "daily-digest-cli")]
#[command(author, version, about = "Daily Digest API CLI", long_about = None)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Show which sources and the language model are configured
    Status {
        /// Server URL
        #[arg(short, long, default_value = DEFAULT_SERVER_URL)]
        url: String,
    },

    /// Request a digest with selected sources
    ///
    /// Example: daily-digest-cli digest --no-email --location "Portland,US"
    Digest {
        #[command(flatten)]
        sources: SourceFlags,

        /// Location for weather and traffic (defaults to the server's)
        #[arg(short, long)]
        location: Option<String>,

        /// Print the full JSON response
        #[arg(long)]
        raw: bool,

        /// Server URL
        #[arg(short, long, default_value = DEFAULT_SERVER_URL)]
        url: String,
    },

    /// Request a digest with every source and the default location
    Quick {
        /// Print the full JSON response
        #[arg(long)]
        raw: bool,

        /// Server URL
        #[arg(short, long, default_value = DEFAULT_SERVER_URL)]
        url: String,
    },

    /// Print the effective configuration as TOML (secrets omitted)
    Config,

    /// Authorize Gmail and Calendar and store the refresh token
    ///
    /// Looks for the OAuth client downloaded from the Google Cloud console
    /// under setup/google_credentials/, opens a loopback listener for the
    /// consent redirect and writes the resulting tokens to disk.
    GoogleAuth {
        /// Project directory holding setup/ and .env
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Append the credentials to an existing .env file
        #[arg(long)]
        append_env: bool,
    },
}

/// Per-source opt-outs; everything is included by default
#[derive(Debug, Clone, Copy, Default, Args)]
pub struct SourceFlags {
    /// Leave out unread email
    #[arg(long)]
    pub no_email: bool,
    /// Leave out news headlines
    #[arg(long)]
    pub no_news: bool,
    /// Leave out calendar events
    #[arg(long)]
    pub no_calendar: bool,
    /// Leave out current weather
    #[arg(long)]
    pub no_weather: bool,
    /// Leave out commute traffic
    #[arg(long)]
    pub no_traffic: bool,
    /// Leave out todos
    #[arg(long)]
    pub no_todos: bool,
}

impl SourceFlags {
    /// Request body for these flags
    #[must_use]
    pub fn to_request(self, location: Option<String>) -> DigestRequest {
        DigestRequest {
            include_email: !self.no_email,
            include_news: !self.no_news,
            include_calendar: !self.no_calendar,
            include_weather: !self.no_weather,
            include_traffic: !self.no_traffic,
            include_todos: !self.no_todos,
            location,
        }
    }
}

/// Log filter for a `-v` count
#[must_use]
pub const fn log_filter_from_verbosity(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
