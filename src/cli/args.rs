use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "gongmd",
    version = env!("GONGMD_VERSION"),
    about = "Query Gong calls, transcripts and users as compact markdown"
)]
pub struct Cli {
    /// Output the normalized payload as JSON instead of markdown
    #[arg(long, global = true)]
    pub json: bool,

    /// Display timestamps in UTC instead of local time
    #[arg(long, global = true)]
    pub utc: bool,

    /// Read credentials from a specific config file instead of the default
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Override the Gong API base URL
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Enable verbose output for debugging API calls and errors
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Date range, workspace and paging flags shared by `calls` and `search`.
#[derive(Args, Debug, Clone, Default)]
pub struct DateArgs {
    /// Calls started at or after [e.g., 2024-01-15, 2024-01-15T10:30:00Z, or duration: 3d, 2w, 1m]
    #[arg(long)]
    pub from: Option<String>,

    /// Calls started before [e.g., 2024-01-15, 2024-01-15T10:30:00Z, or duration: 3d, 2w, 1m]
    #[arg(long)]
    pub to: Option<String>,

    /// Relative date filter, overrides --from/--to [today, yesterday, this-week, last-week, this-month, last-month]
    #[arg(long)]
    pub date: Option<String>,

    /// Limit to a workspace (numeric ID)
    #[arg(long)]
    pub workspace: Option<String>,

    /// Continue from a previous page
    #[arg(long)]
    pub cursor: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List calls in a date range
    #[command(visible_alias = "ls")]
    Calls {
        #[command(flatten)]
        dates: DateArgs,
    },

    /// Search calls by date, host or call ID
    #[command(visible_alias = "s")]
    Search {
        #[command(flatten)]
        dates: DateArgs,

        /// Primary user ID (repeatable)
        #[arg(long = "user")]
        users: Vec<String>,

        /// Call ID (repeatable)
        #[arg(long = "call")]
        calls: Vec<String>,

        /// Raw filter object; flags take precedence over its keys
        #[arg(long)]
        filter: Option<String>,
    },

    /// Show call summaries
    Call {
        /// Call IDs, fetched in one request
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Show call transcripts with speaker names
    Transcript {
        /// Call IDs, fetched in one request
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// List users
    Users {
        /// Continue from a previous page
        #[arg(long)]
        cursor: Option<String>,

        /// Ask Gong to include avatar URLs
        #[arg(long)]
        include_avatars: bool,
    },

    /// Render a saved API response without calling Gong
    Render {
        /// Which response the input holds
        #[arg(value_enum)]
        kind: RenderKind,

        /// Read the payload from a file instead of stdin
        #[arg(long)]
        input: Option<PathBuf>,

        /// Call details payload used to name transcript speakers
        #[arg(long)]
        parties: Option<PathBuf>,
    },

    /// Validate a search filter and print its canonical form
    Validate {
        /// Filter object as JSON (omitted means {})
        #[arg(long)]
        filter: Option<String>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq)]
pub enum RenderKind {
    /// `GET /calls` response
    Calls,
    /// `POST /calls/extensive` response, as a table
    Search,
    /// `POST /calls/extensive` response, as call summaries
    Call,
    /// `POST /calls/transcript` response
    Transcript,
    /// `GET /users` response
    Users,
}
