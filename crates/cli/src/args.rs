use clap::{Args, Parser, Subcommand};
use common::api::SiteStatus;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "fleetgate", version, about = "Operate a fleet of managed sites")]
pub struct Cli {
    #[command(flatten)]
    pub globals: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Clone, Args)]
pub struct GlobalArgs {
    /// Base URL of the controller API.
    #[arg(
        long,
        global = true,
        env = "FLEETGATE_CLI_CONTROLLER_URL",
        default_value = "http://127.0.0.1:8080"
    )]
    pub controller_url: String,

    /// Operator bearer token.
    #[arg(long, global = true, env = "FLEETGATE_CLI_OPERATOR_TOKEN")]
    pub operator_token: Option<String>,

    /// Print raw JSON instead of tables.
    #[arg(long, global = true, default_value_t = false)]
    pub json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Manage registered client sites.
    Sites {
        #[command(subcommand)]
        command: SitesCommand,
    },
    /// Toggle the operating mode of a site.
    Status {
        #[command(subcommand)]
        command: StatusCommand,
    },
}

#[derive(Debug, Subcommand)]
pub enum SitesCommand {
    /// List registered sites.
    List {
        /// Page size (1-100).
        #[arg(long, default_value_t = 50)]
        limit: u32,
        /// Pagination offset.
        #[arg(long, default_value_t = 0)]
        offset: u32,
    },
    /// Register a site; prints the one-time secret.
    Add {
        /// Display name.
        #[arg(long)]
        name: String,
        /// Base URL of the site.
        #[arg(long)]
        url: String,
    },
    /// Show one site.
    Show {
        /// Site identifier.
        id: Uuid,
    },
    /// Deregister a site.
    Remove {
        /// Site identifier.
        id: Uuid,
    },
}

#[derive(Debug, Subcommand)]
pub enum StatusCommand {
    /// Push a status change to a site and wait for its acknowledgment.
    Set {
        /// Site identifier.
        id: Uuid,
        /// Target status.
        #[arg(value_parser = parse_status)]
        status: SiteStatus,
    },
}

fn parse_status(raw: &str) -> Result<SiteStatus, String> {
    SiteStatus::parse(raw).ok_or_else(|| format!("expected 'active' or 'maintenance', got '{raw}'"))
}
