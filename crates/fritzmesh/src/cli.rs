//! Clap derive structures for the `fritzmesh` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// fritzmesh -- inspect the hub/repeater/client tree of a Fritz!Box mesh
#[derive(Debug, Parser)]
#[command(
    name = "fritzmesh",
    version,
    about = "Inspect Fritz!Box mesh topologies from the command line",
    long_about = "Reconstructs the mesh hierarchy (master, chained repeaters, and the\n\
        clients attached to each) from the router's mesh-list snapshot, and\n\
        backfills client addresses and names from its host list.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Source profile to use
    #[arg(long, short = 'p', env = "FRITZMESH_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Read the mesh snapshot from a JSON file (overrides profile)
    #[arg(long, env = "FRITZMESH_MESH_FILE", global = true, conflicts_with = "mesh_url")]
    pub mesh_file: Option<PathBuf>,

    /// Read the host list from a JSON file
    #[arg(long, env = "FRITZMESH_HOSTS_FILE", global = true)]
    pub hosts_file: Option<PathBuf>,

    /// Fetch the mesh snapshot from a URL (overrides profile)
    #[arg(long, env = "FRITZMESH_MESH_URL", global = true)]
    pub mesh_url: Option<String>,

    /// Fetch the host list from a URL
    #[arg(long, env = "FRITZMESH_HOSTS_URL", global = true)]
    pub hosts_url: Option<String>,

    /// Skip host-list enrichment of client names and addresses
    #[arg(long, global = true)]
    pub no_enrich: bool,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "FRITZMESH_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "FRITZMESH_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "FRITZMESH_TIMEOUT", global = true)]
    pub timeout: Option<u64>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Show the mesh as a tree: master, repeaters, and their clients
    #[command(alias = "tree", alias = "t")]
    Topology,

    /// Inspect mesh hubs (master and repeaters)
    #[command(alias = "hub")]
    Hubs(HubsArgs),

    /// Inspect client devices
    #[command(alias = "cl")]
    Clients(ClientsArgs),

    /// Re-fetch and redraw the topology on an interval
    Watch(WatchArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  HUBS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct HubsArgs {
    #[command(subcommand)]
    pub command: HubsCommand,
}

#[derive(Debug, Subcommand)]
pub enum HubsCommand {
    /// List hubs, master first
    #[command(alias = "ls")]
    List,

    /// Show hub details
    Get {
        /// Hub uid, MAC address, or name
        hub: String,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CLIENTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ClientsArgs {
    #[command(subcommand)]
    pub command: ClientsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ClientsCommand {
    /// List clients across all hubs
    #[command(alias = "ls")]
    List(ClientListArgs),

    /// Show client details
    Get {
        /// Client MAC address or uid
        client: String,
    },
}

#[derive(Debug, Args)]
pub struct ClientListArgs {
    /// Only clients attached to this hub (uid, MAC, or name)
    #[arg(long, conflicts_with = "unassigned")]
    pub hub: Option<String>,

    /// Only clients no hub reports a link to
    #[arg(long)]
    pub unassigned: bool,

    /// Only clients with a live link
    #[arg(long)]
    pub connected: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  WATCH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Seconds between refreshes (overrides profile poll_interval)
    #[arg(long, short = 'i')]
    pub interval: Option<u64>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current resolved configuration
    Show,

    /// Print the config file location
    Path,

    /// Set a value on the active profile
    Set {
        /// Profile key (e.g., "mesh_url", "poll_interval")
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Store a password in the system keyring
    SetPassword {
        /// Profile name
        #[arg(long)]
        profile: Option<String>,
    },
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
