//! Clap derive structures for the `showroom` CLI.
//!
//! Defines the command tree, global flags, and shared argument groups.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// showroom -- dealership inventory, contacts, and sales from the terminal
#[derive(Debug, Parser)]
#[command(
    name = "showroom",
    version,
    about = "Manage dealership inventory, contacts, and sales from the command line",
    long_about = "A CLI for the Showroom dealership backend.\n\n\
        Filters are applied the same way the web client applies them: each\n\
        change supersedes the previous search, and only the latest result\n\
        is shown.",
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
    /// Backend profile to use
    #[arg(long, short = 'p', env = "SHOWROOM_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Backend URL (overrides profile)
    #[arg(long, short = 's', env = "SHOWROOM_SERVER", global = true)]
    pub server: Option<String>,

    /// Account email (overrides profile)
    #[arg(long, short = 'e', env = "SHOWROOM_EMAIL", global = true)]
    pub email: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "SHOWROOM_OUTPUT",
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

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "SHOWROOM_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "SHOWROOM_TIMEOUT", global = true)]
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
    /// Log in, log out, and inspect the current session
    Auth(AuthArgs),

    /// Browse and filter the vehicle inventory
    #[command(alias = "inv", alias = "i")]
    Inventory(InventoryArgs),

    /// Sales dashboard for a date window
    #[command(alias = "dash", alias = "d")]
    Dashboard(DashboardArgs),

    /// Manage buyer and lead contacts
    #[command(alias = "c")]
    Contacts(ContactsArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  AUTH
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub command: AuthCommand,
}

#[derive(Debug, Subcommand)]
pub enum AuthCommand {
    /// Log in and cache the session
    Login,

    /// Create an account (must be verified before data loads)
    Register {
        /// Display name
        #[arg(long)]
        name: String,

        /// Dealership name
        #[arg(long)]
        dealership: Option<String>,
    },

    /// End the session and forget the cached cookie
    Logout,

    /// Show the cached user
    Whoami,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  INVENTORY
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct InventoryArgs {
    #[command(subcommand)]
    pub command: InventoryCommand,
}

#[derive(Debug, Subcommand)]
pub enum InventoryCommand {
    /// List vehicles matching the given filters
    #[command(alias = "ls")]
    List(FilterArgs),

    /// Show the filter state: facet selections and range bounds
    Facets(FilterArgs),

    /// Show one vehicle with its images
    Show {
        /// Vehicle ID
        id: String,
    },

    /// Add a vehicle from a JSON file
    Add {
        /// Vehicle JSON file
        #[arg(long, short = 'F')]
        from_file: PathBuf,
    },

    /// Replace a vehicle's fields from a JSON file
    Update {
        /// Vehicle ID
        id: String,

        /// Vehicle JSON file
        #[arg(long, short = 'F')]
        from_file: PathBuf,
    },

    /// Delete vehicles
    Delete {
        /// Vehicle IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

/// Filters. Each repeated flag narrows its facet to exactly the values
/// given; omitted facets stay fully selected.
#[derive(Debug, Default, Args)]
pub struct FilterArgs {
    /// Keep only these makes
    #[arg(long, value_delimiter = ',')]
    pub make: Vec<String>,

    /// Keep only these models (must belong to a kept make)
    #[arg(long, value_delimiter = ',')]
    pub model: Vec<String>,

    /// Keep only these statuses (Available, Sold)
    #[arg(long, value_delimiter = ',')]
    pub status: Vec<String>,

    /// Keep only these conditions
    #[arg(long, value_delimiter = ',')]
    pub condition: Vec<String>,

    /// Keep only these body types
    #[arg(long, value_delimiter = ',')]
    pub body_type: Vec<String>,

    /// Keep only these assembly types
    #[arg(long, value_delimiter = ',')]
    pub assembly: Vec<String>,

    /// Keep only these fuel types
    #[arg(long, value_delimiter = ',')]
    pub fuel_type: Vec<String>,

    /// Keep only these transmissions
    #[arg(long, value_delimiter = ',')]
    pub transmission: Vec<String>,

    /// Price range, e.g. 100000000..250000000
    #[arg(long, value_parser = parse_range)]
    pub price: Option<(i64, i64)>,

    /// Model year range, e.g. 2018..2022
    #[arg(long, value_parser = parse_range)]
    pub year: Option<(i64, i64)>,

    /// Odometer range in km, e.g. 0..50000
    #[arg(long, value_parser = parse_range)]
    pub odometer: Option<(i64, i64)>,

    /// Free-text search over make, model, and specification
    #[arg(long)]
    pub search: Option<String>,
}

/// Parse `LOW..HIGH`.
fn parse_range(s: &str) -> Result<(i64, i64), String> {
    let (low, high) = s
        .split_once("..")
        .ok_or_else(|| format!("expected LOW..HIGH, got '{s}'"))?;
    let parse = |v: &str| {
        v.trim()
            .replace('_', "")
            .parse::<i64>()
            .map_err(|e| format!("'{v}': {e}"))
    };
    Ok((parse(low)?, parse(high)?))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  DASHBOARD
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// First day of the window (default: January 1st of this year)
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Last day of the window, inclusive (default: now)
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Compare against the same window this many years back
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub past_range: Option<u32>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONTACTS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ContactsArgs {
    #[command(subcommand)]
    pub command: ContactsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ContactsCommand {
    /// List contacts, optionally searching by name
    #[command(alias = "ls")]
    List {
        /// Search text
        #[arg(long)]
        search: Option<String>,
    },

    /// Add a contact
    Add(ContactFields),

    /// Update a contact; omitted fields keep their value
    Update {
        /// Contact ID
        id: String,

        #[command(flatten)]
        fields: ContactUpdate,
    },

    /// Delete contacts (refused while they are a vehicle's buyer)
    Delete {
        /// Contact IDs
        #[arg(required = true)]
        ids: Vec<String>,
    },
}

#[derive(Debug, Args)]
pub struct ContactFields {
    #[arg(long)]
    pub name: String,

    /// Mobile number, at least 10 digits
    #[arg(long)]
    pub mobile: String,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub instagram: Option<String>,

    #[arg(long)]
    pub facebook: Option<String>,
}

#[derive(Debug, Args)]
pub struct ContactUpdate {
    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub mobile: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub address: Option<String>,

    #[arg(long)]
    pub instagram: Option<String>,

    #[arg(long)]
    pub facebook: Option<String>,
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

    /// Display current configuration
    Show,

    /// Set a value on the active profile
    Set {
        /// Key (server, email, password_env, insecure, timeout, past_range, clamp_ranges, ca_cert)
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
