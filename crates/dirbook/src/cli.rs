//! Clap derive structures for the `dirbook` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// dirbook -- directory-backed contact and group visibility engine
#[derive(Debug, Parser)]
#[command(
    name = "dirbook",
    version,
    about = "Browse and curate an LDAP directory's contact book from the command line",
    long_about = "Queries an LDAP-style directory for user and group entries, derives\n\
        group membership, toggles per-entry visibility through a schema marker\n\
        class, and reports field-completeness statistics.",
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
    /// Directory profile to use
    #[arg(long, short = 'p', env = "DIRBOOK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// Mail address bound to this session (own-contact operations)
    #[arg(long, short = 'm', env = "DIRBOOK_MAIL", global = true)]
    pub mail: Option<String>,

    /// User id for per-user preferences (defaults to $USER)
    #[arg(long, env = "DIRBOOK_USER", global = true)]
    pub user: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "DIRBOOK_OUTPUT",
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
    #[arg(long, short = 'k', env = "DIRBOOK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds
    #[arg(long, env = "DIRBOOK_TIMEOUT", global = true)]
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
    /// Browse contacts and maintain your own entry
    #[command(alias = "c")]
    Contacts(ContactsArgs),

    /// Browse directory groups
    #[command(alias = "g")]
    Groups(GroupsArgs),

    /// Hide entries from listings or bring them back
    #[command(alias = "vis")]
    Visibility(VisibilityArgs),

    /// Field-completeness statistics over the visible contacts
    Stats(StatsArgs),

    /// Manage configuration profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Contacts ─────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ContactsArgs {
    #[command(subcommand)]
    pub command: ContactsCommand,
}

#[derive(Debug, Subcommand)]
pub enum ContactsCommand {
    /// List contacts with their group membership
    List(ContactsListArgs),

    /// Show your own contact record
    Me,

    /// Update fields on your own contact record
    Update(ContactsUpdateArgs),
}

#[derive(Debug, Args)]
pub struct ContactsListArgs {
    /// List hidden contacts instead of visible ones
    #[arg(long)]
    pub hidden: bool,
}

/// Field flags for self-service updates. A flag given with an empty value
/// clears that field.
#[derive(Debug, Args)]
pub struct ContactsUpdateArgs {
    #[arg(long)]
    pub givenname: Option<String>,

    #[arg(long, alias = "sn")]
    pub surname: Option<String>,

    #[arg(long)]
    pub street: Option<String>,

    #[arg(long)]
    pub postal_address: Option<String>,

    #[arg(long)]
    pub postal_code: Option<String>,

    /// Locality / city (directory attribute `l`)
    #[arg(long)]
    pub locality: Option<String>,

    #[arg(long)]
    pub home_phone: Option<String>,

    #[arg(long)]
    pub mobile: Option<String>,

    #[arg(long)]
    pub description: Option<String>,
}

// ── Groups ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GroupsArgs {
    #[command(subcommand)]
    pub command: GroupsCommand,
}

#[derive(Debug, Subcommand)]
pub enum GroupsCommand {
    /// List groups
    List(GroupsListArgs),
}

#[derive(Debug, Args)]
pub struct GroupsListArgs {
    /// List hidden groups instead of visible ones
    #[arg(long)]
    pub hidden: bool,
}

// ── Visibility ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct VisibilityArgs {
    #[command(subcommand)]
    pub command: VisibilityCommand,
}

#[derive(Debug, Subcommand)]
pub enum VisibilityCommand {
    /// Hide a user from listings
    HideUser { identity: String },

    /// Make a hidden user visible again
    ShowUser { identity: String },

    /// Hide a group from listings
    HideGroup { gid: String },

    /// Make a hidden group visible again
    ShowGroup { gid: String },
}

// ── Statistics ───────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct StatsArgs {
    #[command(subcommand)]
    pub command: StatsCommand,
}

#[derive(Debug, Subcommand)]
pub enum StatsCommand {
    /// Compute one statistic by name (e.g. entries_filled_percent)
    Get { name: String },

    /// Compute all ten statistics
    All,
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the config file path
    Path,

    /// List configured profiles
    Profiles,

    /// Store a profile's bind password in the system keyring
    SetPassword {
        /// Profile name (defaults to the active profile)
        #[arg(long)]
        profile: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
