use clap::{ArgAction, Parser, Subcommand, ValueHint};

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<String>,

    /// Package database to read (overrides the configured path)
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub database: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show package details
    #[command(arg_required_else_help = true)]
    #[clap(name = "info", visible_alias = "show")]
    Info {
        /// Packages to show
        #[arg(required = true)]
        packages: Vec<String>,
    },

    /// List packages in the database
    #[clap(name = "list", visible_alias = "ls")]
    List {
        /// Only list packages of this category
        #[arg(required = false, long)]
        category: Option<String>,
    },

    /// Show the options recorded by the installer
    #[clap(name = "options")]
    Options,

    /// Write the decoded database as JSON
    #[clap(name = "export")]
    Export {
        /// Output file (defaults to stdout)
        #[arg(required = false, short, long, value_hint = ValueHint::FilePath)]
        output: Option<String>,

        /// Pretty-print the JSON document
        #[arg(required = false, long)]
        pretty: bool,
    },

    /// Summarize the database contents
    #[clap(name = "stats")]
    Stats,

    /// Generate default config
    #[clap(name = "defconfig")]
    DefConfig,

    /// Print the effective configuration to stdout
    #[clap(name = "config")]
    Config,
}
