use crate::core::form::RecordForm;
use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for rsheetcrud
/// CLI application to manage records stored in a Google Sheet
#[derive(Parser)]
#[command(
    name = "rsheetcrud",
    version = env!("CARGO_PKG_VERSION"),
    about = "Create, list, edit and delete business records stored in a Google Sheet",
    long_about = None
)]
pub struct Cli {
    /// Override the state database path (useful for tests or multiple profiles)
    #[arg(global = true, long = "state")]
    pub state: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Editable record fields. The serial number is assigned on create and never edited.
#[derive(Args, Debug, Clone, Default)]
pub struct RecordArgs {
    #[arg(long, help = "Company name")]
    pub company: Option<String>,

    #[arg(long, help = "L1")]
    pub l1: Option<String>,

    #[arg(long, help = "L2")]
    pub l2: Option<String>,

    #[arg(long, help = "L3")]
    pub l3: Option<String>,

    #[arg(long, help = "MR")]
    pub mr: Option<String>,

    #[arg(long, help = "Location")]
    pub location: Option<String>,

    #[arg(long, help = "Work mode: R=Remote, H=Hybrid, O=On-site")]
    pub mode: Option<String>,

    #[arg(long, help = "Additional details")]
    pub details: Option<String>,
}

impl From<&RecordArgs> for RecordForm {
    fn from(args: &RecordArgs) -> Self {
        RecordForm {
            company: args.company.clone(),
            l1: args.l1.clone(),
            l2: args.l2.clone(),
            l3: args.l3.clone(),
            mr: args.mr.clone(),
            location: args.location.clone(),
            mode: args.mode.clone(),
            details: args.details.clone(),
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the configuration file and the state database
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration")]
        print_config: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Authorize access to the sheet (opens the Google consent page once)
    Login,

    /// Forget the stored authorization
    Logout,

    /// Show authorization state and target sheet
    Status,

    /// List all records
    List {
        #[arg(long, help = "Print records as JSON")]
        json: bool,
    },

    /// Show one record by its row number
    Show {
        /// Row number in the sheet (data starts at row 2)
        row: u32,

        #[arg(long, help = "Print the record as JSON")]
        json: bool,
    },

    /// Create a new record
    Add {
        #[command(flatten)]
        fields: RecordArgs,
    },

    /// Update the record at a row
    Edit {
        /// Row number in the sheet (data starts at row 2)
        row: u32,

        #[command(flatten)]
        fields: RecordArgs,
    },

    /// Delete (clear) the record at a row
    Del {
        /// Row number in the sheet (data starts at row 2)
        row: u32,

        #[arg(long, short = 'y', help = "Do not ask for confirmation")]
        yes: bool,
    },

    /// Write the column titles into the first row of the sheet
    InitSheet,

    /// Print or manage the internal log table
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },
}
