use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Schema-driven ITSM service catalog manager")]
pub struct Cli {
    /// Path to the catalog data file
    #[clap(long)]
    pub file: Option<PathBuf>,

    #[clap(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum SettingsCommand {
    /// Show all option lists
    Show,

    /// Add a value to an option list
    Add {
        /// List key (criticalities, statuses, ci_types, ci_statuses, request_types, assignment_groups, contacts)
        key: String,

        /// Value to append
        value: String,
    },

    /// Remove a value from an option list
    Remove {
        /// List key
        key: String,

        /// Value to remove
        value: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List records in a collection
    List {
        /// Collection name (services, components, requests, technical)
        collection: String,

        /// Only show records whose content contains this text
        #[clap(long)]
        filter: Option<String>,
    },

    /// Show details for a record
    Show {
        /// Collection name
        collection: String,

        /// The id of the record to show
        id: String,
    },

    /// Create a record through the schema-driven form
    Add {
        /// Collection name
        collection: String,
    },

    /// Edit an existing record through the schema-driven form
    Edit {
        /// Collection name
        collection: String,

        /// The id of the record to edit
        id: String,
    },

    /// Mark a record Inactivo without removing it
    Deactivate {
        /// Collection name
        collection: String,

        /// The id of the record to deactivate
        id: String,
    },

    /// Delete a record permanently
    Del {
        /// Collection name
        collection: String,

        /// The id of the record to delete
        id: String,

        /// Skip confirmation prompt
        #[clap(long, short = 'y')]
        yes: bool,
    },

    /// Option list management
    #[clap(subcommand)]
    Settings(SettingsCommand),

    /// Export the whole catalog to a JSON backup file
    Export {
        /// Output file path (defaults to a dated itsm-backup file)
        #[clap(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Replace the whole catalog from a JSON backup file
    Import {
        /// Path to the backup file
        path: PathBuf,

        /// Skip confirmation prompt
        #[clap(long, short = 'y')]
        yes: bool,
    },

    /// Clear all data back to the empty default state
    Reset {
        /// Skip confirmation prompt
        #[clap(long, short = 'y')]
        yes: bool,
    },
}
