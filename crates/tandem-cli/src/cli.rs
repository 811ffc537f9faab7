//! CLI definition using clap

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tandem_domain::model::LineField;
use tandem_types::{CatalogKind, LineKind, OutputFormat};

#[derive(Parser)]
#[command(name = "tandem")]
#[command(version)]
#[command(about = "Vehicle service work orders: line items, catalogs, printed documents")]
#[command(long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output format (json, table). Uses config value if not specified.
    #[arg(long, short = 'f', global = true)]
    pub format: Option<OutputFormat>,

    /// Data directory override for this run (store file and reports)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create or migrate the store and show where it lives
    Init,

    /// Work orders
    Order {
        #[command(subcommand)]
        command: OrderCommands,
    },

    /// Work and material catalogs
    Catalog {
        #[command(subcommand)]
        command: CatalogCommands,
    },

    /// Printed document history
    History {
        #[command(subcommand)]
        command: HistoryCommands,
    },

    /// Export orders to Excel
    Export {
        /// Output Excel file path
        #[arg(long, short = 'o')]
        output: PathBuf,

        /// Only orders matching this text
        #[arg(long, short = 's', default_value = "")]
        search: String,

        /// Only orders of this vehicle type
        #[arg(long = "type", short = 't')]
        vehicle_type: Option<String>,
    },

    /// Manage configuration
    Config {
        /// Show current configuration
        #[arg(long)]
        show: bool,

        /// Set data directory
        #[arg(long)]
        set_data_dir: Option<PathBuf>,

        /// Set reports directory
        #[arg(long)]
        set_reports_dir: Option<PathBuf>,

        /// Set coefficient for new orders
        #[arg(long)]
        set_coefficient: Option<String>,

        /// Set maximum number of catalog suggestions
        #[arg(long)]
        set_suggestion_limit: Option<usize>,

        /// Offer the whole catalog when a suggestion query matches nothing
        #[arg(long)]
        set_legacy_fallback: Option<bool>,

        /// Set default output format
        #[arg(long)]
        set_output: Option<OutputFormat>,

        /// Set TrueType font for documents
        #[arg(long)]
        set_font: Option<PathBuf>,

        /// Set company name printed on documents
        #[arg(long)]
        set_company_name: Option<String>,

        /// Set company address printed on documents
        #[arg(long)]
        set_company_address: Option<String>,

        /// Set company contacts printed on documents
        #[arg(long)]
        set_company_contacts: Option<String>,

        /// Reset to defaults
        #[arg(long)]
        reset: bool,
    },
}

#[derive(Subcommand)]
pub enum OrderCommands {
    /// Print a blank order draft as JSON
    New,

    /// Save an order from a JSON draft ("-" reads stdin)
    Save {
        draft: PathBuf,

        /// Also generate the document
        #[arg(long)]
        print: bool,
    },

    /// Show one order
    Show { id: i64 },

    /// List orders
    List {
        /// Case-insensitive text over contract, customer, plate and brand
        #[arg(long, short = 's', default_value = "")]
        search: String,

        /// Only orders of this vehicle type
        #[arg(long = "type", short = 't')]
        vehicle_type: Option<String>,
    },

    /// Vehicle types used by saved orders, for the type filter
    Types,

    /// Delete an order with its line items and history
    Delete { id: i64 },

    /// Generate the work-order document
    Print { id: i64 },

    /// Compute totals of a JSON draft without saving it
    Totals { draft: PathBuf },

    /// Append a line to a saved order
    AddLine {
        id: i64,

        #[arg(long, short = 'k')]
        kind: LineKind,

        /// Fill name, unit and price from the catalog entry with this name
        #[arg(long)]
        from_catalog: Option<String>,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        unit: Option<String>,

        #[arg(long, short = 'q')]
        quantity: Option<String>,

        #[arg(long, short = 'p')]
        price: Option<String>,
    },

    /// Remove a line (1-based row number) from a saved order
    RemoveLine {
        id: i64,

        #[arg(long, short = 'k')]
        kind: LineKind,

        row: usize,
    },

    /// Change one cell of a saved order's line
    SetField {
        id: i64,

        #[arg(long, short = 'k')]
        kind: LineKind,

        /// 1-based row number
        #[arg(long, short = 'r')]
        row: usize,

        #[arg(long)]
        field: FieldArg,

        value: String,
    },

    /// Change the coefficient of a saved order
    SetCoefficient { id: i64, value: String },
}

#[derive(Subcommand)]
pub enum CatalogCommands {
    /// List catalog entries
    List { kind: CatalogKind },

    /// Names matching a query, as offered while typing
    Suggest { kind: CatalogKind, query: String },

    /// Add an entry
    Add {
        kind: CatalogKind,

        #[arg(long)]
        name: String,

        #[arg(long, default_value = "")]
        unit: String,

        #[arg(long, default_value = "0")]
        price: String,
    },

    /// Remove an entry by id
    Remove { kind: CatalogKind, id: i64 },

    /// Import `name,unit,price` rows from CSV (UTF-8 or Windows-1251)
    Import { kind: CatalogKind, file: PathBuf },
}

#[derive(Subcommand)]
pub enum HistoryCommands {
    /// List printed documents, newest first
    List {
        /// Limit number of entries shown
        #[arg(long, short = 'n', default_value = "20")]
        limit: usize,
    },

    /// Delete an entry and its document file
    Delete { id: i64 },
}

/// Editable line columns
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum FieldArg {
    Name,
    Unit,
    Quantity,
    Price,
    Param1,
    Param2,
}

impl From<FieldArg> for LineField {
    fn from(field: FieldArg) -> Self {
        match field {
            FieldArg::Name => LineField::Name,
            FieldArg::Unit => LineField::Unit,
            FieldArg::Quantity => LineField::Quantity,
            FieldArg::Price => LineField::UnitPrice,
            FieldArg::Param1 => LineField::EquipmentParam1,
            FieldArg::Param2 => LineField::EquipmentParam2,
        }
    }
}
