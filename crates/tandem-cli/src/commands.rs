//! Command handlers

use std::io::Read;
use std::path::{Path, PathBuf};

use tandem_app::app::{CatalogService, HistoryService, OrderDraft, OrderService, QueryService};
use tandem_app::config::Config;
use tandem_app::repository::open_store;
use tandem_domain::model::{LineField, LineItemTable, NewCatalogEntry};
use tandem_domain::service::numeric::{is_numeric_input, parse_amount};
use tandem_types::{Error, LineKind, OutputFormat, Result, ValidationError};
use tracing::debug;

use crate::cli::{CatalogCommands, Cli, Commands, HistoryCommands, OrderCommands};
use crate::output::{
    output_catalog, output_history, output_names, output_order, output_orders, output_totals,
};

pub fn execute(cli: Cli) -> Result<()> {
    // Load config
    let mut config = Config::load()?;

    // Override from CLI args
    if let Some(ref dir) = cli.data_dir {
        config.data_dir = Some(dir.clone());
    }
    let output_format = cli.format.unwrap_or(config.output_format);
    debug!(format = %output_format, "Configuration loaded");

    match cli.command {
        Commands::Init => cmd_init(&config),
        Commands::Order { command } => cmd_order(&config, output_format, command),
        Commands::Catalog { command } => cmd_catalog(&config, output_format, command),
        Commands::History { command } => cmd_history(&config, output_format, command),
        Commands::Export {
            output,
            search,
            vehicle_type,
        } => cmd_export(&config, &output, &search, vehicle_type.as_deref()),
        Commands::Config {
            show,
            set_data_dir,
            set_reports_dir,
            set_coefficient,
            set_suggestion_limit,
            set_legacy_fallback,
            set_output,
            set_font,
            set_company_name,
            set_company_address,
            set_company_contacts,
            reset,
        } => cmd_config(ConfigChanges {
            show,
            set_data_dir,
            set_reports_dir,
            set_coefficient,
            set_suggestion_limit,
            set_legacy_fallback,
            set_output,
            set_font,
            set_company_name,
            set_company_address,
            set_company_contacts,
            reset,
        }),
    }
}

fn invalid(field: impl Into<String>, value: &str) -> Error {
    ValidationError::InvalidInput {
        field: field.into(),
        value: value.to_string(),
    }
    .into()
}

fn cmd_init(config: &Config) -> Result<()> {
    let store = open_store(config)?;
    println!("Store:          {}", store.path().display());
    println!("Schema version: {}", store.schema_version()?);
    println!("Reports:        {}", config.reports_dir()?.display());
    Ok(())
}

/// Read a JSON draft from a file, or stdin for `-`
fn read_draft(path: &Path) -> Result<OrderDraft> {
    let content = if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&content)?)
}

fn cmd_order(config: &Config, output_format: OutputFormat, command: OrderCommands) -> Result<()> {
    let service = OrderService::from_config(config)?;

    match command {
        OrderCommands::New => {
            let draft = OrderDraft::from_order(&service.new_order());
            println!("{}", serde_json::to_string_pretty(&draft)?);
            Ok(())
        }

        OrderCommands::Save { draft, print } => {
            let order = read_draft(&draft)?.into_order(&config.default_coefficient)?;
            if print {
                let (id, path) = service.save_and_print(&order)?;
                println!("Saved order {}", id);
                println!("Document: {}", path.display());
            } else {
                let id = service.save(&order)?;
                println!("Saved order {}", id);
            }
            Ok(())
        }

        OrderCommands::Show { id } => output_order(output_format, &service.load(id)?),

        OrderCommands::List {
            search,
            vehicle_type,
        } => {
            let query = QueryService::from_config(config)?;
            let orders = query.search(&search, vehicle_type.as_deref())?;
            output_orders(output_format, &orders)
        }

        OrderCommands::Types => {
            let query = QueryService::from_config(config)?;
            output_names(output_format, &query.vehicle_types()?)
        }

        OrderCommands::Delete { id } => {
            service.delete(id)?;
            println!("Deleted order {}", id);
            Ok(())
        }

        OrderCommands::Print { id } => {
            let path = service.print(id)?;
            println!("{}", path.display());
            Ok(())
        }

        OrderCommands::Totals { draft } => {
            let order = read_draft(&draft)?.into_order(&config.default_coefficient)?;
            output_totals(output_format, &order)
        }

        OrderCommands::AddLine {
            id,
            kind,
            from_catalog,
            name,
            unit,
            quantity,
            price,
        } => {
            let catalog = CatalogService::from_config(config)?;
            let order = service.edit_lines(id, kind, |table| {
                let pos = match table.rows().iter().position(|row| row.is_blank()) {
                    Some(pos) => pos,
                    None => table.add_row(),
                };
                if let Some(ref entry_name) = from_catalog {
                    catalog.fill_row(table, pos, entry_name)?;
                }
                let fields = [
                    (LineField::Name, name.as_deref()),
                    (LineField::Unit, unit.as_deref()),
                    (LineField::Quantity, quantity.as_deref()),
                    (LineField::UnitPrice, price.as_deref()),
                ];
                for (field, value) in fields {
                    if let Some(value) = value {
                        set_cell(table, pos, field, value)?;
                    }
                }
                if table.get(pos).is_some_and(|row| row.is_blank()) {
                    return Err(ValidationError::MissingField("Name").into());
                }
                Ok(())
            })?;
            output_order(output_format, &order)
        }

        OrderCommands::RemoveLine { id, kind, row } => {
            let order = service.edit_lines(id, kind, |table| {
                if row == 0 || !table.remove_row(row - 1) {
                    return Err(invalid(format!("{} row", kind_label(kind)), &row.to_string()));
                }
                Ok(())
            })?;
            output_order(output_format, &order)
        }

        OrderCommands::SetField {
            id,
            kind,
            row,
            field,
            value,
        } => {
            let order = service.edit_lines(id, kind, |table| {
                let pos = row
                    .checked_sub(1)
                    .filter(|pos| *pos < table.len())
                    .ok_or_else(|| Error::NotFound(format!("{} row {}", kind_label(kind), row)))?;
                set_cell(table, pos, field.into(), &value)
            })?;
            output_order(output_format, &order)
        }

        OrderCommands::SetCoefficient { id, value } => {
            if !is_numeric_input(value.trim()) {
                return Err(invalid("coefficient", &value));
            }
            let order = service.set_coefficient(id, &value)?;
            output_order(output_format, &order)
        }
    }
}

fn kind_label(kind: LineKind) -> &'static str {
    match kind {
        LineKind::Work => "works",
        LineKind::Material => "materials",
    }
}

fn field_label(field: LineField) -> &'static str {
    match field {
        LineField::Name => "name",
        LineField::Unit => "unit",
        LineField::Quantity => "quantity",
        LineField::UnitPrice => "price",
        LineField::EquipmentParam1 => "param1",
        LineField::EquipmentParam2 => "param2",
    }
}

fn set_cell(table: &mut LineItemTable, pos: usize, field: LineField, value: &str) -> Result<()> {
    if !table.set_field(pos, field, value) {
        return Err(invalid(
            format!("{} row {} {}", kind_label(table.kind()), pos + 1, field_label(field)),
            value,
        ));
    }
    Ok(())
}

fn cmd_catalog(config: &Config, output_format: OutputFormat, command: CatalogCommands) -> Result<()> {
    let service = CatalogService::from_config(config)?;

    match command {
        CatalogCommands::List { kind } => output_catalog(output_format, &service.list(kind)?),

        CatalogCommands::Suggest { kind, query } => {
            output_names(output_format, &service.suggest(kind, &query)?)
        }

        CatalogCommands::Add {
            kind,
            name,
            unit,
            price,
        } => {
            if name.trim().is_empty() {
                return Err(ValidationError::MissingField("Name").into());
            }
            if !is_numeric_input(price.trim()) {
                return Err(invalid("price", &price));
            }
            let entry = service.add(
                kind,
                &NewCatalogEntry {
                    name: name.trim().to_string(),
                    unit: unit.trim().to_string(),
                    default_price: parse_amount(&price),
                },
            )?;
            output_catalog(output_format, std::slice::from_ref(&entry))
        }

        CatalogCommands::Remove { kind, id } => {
            service.remove(kind, id)?;
            println!("Removed {} catalog entry {}", kind, id);
            Ok(())
        }

        CatalogCommands::Import { kind, file } => {
            let added = service.import_csv(kind, &file)?;
            output_catalog(output_format, &added)
        }
    }
}

fn cmd_history(config: &Config, output_format: OutputFormat, command: HistoryCommands) -> Result<()> {
    let service = HistoryService::from_config(config)?;

    match command {
        HistoryCommands::List { limit } => output_history(output_format, &service.list()?, limit),
        HistoryCommands::Delete { id } => {
            service.delete_entry(id)?;
            println!("Deleted history entry {}", id);
            Ok(())
        }
    }
}

fn cmd_export(config: &Config, output: &Path, search: &str, vehicle_type: Option<&str>) -> Result<()> {
    let query = QueryService::from_config(config)?;
    let count = query.export(search, vehicle_type, output)?;
    println!("Exported {} order(s) to {}", count, output.display());
    Ok(())
}

struct ConfigChanges {
    show: bool,
    set_data_dir: Option<PathBuf>,
    set_reports_dir: Option<PathBuf>,
    set_coefficient: Option<String>,
    set_suggestion_limit: Option<usize>,
    set_legacy_fallback: Option<bool>,
    set_output: Option<OutputFormat>,
    set_font: Option<PathBuf>,
    set_company_name: Option<String>,
    set_company_address: Option<String>,
    set_company_contacts: Option<String>,
    reset: bool,
}

fn cmd_config(changes: ConfigChanges) -> Result<()> {
    if changes.reset {
        let config = Config::default();
        config.save()?;
        println!("Configuration reset to defaults");
        println!("\n{}", config);
        return Ok(());
    }

    let mut config = Config::load()?;
    let mut modified = false;

    if let Some(dir) = changes.set_data_dir {
        config.data_dir = Some(dir);
        modified = true;
    }

    if let Some(dir) = changes.set_reports_dir {
        config.reports_dir = Some(dir);
        modified = true;
    }

    if let Some(coefficient) = changes.set_coefficient {
        if !is_numeric_input(coefficient.trim()) {
            return Err(invalid("coefficient", &coefficient));
        }
        config.default_coefficient = coefficient.trim().to_string();
        modified = true;
    }

    if let Some(limit) = changes.set_suggestion_limit {
        config.suggestion_limit = limit;
        modified = true;
    }

    if let Some(enabled) = changes.set_legacy_fallback {
        config.legacy_suggestion_fallback = enabled;
        modified = true;
    }

    if let Some(output_format) = changes.set_output {
        config.output_format = output_format;
        modified = true;
    }

    if let Some(font) = changes.set_font {
        config.font_path = Some(font);
        modified = true;
    }

    if let Some(name) = changes.set_company_name {
        config.company.name = name;
        modified = true;
    }

    if let Some(address) = changes.set_company_address {
        config.company.address = address;
        modified = true;
    }

    if let Some(contacts) = changes.set_company_contacts {
        config.company.contacts = contacts;
        modified = true;
    }

    if modified {
        config.save()?;
        println!("Configuration updated");
    }

    if changes.show || !modified {
        println!("{}", config);
    }

    Ok(())
}
