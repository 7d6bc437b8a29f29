mod cli;
mod paths;
mod prompts;

use anyhow::{Context, Result};
use clap::Parser;
use colored::{ColoredString, Colorize};
use inquire::Confirm;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use catalog_core::{
    backup_file_name, relations, schemas_for, validate_required, CatalogStore, Collection,
    FieldValue, Record, SettingKey,
};

use crate::cli::{Cli, Command, SettingsCommand};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let catalog_path = paths::determine_catalog_path(cli.file.clone())?;
    let mut store = CatalogStore::open(&catalog_path)?;

    match &cli.command {
        Command::List { collection, filter } => {
            list_records(&store, parse_collection(collection)?, filter.as_deref())?;
        }
        Command::Show { collection, id } => {
            show_record(&store, parse_collection(collection)?, id)?;
        }
        Command::Add { collection } => {
            add_record(&mut store, parse_collection(collection)?)?;
        }
        Command::Edit { collection, id } => {
            edit_record(&mut store, parse_collection(collection)?, id)?;
        }
        Command::Deactivate { collection, id } => {
            deactivate_record(&mut store, parse_collection(collection)?, id)?;
        }
        Command::Del { collection, id, yes } => {
            delete_record(&mut store, parse_collection(collection)?, id, *yes)?;
        }
        Command::Settings(settings_cmd) => {
            handle_settings_command(&mut store, settings_cmd)?;
        }
        Command::Export { output } => {
            export_catalog(&store, output.clone())?;
        }
        Command::Import { path, yes } => {
            import_catalog(&mut store, path, *yes)?;
        }
        Command::Reset { yes } => {
            reset_catalog(&mut store, *yes)?;
        }
    }

    Ok(())
}

fn parse_collection(name: &str) -> Result<Collection> {
    Collection::parse(name).with_context(|| {
        format!(
            "Unknown collection '{}'. Valid collections: services, components, requests, technical",
            name
        )
    })
}

fn status_colored(status: &str) -> ColoredString {
    match status {
        "Activo" | "Operativo" => status.green(),
        "Inactivo" | "Retirado" | "Fuera de Servicio" => status.red(),
        _ => status.yellow(),
    }
}

fn list_records(store: &CatalogStore, collection: Collection, filter: Option<&str>) -> Result<()> {
    let schemas = schemas_for(store.settings());
    let schema = &schemas[&collection];
    let records = store.get_all(collection);

    // Whole-record substring search, like the catalog's global search box
    let filtered: Vec<&Record> = match filter {
        Some(text) => {
            let needle = text.to_lowercase();
            records
                .iter()
                .filter(|record| {
                    serde_json::to_string(record)
                        .map(|json| json.to_lowercase().contains(&needle))
                        .unwrap_or(false)
                })
                .collect()
        }
        None => records.iter().collect(),
    };

    println!("{} {} ({})", schema.icon, schema.label.bold(), filtered.len());

    if filtered.is_empty() {
        println!("{}", "No records found.".yellow());
        return Ok(());
    }

    println!("{:<36} | {:<30} | {:<20}", "ID", "Name", "Status");
    println!("{}", "-".repeat(92));

    for record in filtered {
        let status = record.text("status").unwrap_or("-");
        println!(
            "{:<36} | {:<30} | {:<20}",
            record.id,
            relations::display_name(record),
            status_colored(status)
        );
    }

    Ok(())
}

fn show_record(store: &CatalogStore, collection: Collection, id: &str) -> Result<()> {
    let schemas = schemas_for(store.settings());
    let schema = &schemas[&collection];
    let record = store.get(collection, id).context("Record not found")?;

    println!("{}: {}", "ID".blue(), record.id);
    println!(
        "{}: {}",
        "Created".blue(),
        record.created_at.format("%Y-%m-%d %H:%M:%S UTC")
    );

    for field in &schema.fields {
        let value = record
            .value(field.name)
            .map(|v| v.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("{}: {}", field.label.blue(), value);
    }

    for rel in &schema.relations {
        let labels = relations::resolve_labels(record.value(rel.name), store.get_all(rel.target));
        let display = if labels.is_empty() {
            "-".to_string()
        } else {
            labels.join(", ")
        };
        println!("{}: {}", rel.label.blue(), display);
    }

    Ok(())
}

fn add_record(store: &mut CatalogStore, collection: Collection) -> Result<()> {
    let schemas = schemas_for(store.settings());
    let schema = &schemas[&collection];

    println!("{} Crear {}", schema.icon, schema.label.bold());
    let draft = prompts::prompt_record(store, schema, None)?;
    validate_required(schema, &draft)?;

    let record = store.add(collection, draft)?;

    println!("{}", "Record created successfully!".green());
    println!("ID: {}", record.id);
    Ok(())
}

fn edit_record(store: &mut CatalogStore, collection: Collection, id: &str) -> Result<()> {
    let schemas = schemas_for(store.settings());
    let schema = &schemas[&collection];
    let existing = store
        .get(collection, id)
        .context("Record not found")?
        .clone();

    println!("{} Editar {}", schema.icon, schema.label.bold());
    let draft = prompts::prompt_record(store, schema, Some(&existing))?;
    validate_required(schema, &draft)?;

    if !store.update(collection, id, draft)? {
        anyhow::bail!("Record disappeared while editing: {}", id);
    }

    println!("{}", "Record updated successfully!".green());
    Ok(())
}

fn deactivate_record(store: &mut CatalogStore, collection: Collection, id: &str) -> Result<()> {
    let mut updates = BTreeMap::new();
    updates.insert("status".to_string(), FieldValue::Text("Inactivo".to_string()));

    if !store.update(collection, id, updates)? {
        anyhow::bail!("Record not found: {}", id);
    }

    println!("{}", "Record marked Inactivo.".yellow());
    Ok(())
}

fn delete_record(store: &mut CatalogStore, collection: Collection, id: &str, yes: bool) -> Result<()> {
    store.get(collection, id).context("Record not found")?;

    if !yes {
        let confirmed = Confirm::new("Delete this record permanently?")
            .with_default(false)
            .prompt()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    store.delete(collection, id)?;
    println!("{}", "Record deleted.".green());
    Ok(())
}

fn handle_settings_command(store: &mut CatalogStore, command: &SettingsCommand) -> Result<()> {
    match command {
        SettingsCommand::Show => {
            for key in SettingKey::ALL {
                println!("{} ({})", key.label().bold(), key);
                for value in store.settings().get(key) {
                    println!("  - {}", value);
                }
            }
        }
        SettingsCommand::Add { key, value } => {
            let key = parse_setting_key(key)?;
            if store.add_setting_value(key, value)? {
                println!("{}", "Option added.".green());
            } else {
                println!("{}", "Option already present.".yellow());
            }
        }
        SettingsCommand::Remove { key, value } => {
            let key = parse_setting_key(key)?;
            if store.remove_setting_value(key, value)? {
                println!("{}", "Option removed.".green());
            } else {
                println!("{}", "Option not found.".yellow());
            }
        }
    }
    Ok(())
}

fn parse_setting_key(key: &str) -> Result<SettingKey> {
    SettingKey::parse(key).with_context(|| {
        let valid: Vec<&str> = SettingKey::ALL.iter().map(|k| k.as_str()).collect();
        format!("Unknown settings list '{}'. Valid keys: {}", key, valid.join(", "))
    })
}

fn export_catalog(store: &CatalogStore, output: Option<PathBuf>) -> Result<()> {
    let path = output.unwrap_or_else(|| PathBuf::from(backup_file_name()));
    let json = store.export_state()?;

    fs::write(&path, json).with_context(|| format!("Failed to write backup to {:?}", path))?;

    println!("{} {:?}", "Catalog exported to".green(), path);
    Ok(())
}

fn import_catalog(store: &mut CatalogStore, path: &Path, yes: bool) -> Result<()> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("Failed to read backup file: {:?}", path))?;

    if !yes {
        let confirmed = Confirm::new("Replace the whole catalog with this backup?")
            .with_default(false)
            .prompt()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    if store.import_state(&raw)? {
        println!("{}", "Catalog imported successfully!".green());
        Ok(())
    } else {
        anyhow::bail!("Import failed: the file is not a valid catalog backup")
    }
}

fn reset_catalog(store: &mut CatalogStore, yes: bool) -> Result<()> {
    if !yes {
        let confirmed = Confirm::new("This will erase all catalog data. Are you sure?")
            .with_default(false)
            .prompt()?;
        if !confirmed {
            println!("Aborted.");
            return Ok(());
        }
    }

    store.reset()?;
    println!("{}", "Catalog reset to the empty default state.".green());
    Ok(())
}
