use anyhow::Result;
use colored::Colorize;
use inquire::{Editor, MultiSelect, Select, Text};
use std::collections::BTreeMap;

use catalog_core::relations;
use catalog_core::{
    CatalogStore, FieldDef, FieldType, FieldValue, Record, RelationDef, Schema,
};

/// Runs the schema-driven form for a collection and returns the collected
/// values. `existing` pre-fills every control for editing; keys omitted from
/// the result are preserved by the store's merge update.
pub fn prompt_record(
    store: &CatalogStore,
    schema: &Schema,
    existing: Option<&Record>,
) -> Result<BTreeMap<String, FieldValue>> {
    let mut values = BTreeMap::new();

    for field in &schema.fields {
        let current = existing.and_then(|r| r.value(field.name));
        if let Some(value) = prompt_field(field, current)? {
            values.insert(field.name.to_string(), value);
        }
    }

    for rel in &schema.relations {
        let current = existing.and_then(|r| r.value(rel.name));
        let value = prompt_relation(store, rel, current)?;
        values.insert(rel.name.to_string(), value);
    }

    Ok(values)
}

fn prompt_field(field: &FieldDef, current: Option<&FieldValue>) -> Result<Option<FieldValue>> {
    match &field.field_type {
        FieldType::Text => prompt_text(field, current),
        FieldType::TextArea => prompt_textarea(field, current),
        FieldType::Number => prompt_number(field, current),
        FieldType::Select { options } => prompt_select(field, options, current),
    }
}

fn prompt_text(field: &FieldDef, current: Option<&FieldValue>) -> Result<Option<FieldValue>> {
    let initial = current.and_then(FieldValue::as_text).unwrap_or("");

    let mut prompt = Text::new(field.label).with_initial_value(initial);
    if let Some(placeholder) = field.placeholder {
        prompt = prompt.with_placeholder(placeholder);
    }

    // Submitted verbatim: clearing a pre-filled value stores an empty string
    let input = prompt.prompt()?;
    Ok(Some(FieldValue::Text(input)))
}

fn prompt_textarea(field: &FieldDef, current: Option<&FieldValue>) -> Result<Option<FieldValue>> {
    let predefined = current.and_then(FieldValue::as_text).unwrap_or("");

    let input = Editor::new(field.label)
        .with_predefined_text(predefined)
        .prompt()?;
    Ok(Some(FieldValue::Text(input)))
}

fn prompt_number(field: &FieldDef, current: Option<&FieldValue>) -> Result<Option<FieldValue>> {
    let initial = match current {
        Some(FieldValue::Number(n)) => n.to_string(),
        Some(FieldValue::Text(s)) => s.clone(),
        _ => String::new(),
    };

    loop {
        let input = Text::new(field.label).with_initial_value(&initial).prompt()?;
        let input = input.trim();

        if input.is_empty() {
            return Ok(None);
        }

        match input.parse::<f64>() {
            Ok(n) => return Ok(Some(FieldValue::Number(n))),
            Err(_) => println!("{}", "Please enter a number.".yellow()),
        }
    }
}

fn prompt_select(
    field: &FieldDef,
    options: &[String],
    current: Option<&FieldValue>,
) -> Result<Option<FieldValue>> {
    let options = options.to_vec();
    let starting_cursor = current
        .and_then(FieldValue::as_text)
        .and_then(|stored| options.iter().position(|o| o == stored))
        .unwrap_or(0);

    if field.required {
        let choice = Select::new(field.label, options)
            .with_starting_cursor(starting_cursor)
            .prompt()?;
        return Ok(Some(FieldValue::Text(choice)));
    }

    // Optional selects can be skipped with Esc, leaving the field untouched
    let choice = Select::new(field.label, options)
        .with_starting_cursor(starting_cursor)
        .with_help_message("↑↓ to move, enter to select, esc to skip")
        .prompt_skippable()?;
    Ok(choice.map(FieldValue::Text))
}

fn prompt_relation(
    store: &CatalogStore,
    rel: &RelationDef,
    current: Option<&FieldValue>,
) -> Result<FieldValue> {
    let targets = store.get_all(rel.target);
    let options = relations::relation_options(rel, current, targets);

    if rel.multiple {
        let defaults: Vec<usize> = options
            .iter()
            .enumerate()
            .filter(|(_, opt)| opt.selected)
            .map(|(idx, _)| idx)
            .collect();

        let chosen = MultiSelect::new(rel.label, options)
            .with_default(&defaults)
            .prompt()?;
        return Ok(relations::collect_many(chosen.into_iter().map(|opt| opt.id)));
    }

    let starting_cursor = options.iter().position(|opt| opt.selected).unwrap_or(0);
    let chosen = Select::new(rel.label, options)
        .with_starting_cursor(starting_cursor)
        .prompt()?;
    Ok(relations::collect_single(&chosen.id))
}
