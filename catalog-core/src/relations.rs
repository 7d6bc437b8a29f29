//! Translation between a relation's stored value (an id or a list of ids)
//! and its form representation (selected option(s) over the target
//! collection's records), in both directions.

use std::fmt;

use crate::models::{FieldValue, Record};
use crate::schema::RelationDef;

/// Label shown when a referenced record has no display name or no longer
/// exists in the target collection (dangling reference after a delete).
pub const UNNAMED: &str = "Unnamed";

/// Option label for the explicit "none selected" entry of a single relation
pub const NONE_SELECTED: &str = "-- Seleccionar --";

/// One selectable entry of a relation form control
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelationOption {
    /// Target record id; empty for the none-selected sentinel
    pub id: String,
    pub label: String,
    pub selected: bool,
}

impl fmt::Display for RelationOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Display name for a record: its `name`, else its `category`, else "Unnamed"
pub fn display_name(record: &Record) -> &str {
    record
        .text("name")
        .filter(|s| !s.is_empty())
        .or_else(|| record.text("category").filter(|s| !s.is_empty()))
        .unwrap_or(UNNAMED)
}

/// Ids currently stored in a relation value, regardless of multiplicity.
/// A missing value, an empty string or an empty list all mean "nothing".
pub fn stored_ids(value: Option<&FieldValue>) -> Vec<String> {
    match value {
        Some(FieldValue::Text(id)) if !id.is_empty() => vec![id.clone()],
        Some(FieldValue::Many(ids)) => ids.clone(),
        _ => Vec::new(),
    }
}

/// Build direction: the selectable option list for a relation, with stored
/// ids pre-selected. Single-valued relations get a leading none-selected
/// sentinel which is selected when nothing is stored.
///
/// Whether a stored id still exists in `targets` is not verified here; a
/// dangling id simply matches no option.
pub fn relation_options(
    rel: &RelationDef,
    stored: Option<&FieldValue>,
    targets: &[Record],
) -> Vec<RelationOption> {
    let ids = stored_ids(stored);
    let mut options = Vec::new();

    if !rel.multiple {
        options.push(RelationOption {
            id: String::new(),
            label: NONE_SELECTED.to_string(),
            selected: !targets.iter().any(|t| ids.contains(&t.id)),
        });
    }

    for target in targets {
        options.push(RelationOption {
            id: target.id.clone(),
            label: display_name(target).to_string(),
            selected: ids.contains(&target.id),
        });
    }

    options
}

/// Collect direction for a single-valued relation.
/// An empty id means "unset" and is stored as such.
pub fn collect_single(selected_id: &str) -> FieldValue {
    FieldValue::Text(selected_id.to_string())
}

/// Collect direction for a multi-valued relation, preserving selection order
pub fn collect_many<I>(selected_ids: I) -> FieldValue
where
    I: IntoIterator<Item = String>,
{
    FieldValue::Many(selected_ids.into_iter().collect())
}

/// Resolves stored relation ids to display labels for viewing.
/// A dangling id comes back as "Unnamed"; the consumer decides the UX.
pub fn resolve_labels(value: Option<&FieldValue>, targets: &[Record]) -> Vec<String> {
    stored_ids(value)
        .iter()
        .map(|id| {
            targets
                .iter()
                .find(|t| &t.id == id)
                .map(|t| display_name(t).to_string())
                .unwrap_or_else(|| UNNAMED.to_string())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Collection;
    use std::collections::BTreeMap;

    fn named(name: &str) -> Record {
        let mut values = BTreeMap::new();
        values.insert("name".to_string(), FieldValue::from(name));
        Record::new(values)
    }

    fn single_rel() -> RelationDef {
        RelationDef {
            name: "parent_service",
            label: "Servicio Padre",
            target: Collection::Services,
            multiple: false,
        }
    }

    fn multi_rel() -> RelationDef {
        RelationDef {
            name: "linked_cis",
            label: "CIs Relacionados",
            target: Collection::Components,
            multiple: true,
        }
    }

    #[test]
    fn test_display_name_fallbacks() {
        assert_eq!(display_name(&named("Billing")), "Billing");

        let mut values = BTreeMap::new();
        values.insert("category".to_string(), FieldValue::from("Red"));
        assert_eq!(display_name(&Record::new(values)), "Red");

        assert_eq!(display_name(&Record::new(BTreeMap::new())), UNNAMED);

        let mut values = BTreeMap::new();
        values.insert("name".to_string(), FieldValue::from(""));
        values.insert("category".to_string(), FieldValue::from("Acceso"));
        assert_eq!(display_name(&Record::new(values)), "Acceso");
    }

    #[test]
    fn test_single_relation_sentinel_selected_when_unset() {
        let targets = vec![named("A"), named("B")];
        let options = relation_options(&single_rel(), None, &targets);

        assert_eq!(options.len(), 3);
        assert_eq!(options[0].id, "");
        assert_eq!(options[0].label, NONE_SELECTED);
        assert!(options[0].selected);
        assert!(!options[1].selected && !options[2].selected);
    }

    #[test]
    fn test_single_relation_preselects_stored_id() {
        let targets = vec![named("A"), named("B")];
        let stored = FieldValue::Text(targets[1].id.clone());
        let options = relation_options(&single_rel(), Some(&stored), &targets);

        assert!(!options[0].selected);
        assert!(!options[1].selected);
        assert!(options[2].selected);
    }

    #[test]
    fn test_multi_relation_preselects_every_stored_id() {
        let targets = vec![named("A"), named("B"), named("C")];
        let stored = FieldValue::Many(vec![targets[0].id.clone(), targets[2].id.clone()]);
        let options = relation_options(&multi_rel(), Some(&stored), &targets);

        // No sentinel for multi-valued relations
        assert_eq!(options.len(), 3);
        assert!(options[0].selected);
        assert!(!options[1].selected);
        assert!(options[2].selected);
    }

    #[test]
    fn test_dangling_id_selects_sentinel() {
        let targets = vec![named("A")];
        let stored = FieldValue::Text("gone".to_string());
        let options = relation_options(&single_rel(), Some(&stored), &targets);

        assert!(options[0].selected);
        assert!(!options[1].selected);
    }

    #[test]
    fn test_collect_directions() {
        assert_eq!(collect_single("abc"), FieldValue::Text("abc".to_string()));
        assert_eq!(collect_single(""), FieldValue::Text(String::new()));

        let many = collect_many(vec!["x".to_string(), "y".to_string()]);
        assert_eq!(many, FieldValue::Many(vec!["x".to_string(), "y".to_string()]));
        assert_eq!(collect_many(Vec::<String>::new()), FieldValue::Many(Vec::new()));
    }

    #[test]
    fn test_resolve_labels_marks_dangling_as_unnamed() {
        let targets = vec![named("Billing")];
        let stored = FieldValue::Many(vec![targets[0].id.clone(), "deleted".to_string()]);

        let labels = resolve_labels(Some(&stored), &targets);
        assert_eq!(labels, vec!["Billing".to_string(), UNNAMED.to_string()]);
    }
}
