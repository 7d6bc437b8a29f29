use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::{Collection, FieldValue};
use crate::settings::Settings;

/// The kind of input a field takes
#[derive(Debug, Clone, PartialEq)]
pub enum FieldType {
    Text,
    TextArea,
    Number,
    Select { options: Vec<String> },
}

/// A scalar field declared by a collection schema
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDef {
    pub name: &'static str,
    pub label: &'static str,
    pub field_type: FieldType,
    pub required: bool,
    pub placeholder: Option<&'static str>,
}

impl FieldDef {
    fn new(name: &'static str, label: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            label,
            field_type,
            required: false,
            placeholder: None,
        }
    }

    fn required(mut self) -> Self {
        self.required = true;
        self
    }

    fn placeholder(mut self, text: &'static str) -> Self {
        self.placeholder = Some(text);
        self
    }
}

/// A declared reference from a record to one or many records of another collection
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelationDef {
    pub name: &'static str,
    pub label: &'static str,
    pub target: Collection,
    pub multiple: bool,
}

/// Derived description of a collection: its fields and relations
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    pub label: &'static str,
    pub icon: &'static str,
    pub fields: Vec<FieldDef>,
    pub relations: Vec<RelationDef>,
}

fn select(options: &[String]) -> FieldType {
    FieldType::Select {
        options: options.to_vec(),
    }
}

fn select_static(options: &[&str]) -> FieldType {
    FieldType::Select {
        options: options.iter().map(|s| s.to_string()).collect(),
    }
}

/// Derives the per-collection schemas from the current settings snapshot.
///
/// Pure function, recomputed on every call: select-field option lists are
/// read from `settings` each time, so a settings edit is visible in the very
/// next schema without any other state change.
pub fn schemas_for(settings: &Settings) -> BTreeMap<Collection, Schema> {
    let mut schemas = BTreeMap::new();

    schemas.insert(
        Collection::Services,
        Schema {
            label: "Servicio de Negocio",
            icon: "💼",
            fields: vec![
                FieldDef::new("name", "Nombre del Servicio", FieldType::Text).required(),
                FieldDef::new("description", "Descripción", FieldType::TextArea).required(),
                FieldDef::new("owner", "Propietario (Service Owner)", select(&settings.contacts))
                    .required(),
                FieldDef::new("manager", "Gestor (Service Manager)", select(&settings.contacts)),
                FieldDef::new("criticality", "Criticidad", select(&settings.criticalities))
                    .required(),
                FieldDef::new("availability", "Horario Disponibilidad", FieldType::Text)
                    .placeholder("Ej. 24/7, Lun-Vie 9-6"),
                FieldDef::new("sla_response", "SLA Respuesta (Horas)", FieldType::Number),
                FieldDef::new("cost", "Costo Mensual ($)", FieldType::Number),
                FieldDef::new("status", "Estado", select(&settings.statuses)).required(),
                FieldDef::new("customers", "Clientes/Usuarios", FieldType::Text),
            ],
            relations: vec![
                RelationDef {
                    name: "linked_cis",
                    label: "CIs Relacionados",
                    target: Collection::Components,
                    multiple: true,
                },
                RelationDef {
                    name: "linked_requests",
                    label: "Peticiones Asociadas",
                    target: Collection::Requests,
                    multiple: true,
                },
            ],
        },
    );

    schemas.insert(
        Collection::Components,
        Schema {
            label: "Componente (CI)",
            icon: "🧩",
            fields: vec![
                FieldDef::new("name", "Nombre del CI", FieldType::Text).required(),
                FieldDef::new("type", "Tipo de CI", select(&settings.ci_types)).required(),
                FieldDef::new("status", "Estado", select(&settings.ci_statuses)).required(),
                FieldDef::new("tech_owner", "Propietario Técnico", select(&settings.contacts)),
                FieldDef::new("location", "Ubicación Física/Lógica", FieldType::Text),
                FieldDef::new("version", "Versión/Modelo", FieldType::Text),
            ],
            relations: vec![RelationDef {
                name: "parent_service",
                label: "Servicio Padre",
                target: Collection::Services,
                multiple: false,
            }],
        },
    );

    schemas.insert(
        Collection::Requests,
        Schema {
            label: "Catálogo de Peticiones",
            icon: "📋",
            fields: vec![
                FieldDef::new("name", "Nombre Solicitud", FieldType::Text).required(),
                FieldDef::new("type", "Tipo", select(&settings.request_types)).required(),
                FieldDef::new("category", "Categoría", FieldType::Text),
                FieldDef::new("tat", "Tiempo Cumplimiento (Días)", FieldType::Number),
                FieldDef::new(
                    "approvals",
                    "Aprobaciones Requeridas",
                    select_static(&["Ninguna", "Manager", "Owner", "Director"]),
                ),
                FieldDef::new("cost", "Costo ($)", FieldType::Number),
            ],
            relations: vec![RelationDef {
                name: "related_service",
                label: "Servicio Asociado",
                target: Collection::Services,
                multiple: false,
            }],
        },
    );

    schemas.insert(
        Collection::Technical,
        Schema {
            label: "Información Técnica",
            icon: "🔧",
            fields: vec![
                FieldDef::new("category", "Categoría Incidente", FieldType::Text).required(),
                FieldDef::new("subcategory", "Subcategoría", FieldType::Text),
                FieldDef::new(
                    "L1_group",
                    "Grupo Asignación L1",
                    select(&settings.assignment_groups),
                )
                .required(),
                FieldDef::new(
                    "L2_group",
                    "Grupo Asignación L2",
                    select(&settings.assignment_groups),
                ),
                FieldDef::new("escalation", "Procedimiento Escalado", FieldType::TextArea),
                FieldDef::new(
                    "priority",
                    "Prioridad Técnica",
                    select_static(&["P1", "P2", "P3", "P4"]),
                ),
                FieldDef::new("kb_articles", "Artículos KB Relacionados", FieldType::TextArea),
            ],
            relations: vec![RelationDef {
                name: "related_service_tech",
                label: "Aplica al Servicio",
                target: Collection::Services,
                multiple: true,
            }],
        },
    );

    schemas
}

/// A record draft failed required-field validation
#[derive(Debug, Error, PartialEq, Eq)]
#[error("missing required fields: {}", .missing.join(", "))]
pub struct ValidationError {
    /// Labels of the required fields that are absent or empty
    pub missing: Vec<String>,
}

/// Checks that every required field of the schema carries a present,
/// non-empty value. The store itself never validates; this runs before a
/// draft is handed to `add` or `update`.
pub fn validate_required(
    schema: &Schema,
    values: &BTreeMap<String, FieldValue>,
) -> Result<(), ValidationError> {
    let missing: Vec<String> = schema
        .fields
        .iter()
        .filter(|field| field.required)
        .filter(|field| values.get(field.name).map_or(true, FieldValue::is_empty))
        .map(|field| field.label.to_string())
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError { missing })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(pairs: &[(&str, &str)]) -> BTreeMap<String, FieldValue> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), FieldValue::from(*v)))
            .collect()
    }

    #[test]
    fn test_all_collections_have_schemas() {
        let schemas = schemas_for(&Settings::default());
        for collection in Collection::ALL {
            assert!(schemas.contains_key(&collection), "no schema for {}", collection);
        }
        assert_eq!(schemas[&Collection::Services].fields.len(), 10);
        assert_eq!(schemas[&Collection::Services].relations.len(), 2);
        assert_eq!(schemas[&Collection::Technical].relations[0].target, Collection::Services);
    }

    #[test]
    fn test_settings_edits_show_up_in_next_derivation() {
        let mut settings = Settings::default();
        settings.add_value(crate::settings::SettingKey::Contacts, "Legal");

        let schemas = schemas_for(&settings);
        let owner = schemas[&Collection::Services]
            .fields
            .iter()
            .find(|f| f.name == "owner")
            .unwrap();
        match &owner.field_type {
            FieldType::Select { options } => assert!(options.contains(&"Legal".to_string())),
            other => panic!("owner should be a select, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_required_reports_missing_labels() {
        let schemas = schemas_for(&Settings::default());
        let schema = &schemas[&Collection::Services];

        let err = validate_required(schema, &values(&[("name", "Billing")])).unwrap_err();
        assert!(err.missing.contains(&"Descripción".to_string()));
        assert!(err.missing.contains(&"Estado".to_string()));
        assert!(!err.missing.contains(&"Clientes/Usuarios".to_string()));
    }

    #[test]
    fn test_validate_required_rejects_empty_strings() {
        let schemas = schemas_for(&Settings::default());
        let schema = &schemas[&Collection::Components];

        let mut draft = values(&[("name", "  "), ("type", "Servidor"), ("status", "Operativo")]);
        let err = validate_required(schema, &draft).unwrap_err();
        assert_eq!(err.missing, vec!["Nombre del CI".to_string()]);

        draft.insert("name".to_string(), FieldValue::from("DB-01"));
        assert!(validate_required(schema, &draft).is_ok());
    }

    #[test]
    fn test_validate_required_accepts_complete_draft() {
        let schemas = schemas_for(&Settings::default());
        let schema = &schemas[&Collection::Technical];

        let draft = values(&[("category", "Red"), ("L1_group", "Mesa de Ayuda")]);
        assert!(validate_required(schema, &draft).is_ok());
    }
}
