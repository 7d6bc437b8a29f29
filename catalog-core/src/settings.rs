use serde::{Deserialize, Serialize};
use std::fmt;

/// The named option lists that feed select-type schema fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingKey {
    Criticalities,
    Statuses,
    CiTypes,
    CiStatuses,
    RequestTypes,
    AssignmentGroups,
    Contacts,
}

impl SettingKey {
    /// All setting keys, in display order
    pub const ALL: [SettingKey; 7] = [
        SettingKey::Criticalities,
        SettingKey::Statuses,
        SettingKey::CiTypes,
        SettingKey::CiStatuses,
        SettingKey::RequestTypes,
        SettingKey::AssignmentGroups,
        SettingKey::Contacts,
    ];

    /// Parses a key from its persisted name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "criticalities" => Some(SettingKey::Criticalities),
            "statuses" => Some(SettingKey::Statuses),
            "ci_types" => Some(SettingKey::CiTypes),
            "ci_statuses" => Some(SettingKey::CiStatuses),
            "request_types" => Some(SettingKey::RequestTypes),
            "assignment_groups" => Some(SettingKey::AssignmentGroups),
            "contacts" => Some(SettingKey::Contacts),
            _ => None,
        }
    }

    /// The persisted name of the key
    pub fn as_str(&self) -> &'static str {
        match self {
            SettingKey::Criticalities => "criticalities",
            SettingKey::Statuses => "statuses",
            SettingKey::CiTypes => "ci_types",
            SettingKey::CiStatuses => "ci_statuses",
            SettingKey::RequestTypes => "request_types",
            SettingKey::AssignmentGroups => "assignment_groups",
            SettingKey::Contacts => "contacts",
        }
    }

    /// Human-facing label for the settings list
    pub fn label(&self) -> &'static str {
        match self {
            SettingKey::Criticalities => "Niveles de Criticidad",
            SettingKey::Statuses => "Estados de Servicio",
            SettingKey::CiTypes => "Tipos de CI",
            SettingKey::CiStatuses => "Estados de CI",
            SettingKey::RequestTypes => "Tipos de Solicitud",
            SettingKey::AssignmentGroups => "Grupos de Asignación",
            SettingKey::Contacts => "Contactos / Personas",
        }
    }
}

impl fmt::Display for SettingKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Mutable named option lists consumed by the schema registry.
///
/// Each field carries its own serde default, so a persisted blob missing a
/// list (or the whole table) still loads with the fixed defaults filled in.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    #[serde(default = "default_criticalities")]
    pub criticalities: Vec<String>,
    #[serde(default = "default_statuses")]
    pub statuses: Vec<String>,
    #[serde(default = "default_ci_types")]
    pub ci_types: Vec<String>,
    #[serde(default = "default_ci_statuses")]
    pub ci_statuses: Vec<String>,
    #[serde(default = "default_request_types")]
    pub request_types: Vec<String>,
    #[serde(default = "default_assignment_groups")]
    pub assignment_groups: Vec<String>,
    #[serde(default = "default_contacts")]
    pub contacts: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn default_criticalities() -> Vec<String> {
    strings(&["Alta", "Media", "Baja", "Crítica", "Extrema"])
}

fn default_statuses() -> Vec<String> {
    strings(&["En Desarrollo", "Activo", "Inactivo", "Retirado"])
}

fn default_ci_types() -> Vec<String> {
    strings(&["Servidor", "Aplicación", "Red", "Base de Datos", "Hardware"])
}

fn default_ci_statuses() -> Vec<String> {
    strings(&["Operativo", "En Mantenimiento", "Fuera de Servicio"])
}

fn default_request_types() -> Vec<String> {
    strings(&["Solicitud de Servicio", "Info", "Acceso"])
}

fn default_assignment_groups() -> Vec<String> {
    strings(&["Mesa de Ayuda", "Infraestructura", "Desarrollo", "Seguridad"])
}

fn default_contacts() -> Vec<String> {
    strings(&["Admin", "Soporte", "Gerente IT"])
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            criticalities: default_criticalities(),
            statuses: default_statuses(),
            ci_types: default_ci_types(),
            ci_statuses: default_ci_statuses(),
            request_types: default_request_types(),
            assignment_groups: default_assignment_groups(),
            contacts: default_contacts(),
        }
    }
}

impl Settings {
    /// The option list for a key
    pub fn get(&self, key: SettingKey) -> &[String] {
        match key {
            SettingKey::Criticalities => &self.criticalities,
            SettingKey::Statuses => &self.statuses,
            SettingKey::CiTypes => &self.ci_types,
            SettingKey::CiStatuses => &self.ci_statuses,
            SettingKey::RequestTypes => &self.request_types,
            SettingKey::AssignmentGroups => &self.assignment_groups,
            SettingKey::Contacts => &self.contacts,
        }
    }

    fn list_mut(&mut self, key: SettingKey) -> &mut Vec<String> {
        match key {
            SettingKey::Criticalities => &mut self.criticalities,
            SettingKey::Statuses => &mut self.statuses,
            SettingKey::CiTypes => &mut self.ci_types,
            SettingKey::CiStatuses => &mut self.ci_statuses,
            SettingKey::RequestTypes => &mut self.request_types,
            SettingKey::AssignmentGroups => &mut self.assignment_groups,
            SettingKey::Contacts => &mut self.contacts,
        }
    }

    /// Replaces the option list wholesale
    pub fn set(&mut self, key: SettingKey, list: Vec<String>) {
        *self.list_mut(key) = list;
    }

    /// Appends a value unless the list already contains it.
    /// Returns whether the value was added.
    pub fn add_value(&mut self, key: SettingKey, value: &str) -> bool {
        let list = self.list_mut(key);
        if list.iter().any(|v| v == value) {
            return false;
        }
        list.push(value.to_string());
        true
    }

    /// Removes a value by equality rather than position, so a stale index
    /// can never delete the wrong entry. Returns whether anything was removed.
    pub fn remove_value(&mut self, key: SettingKey, value: &str) -> bool {
        let list = self.list_mut(key);
        let original_len = list.len();
        list.retain(|v| v != value);
        list.len() != original_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table() {
        let settings = Settings::default();
        assert_eq!(settings.get(SettingKey::Criticalities).len(), 5);
        assert_eq!(settings.get(SettingKey::Statuses)[1], "Activo");
        assert_eq!(settings.get(SettingKey::Contacts), ["Admin", "Soporte", "Gerente IT"]);
    }

    #[test]
    fn test_default_instances_do_not_share_state() {
        let mut a = Settings::default();
        let b = Settings::default();
        a.add_value(SettingKey::Contacts, "Legal");
        assert!(!b.contacts.contains(&"Legal".to_string()));
    }

    #[test]
    fn test_key_parse_round_trip() {
        for key in SettingKey::ALL {
            assert_eq!(SettingKey::parse(key.as_str()), Some(key));
        }
        assert_eq!(SettingKey::parse("colors"), None);
    }

    #[test]
    fn test_add_value_deduplicates() {
        let mut settings = Settings::default();
        assert!(settings.add_value(SettingKey::Contacts, "Legal"));
        assert!(!settings.add_value(SettingKey::Contacts, "Legal"));
        let legal_count = settings.contacts.iter().filter(|v| *v == "Legal").count();
        assert_eq!(legal_count, 1);
    }

    #[test]
    fn test_remove_value_by_equality() {
        let mut settings = Settings::default();
        assert!(settings.remove_value(SettingKey::Statuses, "Retirado"));
        assert_eq!(settings.statuses, ["En Desarrollo", "Activo", "Inactivo"]);
        assert!(!settings.remove_value(SettingKey::Statuses, "Retirado"));
    }

    #[test]
    fn test_set_replaces_wholesale() {
        let mut settings = Settings::default();
        settings.set(SettingKey::Criticalities, strings(&["Alta", "Baja"]));
        assert_eq!(settings.criticalities, ["Alta", "Baja"]);
    }

    #[test]
    fn test_missing_lists_get_defaults_on_load() {
        let settings: Settings = serde_json::from_str(r#"{"contacts":["Solo"]}"#).unwrap();
        assert_eq!(settings.contacts, ["Solo"]);
        assert_eq!(settings.statuses, default_statuses());
    }
}
