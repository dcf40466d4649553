use std::collections::HashMap;

/// Built-in constants available in every session.
const BUILTIN: &[(&str, f64)] = &[
    ("pi", std::f64::consts::PI),
    ("e", std::f64::consts::E),
    ("tau", std::f64::consts::TAU),
];

/// Global constant table: `pi`, `e`, `tau` plus user-defined entries.
///
/// During evaluation constants take precedence over environment bindings of
/// the same name.
#[derive(Debug, Clone)]
pub struct Constants {
    values: HashMap<String, f64>,
}

impl Default for Constants {
    fn default() -> Self {
        Constants {
            values: BUILTIN
                .iter()
                .map(|&(name, value)| (name.to_string(), value))
                .collect(),
        }
    }
}

impl Constants {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.values.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// True for the predefined names that cannot be redefined or removed.
    pub fn is_builtin(name: &str) -> bool {
        BUILTIN.iter().any(|&(builtin, _)| builtin == name)
    }

    /// Define or overwrite a user constant. Rejects built-in names.
    pub fn set(&mut self, name: impl Into<String>, value: f64) -> bool {
        let name = name.into();
        if Self::is_builtin(&name) {
            return false;
        }
        self.values.insert(name, value);
        true
    }

    /// Remove a user constant, returns true if it existed.
    pub fn unset(&mut self, name: &str) -> bool {
        if Self::is_builtin(name) {
            return false;
        }
        self.values.remove(name).is_some()
    }

    /// All entries, sorted by name for deterministic output.
    pub fn list(&self) -> Vec<(&str, f64)> {
        let mut items: Vec<_> = self
            .values
            .iter()
            .map(|(name, value)| (name.as_str(), *value))
            .collect();
        items.sort_by_key(|&(name, _)| name);
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtins_are_present() {
        let constants = Constants::new();
        assert_eq!(constants.get("pi"), Some(std::f64::consts::PI));
        assert_eq!(constants.get("tau"), Some(std::f64::consts::TAU));
        assert!(constants.get("phi").is_none());
    }

    #[test]
    fn builtins_cannot_be_redefined() {
        let mut constants = Constants::new();
        assert!(!constants.set("pi", 3.0));
        assert_eq!(constants.get("pi"), Some(std::f64::consts::PI));
        assert!(!constants.unset("e"));
    }

    #[test]
    fn user_constants_round_trip() {
        let mut constants = Constants::new();
        assert!(constants.set("g", 9.81));
        assert_eq!(constants.get("g"), Some(9.81));
        assert!(constants.unset("g"));
        assert!(constants.get("g").is_none());
    }

    #[test]
    fn listing_is_sorted() {
        let mut constants = Constants::new();
        constants.set("g", 9.81);
        let names: Vec<&str> = constants.list().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["e", "g", "pi", "tau"]);
    }
}
