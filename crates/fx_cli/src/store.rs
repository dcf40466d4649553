//! File-backed storage for named functions (`$name` references).
//!
//! One JSON document per function; the body and the captured default
//! bindings are stored as rendered expression text and reparsed on load.

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context};
use fx_ast::Expr;
use fx_engine::{Environment, FunctionSource, LoadedFunction};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
struct StoredFunction {
    body: String,
    #[serde(default)]
    defaults: BTreeMap<String, String>,
}

pub struct FunctionStore {
    dir: PathBuf,
}

fn valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl FunctionStore {
    /// Open the store in the platform data directory.
    pub fn open() -> std::io::Result<Self> {
        let dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fx")
            .join("functions");
        fs::create_dir_all(&dir)?;
        Ok(FunctionStore { dir })
    }

    /// Open a store rooted at an explicit directory.
    pub fn with_dir(dir: PathBuf) -> std::io::Result<Self> {
        fs::create_dir_all(&dir)?;
        Ok(FunctionStore { dir })
    }

    fn file(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    pub fn save(&self, name: &str, body: &Expr, defaults: &Environment) -> anyhow::Result<()> {
        if !valid_name(name) {
            bail!("invalid function name '{}'", name);
        }
        let stored = StoredFunction {
            body: body.to_string(),
            defaults: defaults
                .list()
                .into_iter()
                .map(|(key, expr)| (key.to_string(), expr.to_string()))
                .collect(),
        };
        let json = serde_json::to_string_pretty(&stored)?;
        fs::write(self.file(name), json)
            .with_context(|| format!("writing function '{}'", name))?;
        Ok(())
    }

    /// Remove a stored function, returns true if it existed.
    pub fn remove(&self, name: &str) -> bool {
        valid_name(name) && fs::remove_file(self.file(name)).is_ok()
    }

    pub fn contains(&self, name: &str) -> bool {
        valid_name(name) && self.file(name).exists()
    }

    /// Names of all stored functions, sorted.
    pub fn list(&self) -> Vec<String> {
        let Ok(entries) = fs::read_dir(&self.dir) else {
            return Vec::new();
        };
        let mut names: Vec<String> = entries
            .filter_map(|entry| {
                let path = entry.ok()?.path();
                if path.extension()? != "json" {
                    return None;
                }
                Some(path.file_stem()?.to_str()?.to_string())
            })
            .collect();
        names.sort();
        names
    }
}

impl FunctionSource for FunctionStore {
    // Any defect (missing file, bad JSON, unparsable body) reads as "not
    // found"; the evaluator turns that into NaN.
    fn load(&self, name: &str) -> Option<LoadedFunction> {
        if !valid_name(name) {
            return None;
        }
        let content = fs::read_to_string(self.file(name)).ok()?;
        let stored: StoredFunction = serde_json::from_str(&content).ok()?;
        let body = fx_parser::parse(&stored.body).ok()?;
        let mut defaults = Environment::new();
        for (key, text) in &stored.defaults {
            defaults.set(key.clone(), fx_parser::parse(text).ok()?);
        }
        Some(LoadedFunction { body, defaults })
    }
}
