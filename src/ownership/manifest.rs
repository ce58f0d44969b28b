//! BOTMETA-style ownership manifest.
//!
//! ```yaml
//! macros:
//!   team_net: alice bob
//!   net: lib/ansible/modules/network
//! files:
//!   $net/:
//!     maintainers: $team_net carol
//!     labels: [networking]
//!     support: community
//!   lib/ansible/cli/: dave
//! ```
//!
//! A file entry is either a string of maintainers or a mapping whose
//! `maintainers`, `labels`, `keywords` and `support` fields are lists or
//! whitespace-separated strings. `$name` tokens expand to macro values.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde_yaml::Value;

use crate::error::{Result, TriageError};

static MACRO_REF: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$([A-Za-z0-9_]+)").expect("valid macro regex"));

/// Ownership record for one manifest path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OwnershipEntry {
    pub path: String,
    pub maintainers: Vec<String>,
    pub labels: Vec<String>,
    pub keywords: Vec<String>,
    pub support: Vec<String>,
}

/// Entries in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    pub entries: Vec<OwnershipEntry>,
}

type Macros = BTreeMap<String, Vec<String>>;

impl Manifest {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .map_err(|e| TriageError::Manifest(format!("cannot read {}: {e}", path.display())))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        let doc: Value = serde_yaml::from_str(text)
            .map_err(|e| TriageError::Manifest(format!("invalid YAML: {e}")))?;

        let macros = match doc.get("macros") {
            Some(value) => parse_macros(value)?,
            None => Macros::new(),
        };

        let files = match doc.get("files") {
            Some(Value::Mapping(files)) => files,
            Some(Value::Null) | None => return Ok(Manifest::default()),
            Some(_) => {
                return Err(TriageError::Manifest(
                    "`files` must be a mapping of path to ownership".to_string(),
                ));
            }
        };

        let mut entries = Vec::with_capacity(files.len());
        for (key, value) in files {
            let Some(raw_path) = key.as_str() else {
                return Err(TriageError::Manifest(format!(
                    "file keys must be strings, got {key:?}"
                )));
            };
            let path = expand_path(raw_path, &macros);
            entries.push(parse_entry(path, value, &macros)?);
        }
        Ok(Manifest { entries })
    }
}

fn parse_macros(value: &Value) -> Result<Macros> {
    let Value::Mapping(map) = value else {
        return Err(TriageError::Manifest("`macros` must be a mapping".to_string()));
    };
    let mut macros = Macros::new();
    for (key, value) in map {
        let Some(name) = key.as_str() else { continue };
        macros.insert(name.to_string(), tokens(value));
    }
    Ok(macros)
}

fn parse_entry(path: String, value: &Value, macros: &Macros) -> Result<OwnershipEntry> {
    let mut entry = OwnershipEntry {
        path,
        ..OwnershipEntry::default()
    };
    match value {
        Value::Null => {}
        Value::String(_) | Value::Sequence(_) => {
            entry.maintainers = expand_tokens(tokens(value), macros);
        }
        Value::Mapping(_) => {
            let field = |name: &str| {
                value
                    .get(name)
                    .map(|v| expand_tokens(tokens(v), macros))
                    .unwrap_or_default()
            };
            entry.maintainers = field("maintainers");
            entry.labels = field("labels");
            entry.keywords = field("keywords");
            entry.support = field("support");
        }
        other => {
            return Err(TriageError::Manifest(format!(
                "{}: unsupported ownership value {other:?}",
                entry.path
            )));
        }
    }
    Ok(entry)
}

/// Flatten a scalar or list into tokens. Strings split on whitespace.
fn tokens(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => s.split_whitespace().map(str::to_string).collect(),
        Value::Number(n) => vec![n.to_string()],
        Value::Bool(b) => vec![b.to_string()],
        Value::Sequence(items) => items.iter().flat_map(tokens).collect(),
        _ => Vec::new(),
    }
}

/// Replace whole-token `$name` references with the macro's tokens.
fn expand_tokens(raw: Vec<String>, macros: &Macros) -> Vec<String> {
    let mut out = Vec::with_capacity(raw.len());
    for token in raw {
        match token.strip_prefix('$').and_then(|name| macros.get(name)) {
            Some(values) => out.extend(values.iter().cloned()),
            None => out.push(token),
        }
    }
    out
}

fn expand_path(raw: &str, macros: &Macros) -> String {
    MACRO_REF
        .replace_all(raw, |caps: &Captures| match macros.get(&caps[1]) {
            Some(values) => values.join(" "),
            None => {
                log::warn!("manifest path {raw:?} uses undefined macro ${}", &caps[1]);
                caps[0].to_string()
            }
        })
        .into_owned()
}

#[cfg(test)]
#[path = "manifest_test.rs"]
mod tests;
