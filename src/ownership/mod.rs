//! Ownership index: the manifest inverted into one reverse index per
//! key type (maintainer, label, keyword, support level).

pub mod manifest;

use std::collections::BTreeMap;

use serde::Serialize;

pub use manifest::{Manifest, OwnershipEntry};

/// Ownership key → manifest paths declared under it, in manifest order.
pub type ReverseIndex = BTreeMap<String, Vec<String>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyKind {
    Maintainer,
    Label,
    Keyword,
    SupportLevel,
}

impl KeyKind {
    pub const ALL: [KeyKind; 4] = [
        KeyKind::Maintainer,
        KeyKind::Label,
        KeyKind::Keyword,
        KeyKind::SupportLevel,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            KeyKind::Maintainer => "maintainer",
            KeyKind::Label => "label",
            KeyKind::Keyword => "keyword",
            KeyKind::SupportLevel => "support_level",
        }
    }

    fn values<'a>(&self, entry: &'a OwnershipEntry) -> &'a [String] {
        match self {
            KeyKind::Maintainer => &entry.maintainers,
            KeyKind::Label => &entry.labels,
            KeyKind::Keyword => &entry.keywords,
            KeyKind::SupportLevel => &entry.support,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OwnershipIndex {
    pub maintainer: ReverseIndex,
    pub label: ReverseIndex,
    pub keyword: ReverseIndex,
    pub support_level: ReverseIndex,
}

impl OwnershipIndex {
    pub fn build(manifest: &Manifest) -> Self {
        let mut index = OwnershipIndex::default();
        for kind in KeyKind::ALL {
            let reverse = index.get_mut(kind);
            for entry in &manifest.entries {
                for key in kind.values(entry) {
                    let paths = reverse.entry(key.clone()).or_default();
                    if !paths.contains(&entry.path) {
                        paths.push(entry.path.clone());
                    }
                }
            }
        }
        log::debug!(
            "ownership index: {} maintainers, {} labels, {} keywords, {} support levels",
            index.maintainer.len(),
            index.label.len(),
            index.keyword.len(),
            index.support_level.len()
        );
        index
    }

    pub fn get(&self, kind: KeyKind) -> &ReverseIndex {
        match kind {
            KeyKind::Maintainer => &self.maintainer,
            KeyKind::Label => &self.label,
            KeyKind::Keyword => &self.keyword,
            KeyKind::SupportLevel => &self.support_level,
        }
    }

    fn get_mut(&mut self, kind: KeyKind) -> &mut ReverseIndex {
        match kind {
            KeyKind::Maintainer => &mut self.maintainer,
            KeyKind::Label => &mut self.label,
            KeyKind::Keyword => &mut self.keyword,
            KeyKind::SupportLevel => &mut self.support_level,
        }
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
