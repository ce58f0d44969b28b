//! Cross-reference: which open PRs touch the paths each ownership key
//! claims. Pure functions over the forward and reverse indices.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::forward::ForwardIndex;
use crate::ownership::{KeyKind, OwnershipIndex, ReverseIndex};

/// Ownership key → PR URLs touching any of its paths.
pub type CrossReference = BTreeMap<String, BTreeSet<String>>;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CrossReferences {
    pub maintainer: CrossReference,
    pub label: CrossReference,
    pub keyword: CrossReference,
    pub support_level: CrossReference,
}

impl CrossReferences {
    pub fn get(&self, kind: KeyKind) -> &CrossReference {
        match kind {
            KeyKind::Maintainer => &self.maintainer,
            KeyKind::Label => &self.label,
            KeyKind::Keyword => &self.keyword,
            KeyKind::SupportLevel => &self.support_level,
        }
    }
}

/// PRs found under `path` in the file buckets and the directory buckets.
///
/// Manifest directories are written with a trailing slash (`lib/`) while
/// directory buckets are keyed without one (`lib`), so the slash is
/// stripped for the directory lookup.
pub fn paths_to_prs<'a>(
    paths: impl IntoIterator<Item = &'a String>,
    forward: &ForwardIndex,
) -> BTreeSet<String> {
    let mut prs = BTreeSet::new();
    for path in paths {
        if let Some(pulls) = forward.files.get(path) {
            prs.extend(pulls.iter().cloned());
        }
        if let Some(pulls) = forward.dirs.get(path) {
            prs.extend(pulls.iter().cloned());
        }
        let trimmed = path.trim_end_matches('/');
        if trimmed.len() != path.len()
            && let Some(pulls) = forward.dirs.get(trimmed)
        {
            prs.extend(pulls.iter().cloned());
        }
    }
    prs
}

/// Every key of `reverse` appears in the result, possibly with an empty set.
pub fn join(forward: &ForwardIndex, reverse: &ReverseIndex) -> CrossReference {
    reverse
        .iter()
        .map(|(key, paths)| (key.clone(), paths_to_prs(paths, forward)))
        .collect()
}

pub fn join_all(forward: &ForwardIndex, ownership: &OwnershipIndex) -> CrossReferences {
    CrossReferences {
        maintainer: join(forward, ownership.get(KeyKind::Maintainer)),
        label: join(forward, ownership.get(KeyKind::Label)),
        keyword: join(forward, ownership.get(KeyKind::Keyword)),
        support_level: join(forward, ownership.get(KeyKind::SupportLevel)),
    }
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
