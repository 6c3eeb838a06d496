//! Name-based allow-listing.
//!
//! Character and item atlases only keep sprites a data table refers to; the
//! world atlas only keeps tiles its renderer actually names. Both sources end
//! up as an [`AllowSet`] applied by [`filter`].

mod allow_list;
mod used_names;

use std::collections::BTreeSet;

use crate::sprite::Named;

pub use allow_list::{parse_allow_list, read_allow_list, AllowListSource};
pub use used_names::{SourceScanProvider, UsedNameProvider, STRING_NAME_PATTERN};

/// A set of sprite names permitted into an atlas.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AllowSet {
    names: BTreeSet<String>,
}

impl AllowSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>) -> bool {
        self.names.insert(name.into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Names in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn union(&mut self, other: AllowSet) {
        self.names.extend(other.names);
    }
}

impl<S: Into<String>> FromIterator<S> for AllowSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// Keep only items named in `allow` when `enabled`; pass everything otherwise.
///
/// Order is preserved and items are never modified.
pub fn filter<T: Named>(items: Vec<T>, allow: &AllowSet, enabled: bool) -> Vec<T> {
    if !enabled {
        return items;
    }
    items
        .into_iter()
        .filter(|item| allow.contains(item.name()))
        .collect()
}

/// Like [`filter`], with `None` meaning no filtering at all.
pub fn filter_optional<T: Named>(items: Vec<T>, allow: Option<&AllowSet>) -> Vec<T> {
    match allow {
        Some(set) => filter(items, set, true),
        None => items,
    }
}
