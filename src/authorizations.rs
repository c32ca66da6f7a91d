// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use crate::*;

use alloc::collections::{BTreeMap, BTreeSet};

/// Granted labels, each mapped to `true`.
pub type LabelSet = BTreeMap<String, bool>;

/// Lookup of granted labels used during evaluation.
pub trait Authorizations {
    fn is_granted(&self, label: &str) -> bool;
}

impl Authorizations for BTreeMap<String, bool> {
    fn is_granted(&self, label: &str) -> bool {
        matches!(self.get(label), Some(true))
    }
}

impl Authorizations for BTreeSet<String> {
    fn is_granted(&self, label: &str) -> bool {
        self.contains(label)
    }
}

#[cfg(feature = "std")]
impl<S: core::hash::BuildHasher> Authorizations for std::collections::HashMap<String, bool, S> {
    fn is_granted(&self, label: &str) -> bool {
        matches!(self.get(label), Some(true))
    }
}

#[cfg(feature = "std")]
impl<S: core::hash::BuildHasher> Authorizations for std::collections::HashSet<String, S> {
    fn is_granted(&self, label: &str) -> bool {
        self.contains(label)
    }
}

impl Authorizations for [&str] {
    fn is_granted(&self, label: &str) -> bool {
        self.contains(&label)
    }
}

impl<A: Authorizations + ?Sized> Authorizations for &A {
    fn is_granted(&self, label: &str) -> bool {
        (**self).is_granted(label)
    }
}

/// Build a label set from a comma separated credential string.
///
/// Each item is trimmed, then one leading and one trailing `"` are removed
/// independently when present. Interior content is kept as is. Empty items
/// (from doubled or trailing commas) become the empty label.
pub fn build_label_set(csv: &str) -> LabelSet {
    let mut labels = LabelSet::new();
    for item in csv.split(',') {
        let item = item.trim();
        let item = item.strip_prefix('"').unwrap_or(item);
        let item = item.strip_suffix('"').unwrap_or(item);
        labels.insert(item.to_owned(), true);
    }
    labels
}
