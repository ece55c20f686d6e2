//! Fragment accumulation.
//!
//! Every clause of a cell contributes a fragment. Fragments are folded in
//! clause order into an ordered multimap: a key seen for the first time is
//! inserted, a repeated key gets its value appended. Values are joined with
//! `"; "` only when the accumulator is turned into the final [`Tags`], so the
//! merge itself never deals with string formatting.

use super::tags::{Fragment, TagKey};
use crate::Tags;

#[derive(Debug, Default, Clone)]
pub(crate) struct TagAccumulator {
    entries: Vec<(TagKey, Vec<String>)>,
}

impl TagAccumulator {
    pub fn push(&mut self, key: TagKey, value: String) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    pub fn extend(&mut self, fragment: Fragment) {
        for (key, value) in fragment {
            self.push(key, value);
        }
    }

    /// Values recorded for `key`, in encounter order.
    #[cfg(test)]
    pub fn values(&self, key: TagKey) -> &[String] {
        self.entries.iter().find(|(k, _)| *k == key).map(|(_, values)| values.as_slice()).unwrap_or(&[])
    }

    pub fn into_tags(self) -> Tags {
        self.entries.into_iter().map(|(key, values)| (key.as_str().to_string(), values.join("; "))).collect()
    }
}
