//! The flat output map.

use alloc::{
    boxed::Box,
    collections::{BTreeMap, btree_map},
    string::String,
    sync::Arc,
};
use core::iter::FusedIterator;

/// The text of a leaf, or `None` when its span could not be extracted.
pub type FlatValue = Option<Box<str>>;

/// Dotted paths mapped to leaf text.
///
/// Every distinct key text is stored as exactly one `Arc<str>`, which the
/// projector reuses for all later keys with the same text. Entries iterate in
/// key order. Dropping the map releases every key and value.
///
/// ```rust
/// let map = jsonflat::parse_json(r#"{"a":{"b":1},"c":"x"}"#).unwrap();
/// assert_eq!(map.get_text("a.b"), Some("1"));
/// assert_eq!(map.keys().collect::<Vec<_>>(), ["a.b", "c"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FlatMap {
    entries: BTreeMap<Arc<str>, FlatValue>,
}

impl FlatMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `value` at `key` and returns the previous value, if any.
    ///
    /// When the key is already present its stored instance is kept.
    pub fn put(&mut self, key: Arc<str>, value: FlatValue) -> Option<FlatValue> {
        self.entries.insert(key, value)
    }

    /// Returns the stored key instance whose text equals `text`.
    #[must_use]
    pub fn existing_key(&self, text: &str) -> Option<&Arc<str>> {
        self.entries.get_key_value(text).map(|(key, _)| key)
    }

    /// Resolves `candidate` to the key instance to use: the stored one when
    /// an equal key exists (dropping `candidate`), otherwise `candidate`
    /// itself.
    #[must_use]
    pub fn intern(&self, candidate: String) -> Arc<str> {
        match self.existing_key(&candidate) {
            Some(existing) => Arc::clone(existing),
            None => Arc::from(candidate),
        }
    }

    /// Looks up a key. The outer `Option` tells whether the key exists, the
    /// inner one whether it has text.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<Option<&str>> {
        self.entries.get(key).map(Option::as_deref)
    }

    /// Looks up the text stored at `key`, treating null values as absent.
    #[must_use]
    pub fn get_text(&self, key: &str) -> Option<&str> {
        self.get(key).flatten()
    }

    /// Whether `key` is present, with or without text.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(key, value)` in key order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_> {
        Iter(self.entries.iter())
    }

    /// Iterates over the keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(AsRef::as_ref)
    }

    /// Releases every entry, keeping the map usable.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Consumes the map, handing ownership of every key and value to the
    /// caller.
    #[must_use]
    pub fn into_entries(self) -> IntoIter {
        IntoIter(self.entries.into_iter())
    }
}

/// Borrowing iterator returned by [`FlatMap::iter`].
#[derive(Debug, Clone)]
pub struct Iter<'a>(btree_map::Iter<'a, Arc<str>, FlatValue>);

impl<'a> Iterator for Iter<'a> {
    type Item = (&'a str, Option<&'a str>);

    fn next(&mut self) -> Option<Self::Item> {
        self.0
            .next()
            .map(|(key, value)| (key.as_ref(), value.as_deref()))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for Iter<'_> {}
impl FusedIterator for Iter<'_> {}

/// Owning iterator returned by [`FlatMap::into_entries`].
#[derive(Debug)]
pub struct IntoIter(btree_map::IntoIter<Arc<str>, FlatValue>);

impl Iterator for IntoIter {
    type Item = (Arc<str>, FlatValue);

    fn next(&mut self) -> Option<Self::Item> {
        self.0.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.0.size_hint()
    }
}

impl ExactSizeIterator for IntoIter {}
impl FusedIterator for IntoIter {}

impl IntoIterator for FlatMap {
    type Item = (Arc<str>, FlatValue);
    type IntoIter = IntoIter;

    fn into_iter(self) -> IntoIter {
        self.into_entries()
    }
}

impl<'a> IntoIterator for &'a FlatMap {
    type Item = (&'a str, Option<&'a str>);
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        self.iter()
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for FlatMap {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter())
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn put_keeps_the_first_key_instance() {
        let mut map = FlatMap::new();
        let first: Arc<str> = Arc::from("a.b");
        assert_eq!(map.put(Arc::clone(&first), Some("1".into())), None);

        let second: Arc<str> = Arc::from("a.b");
        assert_eq!(map.put(second, Some("2".into())), Some(Some("1".into())));

        let stored = map.existing_key("a.b").unwrap();
        assert!(Arc::ptr_eq(stored, &first));
        assert_eq!(map.get_text("a.b"), Some("2"));
    }

    #[test]
    fn intern_reuses_stored_keys() {
        let mut map = FlatMap::new();
        map.put(Arc::from("x"), None);

        let interned = map.intern(String::from("x"));
        assert!(Arc::ptr_eq(&interned, map.existing_key("x").unwrap()));

        let fresh = map.intern(String::from("y"));
        assert_eq!(&*fresh, "y");
        assert!(map.existing_key("y").is_none());
    }

    #[test]
    fn null_values_are_present_without_text() {
        let mut map = FlatMap::new();
        map.put(Arc::from("k"), None);
        assert!(map.contains_key("k"));
        assert_eq!(map.get("k"), Some(None));
        assert_eq!(map.get_text("k"), None);
        assert_eq!(map.get("missing"), None);
    }

    #[test]
    fn iterates_in_key_order_and_releases_on_clear() {
        let mut map = FlatMap::new();
        map.put(Arc::from("b"), Some("2".into()));
        map.put(Arc::from("a"), Some("1".into()));
        map.put(Arc::from("c"), None);

        let entries: Vec<_> = map.iter().collect();
        assert_eq!(entries, [("a", Some("1")), ("b", Some("2")), ("c", None)]);
        assert_eq!(map.iter().len(), 3);

        let owned: Vec<_> = map.clone().into_entries().map(|(k, _)| k).collect();
        assert_eq!(owned.iter().map(|k| &**k).collect::<Vec<_>>(), ["a", "b", "c"]);

        map.clear();
        assert!(map.is_empty());
    }
}
