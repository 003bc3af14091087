//! PGN tag pairs, kept in insertion order.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The seven-tag roster, in the order PGN requires.
pub const SEVEN_TAG_ROSTER: [&str; 7] = ["Event", "Site", "Date", "Round", "White", "Black", "Result"];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tags(Vec<(String, String)>);

impl Tags {
    #[must_use]
    pub fn new() -> Self {
        Tags(Vec::new())
    }

    /// Default roster for a fresh game.
    #[must_use]
    pub fn seven_tag_roster() -> Self {
        let mut tags = Tags::new();
        for (key, value) in [
            ("Event", "?"),
            ("Site", "?"),
            ("Date", "????.??.??"),
            ("Round", "?"),
            ("White", "White"),
            ("Black", "Black"),
            ("Result", "*"),
        ] {
            tags.set(key, value);
        }
        tags
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Replace an existing value in place, or append.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.0.push((key, value)),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let idx = self.0.iter().position(|(k, _)| k == key)?;
        Some(self.0.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_replaces_in_place() {
        let mut tags = Tags::seven_tag_roster();
        tags.set("White", "Carlsen");
        tags.set("ECO", "C20");
        assert_eq!(tags.get("White"), Some("Carlsen"));
        let keys: Vec<&str> = tags.iter().map(|(k, _)| k).collect();
        assert_eq!(keys[4], "White");
        assert_eq!(keys[7], "ECO");
        assert_eq!(tags.remove("ECO").as_deref(), Some("C20"));
        assert_eq!(tags.len(), 7);
    }
}
