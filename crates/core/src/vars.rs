//! Session variables consulted by the RA workflows.

/// Seeds present in every new session, in this order.
pub const DEFAULT_VARIABLES: [(&str, &str); 3] = [
    ("ra_host", "air"),
    ("ra_port", "8000"),
    ("ra_uri", "/nk_service"),
];

/// String variables kept in insertion order.
///
/// Setting an existing name overwrites it where it stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionVars {
    entries: Vec<(String, String)>,
}

impl Default for SessionVars {
    fn default() -> Self {
        let mut vars = Self {
            entries: Vec::with_capacity(DEFAULT_VARIABLES.len()),
        };
        for (name, value) in DEFAULT_VARIABLES {
            vars.set(name, value);
        }
        vars
    }
}

impl SessionVars {
    /// Creates a store seeded with [`DEFAULT_VARIABLES`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites `name` and returns the stored value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) -> &str {
        let name = name.into();
        let value = value.into();
        let pos = match self.entries.iter().position(|(n, _)| *n == name) {
            Some(pos) => {
                self.entries[pos].1 = value;
                pos
            }
            None => {
                self.entries.push((name, value));
                self.entries.len() - 1
            }
        };
        &self.entries[pos].1
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// All variables in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_defaults() {
        let vars = SessionVars::new();
        let all: Vec<_> = vars.iter().collect();
        assert_eq!(
            all,
            vec![("ra_host", "air"), ("ra_port", "8000"), ("ra_uri", "/nk_service")]
        );
    }

    #[test]
    fn test_overwrite_in_place() {
        let mut vars = SessionVars::new();
        assert_eq!(vars.set("ra_host", "foo"), "foo");
        assert_eq!(vars.len(), 3);
        assert_eq!(vars.get("ra_host"), Some("foo"));
        assert_eq!(vars.iter().next(), Some(("ra_host", "foo")));
    }

    #[test]
    fn test_new_name_appends() {
        let mut vars = SessionVars::new();
        vars.set("uid", "alice");
        assert_eq!(vars.iter().last(), Some(("uid", "alice")));
        assert_eq!(vars.get("missing"), None);
    }
}
