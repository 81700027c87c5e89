use std::collections::HashSet;

/// Filler identities agents invent when they have no real insider data.
pub const BUILTIN_PLACEHOLDER_NAMES: &[&str] = &["john doe", "jane smith", "alice johnson"];

/// Set of names treated as fabricated. Matching is on the trimmed,
/// lowercased name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderNames {
    names: HashSet<String>,
}

impl Default for PlaceholderNames {
    fn default() -> Self {
        Self {
            names: BUILTIN_PLACEHOLDER_NAMES.iter().map(|n| n.to_string()).collect(),
        }
    }
}

impl PlaceholderNames {
    /// Empty set; only blank names are rejected.
    pub fn none() -> Self {
        Self { names: HashSet::new() }
    }

    /// Built-in names plus `extra`. Blank entries are ignored.
    pub fn with_extra<I, S>(extra: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        set.extend(extra);
        set
    }

    pub fn extend<I, S>(&mut self, extra: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.names.extend(
            extra
                .into_iter()
                .map(|n| normalize(n.as_ref()))
                .filter(|n| !n.is_empty()),
        );
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// True when `name` is blank or a known placeholder.
    pub fn rejects(&self, name: &str) -> bool {
        let name = normalize(name);
        name.is_empty() || self.names.contains(&name)
    }
}

fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}
