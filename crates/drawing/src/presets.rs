//! Keyword presets: `"keyword:expansion"` lines turned into a lookup table.

use aidraw_config::parse_preset_line;

/// Keyword to expansion table, rebuilt from config on every invocation.
///
/// Keywords keep the position of their first appearance; a duplicate line
/// replaces the expansion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PresetTable {
    entries: Vec<(String, String)>,
}

/// The prompt after preset lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPrompt {
    /// Set only when the input matched a keyword exactly.
    pub original_keyword: Option<String>,
    pub effective_text: String,
}

impl PresetTable {
    /// Build from config lines. Malformed lines are skipped.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut table = Self::default();
        for line in lines {
            if let Some((keyword, expansion)) = parse_preset_line(line.as_ref()) {
                table.insert(keyword, expansion);
            }
        }
        table
    }

    fn insert(&mut self, keyword: &str, expansion: &str) {
        match self.entries.iter_mut().find(|(k, _)| k == keyword) {
            Some(entry) => entry.1 = expansion.to_string(),
            None => self
                .entries
                .push((keyword.to_string(), expansion.to_string())),
        }
    }

    pub fn get(&self, keyword: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == keyword)
            .map(|(_, v)| v.as_str())
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact, case-sensitive lookup of the whole `text`.
    pub fn resolve(&self, text: &str) -> ResolvedPrompt {
        match self.get(text) {
            Some(expansion) => ResolvedPrompt {
                original_keyword: Some(text.to_string()),
                effective_text: expansion.to_string(),
            },
            None => ResolvedPrompt {
                original_keyword: None,
                effective_text: text.to_string(),
            },
        }
    }
}

/// Resolve `text` against freshly parsed preset lines.
pub fn resolve<S: AsRef<str>>(text: &str, preset_lines: &[S]) -> ResolvedPrompt {
    PresetTable::from_lines(preset_lines).resolve(text)
}
