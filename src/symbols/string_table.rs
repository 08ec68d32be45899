use std::collections::TryReserveError;

/// Append-only list of string literals. The index handed out for a string is
/// its insertion order and never changes.
#[derive(Debug, Clone, Default)]
pub struct StringTable {
    strings: Vec<String>,
}

impl StringTable {
    pub fn new() -> Self {
        StringTable { strings: vec![] }
    }

    /// Takes ownership of `string` and returns its index.
    pub fn add(&mut self, string: String) -> Result<usize, TryReserveError> {
        self.strings.try_reserve(1)?;
        self.strings.push(string);
        Ok(self.strings.len() - 1)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(String::as_str)
    }
}
