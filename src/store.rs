use crate::word::ControlWord;

/// One slot per 12-bit control-store address.
pub const DEFAULT_CAPACITY: usize = 4096;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("control store full: more than {limit} entries")]
    CapacityExceeded { limit: usize },
}

/// Ordered, append-only list of packed words, in input order.
#[derive(Debug, Clone)]
pub struct ControlStore {
    entries: Vec<ControlWord>,
    limit: usize,
}

impl Default for ControlStore {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ControlStore {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: Vec::new(),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn push(&mut self, word: ControlWord) -> Result<(), StoreError> {
        if self.entries.len() >= self.limit {
            return Err(StoreError::CapacityExceeded { limit: self.limit });
        }
        self.entries.push(word);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ControlWord] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ControlWord> {
        self.entries.iter()
    }
}

impl<'a> IntoIterator for &'a ControlStore {
    type Item = &'a ControlWord;
    type IntoIter = std::slice::Iter<'a, ControlWord>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
