use std::collections::HashMap;

use crate::index::DatasetIndex;

/// Integer encoding of class labels, ids assigned from 0 in list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassEncoding {
    names: Vec<String>,
    ids: HashMap<String, usize>,
}

impl ClassEncoding {
    /// Use an ordered label list. Repeated labels keep their first id.
    pub fn from_labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut encoding = Self::default();
        for label in labels {
            let label = label.into();
            if !encoding.ids.contains_key(&label) {
                encoding.ids.insert(label.clone(), encoding.names.len());
                encoding.names.push(label);
            }
        }
        encoding
    }

    /// Encode the labels found in the index, sorted alphabetically.
    pub fn from_index(index: &DatasetIndex) -> Self {
        Self::from_labels(index.class_labels())
    }

    pub fn encode(&self, label: &str) -> Option<usize> {
        self.ids.get(label).copied()
    }

    /// Labels ordered by id.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
