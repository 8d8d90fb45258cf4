use log::info;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use crate::error::{IoContext, Result};
use crate::index::DatasetIndex;
use crate::types::Split;

#[derive(Debug, Serialize, Deserialize)]
struct SplitRow {
    #[serde(rename = "ID")]
    id: String,
    split: String,
}

/// Externally decided mapping from record id to train/val/test.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitAssignment {
    splits: HashMap<String, Split>,
}

impl SplitAssignment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, split: Split) {
        self.splits.insert(id.into(), split);
    }

    pub fn get(&self, id: &str) -> Option<Split> {
        self.splits.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.splits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.splits.is_empty()
    }

    /// Number of ids assigned to each split.
    pub fn counts(&self) -> BTreeMap<Split, usize> {
        let mut counts = BTreeMap::new();
        for split in self.splits.values() {
            *counts.entry(*split).or_insert(0) += 1;
        }
        counts
    }

    /// Load an assignment from a CSV file with `ID,split` columns.
    pub fn load_csv(path: &Path) -> Result<Self> {
        let mut reader = csv::Reader::from_path(path)?;
        let mut assignment = Self::new();
        for row in reader.deserialize::<SplitRow>() {
            let row = row?;
            assignment.insert(row.id, row.split.parse()?);
        }
        info!(
            "Loaded split assignment for {} ids from {}",
            assignment.len(),
            path.display()
        );
        Ok(assignment)
    }

    /// Write the assignment as `ID,split` rows, sorted by id.
    pub fn write_csv(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_path(parent)?;
        }
        let file = File::create(path).with_path(path)?;
        let mut writer = csv::Writer::from_writer(BufWriter::new(file));
        let sorted: BTreeMap<_, _> = self.splits.iter().collect();
        for (id, split) in sorted {
            writer.serialize(SplitRow {
                id: id.clone(),
                split: split.to_string(),
            })?;
        }
        writer.flush().with_path(path)?;
        Ok(())
    }

    /// Shuffle the index ids with a fixed seed and cut them into splits.
    ///
    /// The test share is taken first, then the validation share; both are
    /// rounded up. Everything left over is training data.
    pub fn random(index: &DatasetIndex, val_size: f32, test_size: f32, seed: u64) -> Self {
        let mut ids: Vec<&str> = index.records().iter().map(|r| r.id.as_str()).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        ids.shuffle(&mut rng);

        let test_count = ((ids.len() as f32 * test_size).ceil() as usize).min(ids.len());
        let val_count = ((ids.len() as f32 * val_size).ceil() as usize).min(ids.len() - test_count);

        let mut assignment = Self::new();
        for (position, id) in ids.into_iter().enumerate() {
            let split = if position < test_count {
                Split::Test
            } else if position < test_count + val_count {
                Split::Val
            } else {
                Split::Train
            };
            assignment.insert(id, split);
        }
        assignment
    }
}
