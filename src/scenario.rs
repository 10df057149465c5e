//! A [Scenario] bundles everything needed to run an experiment, and can be read from a JSON file.

use crate::composition::Composition;
use crate::experiment::Experiment;
use crate::hat::Hat;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub hat: Composition,

    #[serde(default)]
    pub expected: Composition,

    pub draws: usize,

    pub trials: u64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}
impl Scenario {
    /// Reads a JSON-encoded scenario from the given file `path`.
    pub fn read_json_file(path: impl AsRef<Path>) -> Result<Self, io::Error> {
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn hat(&self) -> Hat {
        Hat::new(&self.hat)
    }

    pub fn experiment(&self) -> Experiment {
        Experiment::default()
            .with_expected(&self.expected)
            .with_draws(self.draws)
            .with_trials(self.trials)
    }
}
