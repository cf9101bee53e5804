use std::fs;
use std::path::{Path, PathBuf};

use log::{info, warn};
use ndarray::Array1;

use crate::error::{Result, VanguardError};

/// Persistent home of the weight vector.
///
/// `load` distinguishes "nothing stored yet" (`Ok(None)`, recoverable)
/// from "stored but unreadable" (`Err`).
pub trait WeightStore {
    fn load(&self) -> Result<Option<Array1<f64>>>;

    /// Overwrite whatever is stored with `weights`
    fn save(&mut self, weights: &Array1<f64>) -> Result<()>;
}

/// Plain text, one value per line
#[derive(Clone, Debug)]
pub struct TextWeightStore {
    path: PathBuf,
}

impl TextWeightStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        TextWeightStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WeightStore for TextWeightStore {
    fn load(&self) -> Result<Option<Array1<f64>>> {
        if !self.path.exists() {
            warn!("no stored weights at {}", self.path.display());
            return Ok(None);
        }
        let text = fs::read_to_string(&self.path)?;
        let mut weights = Vec::new();
        // Trailing blank lines are tolerated, interior ones are not
        for (idx, line) in text.trim_end().lines().enumerate() {
            let line = line.trim();
            let value = line.parse::<f64>().map_err(|_| VanguardError::MalformedWeights {
                line: idx + 1,
                content: line.to_string(),
            })?;
            weights.push(value);
        }
        info!("loaded {} weights from {}", weights.len(), self.path.display());
        Ok(Some(Array1::from(weights)))
    }

    fn save(&mut self, weights: &Array1<f64>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let body: String = weights.iter().map(|w| format!("{:.6}\n", w)).collect();
        fs::write(&self.path, body)?;
        Ok(())
    }
}

/// Binary snapshot of the weight vector
#[derive(Clone, Debug)]
pub struct BincodeWeightStore {
    path: PathBuf,
}

impl BincodeWeightStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        BincodeWeightStore { path: path.into() }
    }
}

impl WeightStore for BincodeWeightStore {
    fn load(&self) -> Result<Option<Array1<f64>>> {
        if !self.path.exists() {
            warn!("no stored weights at {}", self.path.display());
            return Ok(None);
        }
        let data = fs::read(&self.path)?;
        let weights: Array1<f64> = bincode::deserialize(&data)?;
        Ok(Some(weights))
    }

    fn save(&mut self, weights: &Array1<f64>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let serialized = bincode::serialize(weights)?;
        fs::write(&self.path, serialized)?;
        Ok(())
    }
}

/// In-process store; remembers the last save and how many happened
#[derive(Clone, Debug, Default)]
pub struct MemoryWeightStore {
    stored: Option<Array1<f64>>,
    saves: usize,
}

impl MemoryWeightStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: Array1<f64>) -> Self {
        MemoryWeightStore {
            stored: Some(weights),
            saves: 0,
        }
    }

    pub fn stored(&self) -> Option<&Array1<f64>> {
        self.stored.as_ref()
    }

    pub fn save_count(&self) -> usize {
        self.saves
    }
}

impl WeightStore for MemoryWeightStore {
    fn load(&self) -> Result<Option<Array1<f64>>> {
        Ok(self.stored.clone())
    }

    fn save(&mut self, weights: &Array1<f64>) -> Result<()> {
        self.stored = Some(weights.clone());
        self.saves += 1;
        Ok(())
    }
}
