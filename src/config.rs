use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HatError, Result};
use crate::hat::DEFAULT_MAX_RESTARTS;

/// Everything a run needs. Missing keys in a settings file fall back to the
/// defaults below.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// first n of the probability sweep
    pub n_min: usize,
    /// sweep stops before this n
    pub n_max: usize,
    /// draws per n
    pub trials: u64,
    /// n for the per-permutation table
    pub n: usize,
    pub seed: Option<u64>,
    pub max_restarts: u64,
    /// exact probabilities (json output and log) for n up to this
    pub exact_up_to: usize,
    pub confidence: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            n_min: 4,
            n_max: 10,
            trials: 1_000_000,
            n: 3,
            seed: None,
            max_restarts: DEFAULT_MAX_RESTARTS,
            exact_up_to: 7,
            confidence: 0.95,
        }
    }
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| HatError::Config(e.to_string()))
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let mut buf = String::new();
        File::open(path)
            .and_then(|mut file| file.read_to_string(&mut buf))
            .map_err(|e| HatError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&buf)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string(self).map_err(|e| HatError::Config(e.to_string()))
    }

    /// Checks everything, as if both the sweep and the table will run.
    pub fn validate(&self) -> Result<()> {
        self.validate_common()?;
        self.validate_sweep()?;
        self.validate_stats()
    }

    pub fn validate_common(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(HatError::invalid("trials must be positive"));
        }
        if !(self.confidence > 0.0 && self.confidence < 1.0) {
            return Err(HatError::invalid(format!(
                "confidence must lie in (0, 1), got {}",
                self.confidence
            )));
        }
        Ok(())
    }

    pub fn validate_sweep(&self) -> Result<()> {
        if self.n_min >= self.n_max {
            return Err(HatError::invalid(format!(
                "empty sweep range [{}, {})",
                self.n_min, self.n_max
            )));
        }
        if self.n_min < 2 {
            return Err(HatError::invalid(format!(
                "sweep must start at n >= 2, got {}",
                self.n_min
            )));
        }
        Ok(())
    }

    pub fn validate_stats(&self) -> Result<()> {
        if self.n < 2 {
            return Err(HatError::invalid(format!(
                "draw stats need n >= 2, got {}",
                self.n
            )));
        }
        Ok(())
    }
}
