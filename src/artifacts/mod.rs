//! Trained artifact loading
//!
//! Four artifacts are loaded at startup: a scaler and a model for each age
//! cohort. Scalers and pure-Rust models are JSON documents tagged by `kind`:
//!
//! ```json
//! {"kind": "standard", "columns": ["age", "income_lakhs"], "mean": [43.1, 23.0], "scale": [13.6, 22.4]}
//! {"kind": "linear", "columns": ["age", "..."], "coefficients": [0.3, "..."], "intercept": 5000.0}
//! ```
//!
//! With the `onnx` feature, a model path ending in `.onnx` is loaded through
//! the ONNX runtime instead.

mod linear;
#[cfg(feature = "onnx")]
mod onnx;
mod scaler;
mod tree;

pub use linear::LinearModel;
#[cfg(feature = "onnx")]
pub use onnx::OnnxModel;
pub use scaler::ScalerArtifact;
pub use tree::{Tree, TreeEnsemble, TreeNode};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::{ArtifactError, PredictError};
use crate::models::Cohort;
use crate::predictor::{Regressor, Scaler};

/// Default artifact directory (relative to the working directory)
pub const DEFAULT_MODEL_DIR: &str = "model";

/// Artifact role within a cohort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    Model,
    Scaler,
}

/// Location of the cohort artifacts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactConfig {
    pub model_dir: PathBuf,
    pub model_young: String,
    pub model_rest: String,
    pub scaler_young: String,
    pub scaler_rest: String,
}

impl Default for ArtifactConfig {
    fn default() -> Self {
        Self {
            model_dir: PathBuf::from(DEFAULT_MODEL_DIR),
            model_young: "model_young.json".to_string(),
            model_rest: "model_rest.json".to_string(),
            scaler_young: "scaler_young.json".to_string(),
            scaler_rest: "scaler_rest.json".to_string(),
        }
    }
}

impl ArtifactConfig {
    /// Config with default file names under `model_dir`
    pub fn with_model_dir<P: Into<PathBuf>>(model_dir: P) -> Self {
        Self {
            model_dir: model_dir.into(),
            ..Default::default()
        }
    }

    /// Full path of one artifact
    pub fn path(&self, cohort: Cohort, kind: ArtifactKind) -> PathBuf {
        let file = match (cohort, kind) {
            (Cohort::Young, ArtifactKind::Model) => &self.model_young,
            (Cohort::Rest, ArtifactKind::Model) => &self.model_rest,
            (Cohort::Young, ArtifactKind::Scaler) => &self.scaler_young,
            (Cohort::Rest, ArtifactKind::Scaler) => &self.scaler_rest,
        };
        self.model_dir.join(file)
    }
}

/// JSON model artifact
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelArtifact {
    Linear(LinearModel),
    TreeEnsemble(TreeEnsemble),
}

impl ModelArtifact {
    /// Check internal consistency (lengths, node references)
    pub fn validate(&self) -> Result<(), String> {
        match self {
            ModelArtifact::Linear(m) => m.validate(),
            ModelArtifact::TreeEnsemble(m) => m.validate(),
        }
    }
}

impl Regressor for ModelArtifact {
    fn columns(&self) -> &[String] {
        match self {
            ModelArtifact::Linear(m) => m.columns(),
            ModelArtifact::TreeEnsemble(m) => m.columns(),
        }
    }

    fn predict(&self, features: &[f64]) -> Result<f64, PredictError> {
        match self {
            ModelArtifact::Linear(m) => m.predict(features),
            ModelArtifact::TreeEnsemble(m) => m.predict(features),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ArtifactError> {
    let content = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ArtifactError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

fn invalid(path: &Path, reason: String) -> ArtifactError {
    ArtifactError::Invalid {
        path: path.to_path_buf(),
        reason,
    }
}

/// Load a scaler artifact
pub fn load_scaler<P: AsRef<Path>>(path: P) -> Result<Box<dyn Scaler>, ArtifactError> {
    let path = path.as_ref();
    info!("Loading scaler: {:?}", path);

    let scaler: ScalerArtifact = read_json(path)?;
    scaler.validate().map_err(|reason| invalid(path, reason))?;
    Ok(Box::new(scaler))
}

/// Load a model artifact, JSON or (with the `onnx` feature) ONNX
pub fn load_model<P: AsRef<Path>>(path: P) -> Result<Box<dyn Regressor>, ArtifactError> {
    let path = path.as_ref();
    info!("Loading model: {:?}", path);

    if path.extension().is_some_and(|ext| ext == "onnx") {
        return load_onnx_model(path);
    }

    let model: ModelArtifact = read_json(path)?;
    model.validate().map_err(|reason| invalid(path, reason))?;
    Ok(Box::new(model))
}

#[cfg(feature = "onnx")]
fn load_onnx_model(path: &Path) -> Result<Box<dyn Regressor>, ArtifactError> {
    // Column list lives next to the model: model_rest.onnx -> model_rest.columns.json
    let columns_path = path.with_extension("columns.json");
    let columns: Vec<String> = read_json(&columns_path)?;

    let model = OnnxModel::load(path, columns).map_err(|e| invalid(path, e.to_string()))?;
    Ok(Box::new(model))
}

#[cfg(not(feature = "onnx"))]
fn load_onnx_model(path: &Path) -> Result<Box<dyn Regressor>, ArtifactError> {
    Err(invalid(
        path,
        "ONNX models require the `onnx` feature".to_string(),
    ))
}

/// Check a column list against a parameter list of the same length
fn check_lengths(columns: &[String], name: &str, values: &[f64]) -> Result<(), String> {
    if columns.is_empty() {
        return Err("artifact declares no columns".to_string());
    }
    if values.len() != columns.len() {
        return Err(format!(
            "{} has {} values for {} columns",
            name,
            values.len(),
            columns.len()
        ));
    }
    Ok(())
}
