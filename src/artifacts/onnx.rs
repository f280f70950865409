//! ONNX model backed by the ONNX runtime

use ort::{
    session::{builder::GraphOptimizationLevel, Session},
    value::Tensor,
};
use std::path::Path;
use std::sync::Mutex;
use tracing::info;

use crate::error::PredictError;
use crate::predictor::Regressor;

/// Regression model exported to ONNX (single row in, single value out)
pub struct OnnxModel {
    // Session::run needs exclusive access
    session: Mutex<Session>,
    input_name: String,
    columns: Vec<String>,
}

impl OnnxModel {
    /// Load an ONNX model trained on `columns`
    pub fn load<P: AsRef<Path>>(
        model_path: P,
        columns: Vec<String>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let model_path = model_path.as_ref();

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .commit_from_file(model_path)?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or("ONNX model declares no inputs")?;

        info!(
            "Loaded ONNX model {:?} (input '{}', {} columns)",
            model_path,
            input_name,
            columns.len()
        );

        Ok(Self {
            session: Mutex::new(session),
            input_name,
            columns,
        })
    }
}

impl Regressor for OnnxModel {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn predict(&self, features: &[f64]) -> Result<f64, PredictError> {
        let inference = |e: ort::Error| PredictError::Inference(e.to_string());

        let input_vec: Vec<f32> = features.iter().map(|&x| x as f32).collect();
        let input_tensor =
            Tensor::from_array(([1usize, features.len()], input_vec)).map_err(inference)?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| PredictError::Inference("ONNX session lock poisoned".to_string()))?;
        let outputs = session
            .run(ort::inputs![self.input_name.as_str() => input_tensor])
            .map_err(inference)?;

        let (_, output_data) = outputs[0].try_extract_tensor::<f32>().map_err(inference)?;
        let value = output_data.first().map(|&v| v as f64);

        value.ok_or_else(|| PredictError::Inference("ONNX model produced no output".to_string()))
    }
}
