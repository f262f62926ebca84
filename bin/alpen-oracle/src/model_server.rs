//! Inference through a REST model server.
//!
//! Speaks the TensorFlow Serving REST dialect: `GET /v1/models/{name}` for
//! readiness and `POST /v1/models/{name}:predict` with `{"instances": [...]}`.
//! Each instance is one batch element, so the leading batch axis is implied.

use std::time::Duration;

use alpen_oracle_perception::{InferenceBackend, PerceptionError, PerceptionResult, Tensor};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::*;

use crate::config::ModelServerConfig;

#[derive(Debug)]
pub(crate) struct ModelServerBackend {
    client: Client,
    model_url: String,
}

#[derive(Debug, Deserialize)]
struct ModelStatus {
    #[serde(default)]
    model_version_status: Vec<VersionStatus>,
}

#[derive(Debug, Deserialize)]
struct VersionStatus {
    #[serde(default)]
    version: String,
    state: String,
}

#[derive(Debug, Deserialize)]
struct Predictions {
    predictions: Value,
}

impl ModelServerBackend {
    pub(crate) fn new(config: &ModelServerConfig) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            model_url: format!(
                "{}/v1/models/{}",
                config.url.trim_end_matches('/'),
                config.model_name
            ),
        })
    }

    /// Succeeds once some version of the model reports `AVAILABLE`.
    pub(crate) fn probe(&self) -> PerceptionResult<()> {
        let unavailable = |e: String| PerceptionError::InferenceUnavailable(e);
        let resp = self
            .client
            .get(&self.model_url)
            .send()
            .map_err(|e| unavailable(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(unavailable(format!("status {}", resp.status())));
        }

        let status: ModelStatus = resp.json().map_err(|e| unavailable(e.to_string()))?;
        match status
            .model_version_status
            .iter()
            .find(|v| v.state == "AVAILABLE")
        {
            Some(v) => {
                info!(url = %self.model_url, version = %v.version, "model server ready");
                Ok(())
            }
            None => Err(unavailable("no model version is available".to_owned())),
        }
    }
}

impl InferenceBackend for ModelServerBackend {
    fn invoke(&self, input: &Tensor) -> PerceptionResult<Tensor> {
        let instances = match input.shape() {
            [_, inner @ ..] => {
                let per_instance = inner.iter().product::<usize>();
                if per_instance == 0 {
                    Vec::new()
                } else {
                    input
                        .data()
                        .chunks(per_instance)
                        .map(|chunk| nest(inner, chunk))
                        .collect()
                }
            }
            [] => return Err(PerceptionError::Inference("scalar input tensor".to_owned())),
        };

        let resp = self
            .client
            .post(format!("{}:predict", self.model_url))
            .json(&json!({ "instances": instances }))
            .send()
            .map_err(|e| PerceptionError::InferenceUnavailable(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(PerceptionError::Inference(format!(
                "model server answered {}",
                resp.status()
            )));
        }

        let body: Predictions = resp
            .json()
            .map_err(|e| PerceptionError::Inference(e.to_string()))?;
        let (shape, data) = flatten(&body.predictions).map_err(PerceptionError::Inference)?;
        trace!(?shape, "received predictions");
        Tensor::new(shape, data)
    }
}

/// Nests row-major `data` into JSON arrays following `shape`.
fn nest(shape: &[usize], data: &[f32]) -> Value {
    match shape {
        [] => json!(data.first().copied().unwrap_or_default()),
        [_] => json!(data),
        [_, inner @ ..] => {
            let stride = inner.iter().product::<usize>().max(1);
            Value::Array(data.chunks(stride).map(|c| nest(inner, c)).collect())
        }
    }
}

/// Flattens rectangular nested JSON arrays into a shape and row-major data.
fn flatten(value: &Value) -> Result<(Vec<usize>, Vec<f32>), String> {
    let mut data = Vec::new();
    let shape = flatten_into(value, &mut data)?;
    Ok((shape, data))
}

fn flatten_into(value: &Value, out: &mut Vec<f32>) -> Result<Vec<usize>, String> {
    match value {
        Value::Number(n) => {
            let v = n.as_f64().ok_or_else(|| format!("non-finite number {n}"))?;
            out.push(v as f32);
            Ok(Vec::new())
        }
        Value::Array(items) => {
            let mut inner: Option<Vec<usize>> = None;
            for item in items {
                let shape = flatten_into(item, out)?;
                match &inner {
                    Some(expected) if *expected != shape => {
                        return Err(format!("ragged predictions: {expected:?} vs {shape:?}"))
                    }
                    Some(_) => {}
                    None => inner = Some(shape),
                }
            }
            let mut shape = vec![items.len()];
            shape.extend(inner.unwrap_or_default());
            Ok(shape)
        }
        other => Err(format!("unexpected prediction value {other}")),
    }
}
