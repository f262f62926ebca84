use base64::{prelude::BASE64_STANDARD, Engine};
use serde::Deserialize;

use crate::{
    classifier::FEATURE_COUNT,
    errors::{PerceptionError, PerceptionResult},
};

/// Sensor reading and photo submitted with a verification request.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RealWorldData {
    pub temperature: f64,
    pub humidity: f64,
    pub air_quality: f64,
    /// Base64 image, optionally as a `data:` URL.
    pub image: String,
}

impl RealWorldData {
    pub fn from_json(text: &str) -> PerceptionResult<Self> {
        serde_json::from_str(text).map_err(|e| PerceptionError::MalformedEvidence(e.to_string()))
    }

    /// Feature vector in classifier order.
    pub fn features(&self) -> [f64; FEATURE_COUNT] {
        [self.temperature, self.humidity, self.air_quality]
    }

    pub fn image_bytes(&self) -> PerceptionResult<Vec<u8>> {
        let encoded = self.image.trim();
        let encoded = match encoded.strip_prefix("data:") {
            Some(url) => url.split_once(',').map_or(url, |(_, body)| body),
            None => encoded,
        };
        BASE64_STANDARD
            .decode(encoded)
            .map_err(|e| PerceptionError::MalformedEvidence(format!("image: {e}")))
    }
}
