use alpen_oracle_perception::{
    Detection, Detector, InferenceBackend, OutlierClassifier, RealWorldData, Verdict,
    FEATURE_COUNT,
};
use tracing::*;

use crate::errors::{DispatchError, DispatchResult};

/// Evidence that passed every check.
#[derive(Debug, Clone, PartialEq)]
pub struct EvidenceSummary {
    pub features: [f64; FEATURE_COUNT],
    pub detections: Vec<Detection>,
}

/// Validates the real-world data attached to a verifier call.
#[derive(Debug)]
pub struct EvidenceVerifier<B, C> {
    detector: Detector<B>,
    classifier: C,
}

impl<B: InferenceBackend, C: OutlierClassifier> EvidenceVerifier<B, C> {
    pub fn new(detector: Detector<B>, classifier: C) -> Self {
        Self {
            detector,
            classifier,
        }
    }

    /// Accepts the evidence only if the reading is an inlier and the image
    /// contains at least one detection.
    ///
    /// The classifier runs first so outlier readings never reach inference.
    pub fn verify(&self, real_world_data: &str) -> DispatchResult<EvidenceSummary> {
        let data = RealWorldData::from_json(real_world_data)?;
        let features = data.features();

        if self.classifier.classify(&features)? == Verdict::NonCompliant {
            return Err(DispatchError::OutlierReading { features });
        }

        let image = data.image_bytes()?;
        let detections = self.detector.detect(&image)?;
        if detections.is_empty() {
            return Err(DispatchError::NoDetections);
        }

        debug!(?features, detections = detections.len(), "evidence accepted");
        Ok(EvidenceSummary {
            features,
            detections,
        })
    }
}
