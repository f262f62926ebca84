//! Perception pipeline used to validate evidence submitted by the verifier.
//!
//! The pipeline letterboxes an image onto a square canvas, hands it to an
//! [`InferenceBackend`], decodes YOLO-style detections with non-max
//! suppression, and scores the accompanying sensor reading with an
//! [`OutlierClassifier`].

mod backend;
mod classifier;
mod detector;
mod errors;
mod evidence;
mod geometry;
mod nms;
mod preprocess;
mod tensor;

#[cfg(any(test, feature = "test-utils"))]
pub use backend::MockInferenceBackend;
pub use backend::InferenceBackend;
#[cfg(any(test, feature = "test-utils"))]
pub use classifier::MockOutlierClassifier;
pub use classifier::{EllipticEnvelope, EnvelopeParams, OutlierClassifier, Verdict, FEATURE_COUNT};
pub use detector::{extract_candidates, Detector, DetectorConfig, BOX_ROWS};
pub use errors::{PerceptionError, PerceptionResult};
pub use evidence::RealWorldData;
pub use geometry::BoundingBox;
pub use nms::{non_max_suppression, Detection};
pub use preprocess::{
    decode_image, padding_offset, resize_and_pad, to_input_tensor, DEFAULT_CANVAS_SIZE,
    DEFAULT_PADDING_COLOR,
};
pub use tensor::Tensor;
