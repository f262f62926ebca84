use serde::{Deserialize, Serialize};
use tracing::*;

use crate::{
    backend::InferenceBackend,
    errors::{PerceptionError, PerceptionResult},
    geometry::BoundingBox,
    nms::{non_max_suppression, Detection},
    preprocess::{
        decode_image, resize_and_pad, to_input_tensor, DEFAULT_CANVAS_SIZE, DEFAULT_PADDING_COLOR,
    },
    tensor::Tensor,
};

/// Leading output rows holding `cx, cy, w, h`.
pub const BOX_ROWS: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectorConfig {
    /// Side of the square model canvas, in pixels.
    pub canvas_size: u32,
    pub padding_color: [u8; 3],
    /// Candidates at or below this confidence are dropped.
    pub min_confidence: f32,
    /// Overlap above which the weaker of two candidates is suppressed.
    pub max_iou: f32,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            canvas_size: DEFAULT_CANVAS_SIZE,
            padding_color: DEFAULT_PADDING_COLOR,
            min_confidence: 0.2,
            max_iou: 0.5,
        }
    }
}

/// Object detector over a YOLO-style model.
#[derive(Debug)]
pub struct Detector<B> {
    backend: B,
    config: DetectorConfig,
}

impl<B: InferenceBackend> Detector<B> {
    pub fn new(backend: B, config: DetectorConfig) -> Self {
        Self { backend, config }
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Runs the full pipeline over encoded image bytes.
    pub fn detect(&self, image_bytes: &[u8]) -> PerceptionResult<Vec<Detection>> {
        let img = decode_image(image_bytes)?;
        let canvas = resize_and_pad(&img, self.config.canvas_size, self.config.padding_color)?;
        let input = to_input_tensor(&canvas)?;

        let output = self.backend.invoke(&input)?;
        let candidates = extract_candidates(
            &output,
            self.config.canvas_size as f32,
            self.config.min_confidence,
        )?;
        let detections = non_max_suppression(&candidates, self.config.max_iou);

        debug!(
            width = img.width(),
            height = img.height(),
            candidates = candidates.len(),
            detections = detections.len(),
            "detection pass finished"
        );
        Ok(detections)
    }
}

/// Decodes a `[1, 4 + C, N]` output into candidates above `min_confidence`.
///
/// Box coordinates are normalized and get multiplied by `scale`. The class is
/// the first class with the highest probability.
pub fn extract_candidates(
    output: &Tensor,
    scale: f32,
    min_confidence: f32,
) -> PerceptionResult<Vec<Detection>> {
    let (rows, anchors) = match *output.shape() {
        [1, rows, anchors] if rows > BOX_ROWS => (rows, anchors),
        _ => {
            return Err(PerceptionError::UnexpectedOutputShape(
                output.shape().to_vec(),
            ))
        }
    };
    let data = output.data();
    let at = |row: usize, anchor: usize| data[row * anchors + anchor];

    let mut candidates = Vec::new();
    for anchor in 0..anchors {
        let mut class_id = 0;
        let mut confidence = at(BOX_ROWS, anchor);
        for row in BOX_ROWS + 1..rows {
            let p = at(row, anchor);
            if p > confidence {
                class_id = row - BOX_ROWS;
                confidence = p;
            }
        }
        if confidence <= min_confidence || confidence.is_nan() {
            continue;
        }

        candidates.push(Detection {
            bbox: BoundingBox::from_center(
                at(0, anchor) * scale,
                at(1, anchor) * scale,
                at(2, anchor) * scale,
                at(3, anchor) * scale,
            ),
            class_id,
            confidence,
        });
    }
    Ok(candidates)
}
