use crate::geometry::BoundingBox;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub bbox: BoundingBox,
    pub class_id: usize,
    pub confidence: f32,
}

/// Whether candidate `j` outranks candidate `i`. Confidence ties go to the
/// earlier candidate.
fn outranks(j: usize, conf_j: f32, i: usize, conf_i: f32) -> bool {
    conf_j > conf_i || (conf_j == conf_i && j < i)
}

/// Drops every candidate that overlaps a higher-ranked candidate by more than
/// `max_iou`. Survivors keep their input order.
pub fn non_max_suppression(candidates: &[Detection], max_iou: f32) -> Vec<Detection> {
    candidates
        .iter()
        .enumerate()
        .filter(|&(i, cand)| {
            !candidates.iter().enumerate().any(|(j, other)| {
                j != i
                    && outranks(j, other.confidence, i, cand.confidence)
                    && cand.bbox.iou(&other.bbox) > max_iou
            })
        })
        .map(|(_, cand)| *cand)
        .collect()
}
