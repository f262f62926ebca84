//! Outlier classification of sensor readings.

use std::array;

use serde::{Deserialize, Serialize};

use crate::errors::{PerceptionError, PerceptionResult};

/// Features per reading: temperature, humidity, air quality.
pub const FEATURE_COUNT: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    /// The reading lies inside the learned inlier region.
    Compliant,
    NonCompliant,
}

#[cfg_attr(any(test, feature = "test-utils"), mockall::automock)]
pub trait OutlierClassifier {
    /// Classifies one reading. Fails unless `features` has exactly
    /// [`FEATURE_COUNT`] entries.
    fn classify(&self, features: &[f64]) -> PerceptionResult<Verdict>;
}

/// Fitted parameters of a robust-covariance elliptic envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvelopeParams {
    /// Robust location estimate.
    pub location: [f64; FEATURE_COUNT],
    /// Inverse of the robust covariance estimate.
    pub precision: [[f64; FEATURE_COUNT]; FEATURE_COUNT],
    /// Threshold subtracted from the negated squared Mahalanobis distance.
    pub offset: f64,
}

impl EnvelopeParams {
    pub fn from_json(text: &str) -> PerceptionResult<Self> {
        serde_json::from_str(text).map_err(|e| PerceptionError::InvalidModelParams(e.to_string()))
    }
}

/// Density boundary around the inlier distribution.
///
/// A reading `x` is compliant iff `-(x - μ)ᵀ P (x - μ) - offset >= 0`.
#[derive(Debug, Clone)]
pub struct EllipticEnvelope {
    params: EnvelopeParams,
}

impl EllipticEnvelope {
    pub fn new(params: EnvelopeParams) -> PerceptionResult<Self> {
        let all_finite = params
            .location
            .iter()
            .chain(params.precision.iter().flatten())
            .all(|v| v.is_finite())
            && params.offset.is_finite();
        if !all_finite {
            return Err(PerceptionError::InvalidModelParams(
                "parameters must be finite".to_owned(),
            ));
        }
        Ok(Self { params })
    }

    pub fn squared_mahalanobis(&self, x: &[f64; FEATURE_COUNT]) -> f64 {
        let d: [f64; FEATURE_COUNT] = array::from_fn(|i| x[i] - self.params.location[i]);
        self.params
            .precision
            .iter()
            .zip(&d)
            .map(|(row, di)| di * row.iter().zip(&d).map(|(p, dj)| p * dj).sum::<f64>())
            .sum()
    }

    pub fn decision_function(&self, x: &[f64; FEATURE_COUNT]) -> f64 {
        -self.squared_mahalanobis(x) - self.params.offset
    }
}

impl OutlierClassifier for EllipticEnvelope {
    fn classify(&self, features: &[f64]) -> PerceptionResult<Verdict> {
        let x: &[f64; FEATURE_COUNT] = features
            .try_into()
            .map_err(|_| PerceptionError::InvalidFeatureVector(features.len()))?;
        // NaN scores fail the comparison and land on the outlier side.
        Ok(if self.decision_function(x) >= 0.0 {
            Verdict::Compliant
        } else {
            Verdict::NonCompliant
        })
    }
}
