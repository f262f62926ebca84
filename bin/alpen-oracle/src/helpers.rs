use std::{fs, path::Path};

use alpen_oracle_perception::{EllipticEnvelope, EnvelopeParams};
use tracing::debug;

use crate::errors::InitError;

/// Loads the fitted outlier envelope from its JSON parameter file.
pub(crate) fn load_classifier(path: &Path) -> Result<EllipticEnvelope, InitError> {
    debug!(?path, "loading classifier parameters");
    let text = fs::read_to_string(path)?;
    let params = EnvelopeParams::from_json(&text)?;
    Ok(EllipticEnvelope::new(params)?)
}
