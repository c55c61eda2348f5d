use thiserror::Error;

#[derive(Error, Debug)]
pub enum BcaError {
    #[error("usage: {program} basename Eion[eV] angle[deg] numpka zpka mpka r[nm]")]
    Usage { program: String },

    #[error("Could not read seed from entropy source {path}: {source}")]
    Entropy {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Material has not been prepared; call prepare() after adding all elements")]
    MaterialNotPrepared,

    #[error("Material was already prepared; elements can no longer be added")]
    MaterialAlreadyPrepared,

    #[error("Material has no elements")]
    EmptyMaterial,

    #[error("Invalid element: {0}")]
    InvalidElement(String),

    #[error("Degenerate sampling of {what}: {value}")]
    DegenerateSampling { what: &'static str, value: f64 },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Grid index out of bounds: x={x}, y={y}, species={species}")]
    GridOutOfBounds { x: usize, y: usize, species: usize },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type BcaResult<T> = Result<T, BcaError>;

impl BcaError {
    /// Errors that only invalidate the current ion's trajectory.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, BcaError::DegenerateSampling { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_degenerate_sampling_is_recoverable() {
        let err = BcaError::DegenerateSampling {
            what: "flight path",
            value: 0.0,
        };
        assert!(err.is_recoverable());
        assert!(!BcaError::MaterialNotPrepared.is_recoverable());
        assert!(!BcaError::EmptyMaterial.is_recoverable());
    }

    #[test]
    fn test_usage_message_names_arguments() {
        let err = BcaError::Usage {
            program: "bca-wire".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("bca-wire basename Eion[eV]"));
        assert!(msg.contains("r[nm]"));
    }
}
