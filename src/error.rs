use crate::core::particle::DIM;
use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the nano-imprint core.
///
/// Configuration problems are reported before the first frame runs; a
/// degenerate contact during a frame is fatal for the run.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid radius, box size or other scalar parameter.
    #[error("invalid configuration: {0}")]
    Configuration(String),

    /// Two particle centres coincide, so no contact direction exists.
    #[error("degenerate contact: coincident particle centres at {position:?}")]
    DegenerateContact { position: [f64; DIM] },

    /// A previous frame failed; the run cannot continue.
    #[error("simulation halted after a failed frame")]
    Halted,

    /// Propagated I/O errors (config files, frame exports).
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Malformed YAML configuration.
    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_is_informative() {
        let e = Error::Configuration("particle_radius must be > 0".to_string());
        let msg = format!("{e}");
        assert!(msg.contains("invalid configuration"));
        assert!(msg.contains("particle_radius"));
    }

    #[test]
    fn degenerate_contact_reports_position() {
        let e = Error::DegenerateContact {
            position: [1.0, 2.0, 3.0],
        };
        assert!(e.to_string().contains("[1.0, 2.0, 3.0]"));
    }
}
