use std::fmt;
use std::path::PathBuf;

/// Engine error taxonomy.
///
/// None of these are retried. Callers at the application boundary wrap them in
/// `anyhow::Error` and terminate.
#[derive(Debug)]
pub enum EngineError {
    /// Window, adapter, device or surface setup failed before the frame loop.
    Initialization(String),

    /// A mesh, texture or shader source could not be read or decoded.
    AssetLoad { path: PathBuf, reason: String },

    /// The raw attribute streams handed to the indexer are not aligned.
    InputLengthMismatch {
        positions: usize,
        uvs: usize,
        normals: usize,
    },

    /// A draw-time GPU call failed; fatal to the current frame.
    Gpu(String),
}

impl EngineError {
    pub(crate) fn asset(path: impl Into<PathBuf>, reason: impl fmt::Display) -> Self {
        EngineError::AssetLoad {
            path: path.into(),
            reason: reason.to_string(),
        }
    }
}

impl fmt::Display for EngineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EngineError::Initialization(msg) => write!(f, "initialization failed: {msg}"),
            EngineError::AssetLoad { path, reason } => {
                write!(f, "failed to load asset '{}': {reason}", path.display())
            }
            EngineError::InputLengthMismatch { positions, uvs, normals } => write!(
                f,
                "raw vertex streams differ in length (positions={positions}, uvs={uvs}, normals={normals})"
            ),
            EngineError::Gpu(msg) => write!(f, "gpu error: {msg}"),
        }
    }
}

impl std::error::Error for EngineError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mismatch_message_names_every_stream() {
        let err = EngineError::InputLengthMismatch { positions: 3, uvs: 2, normals: 3 };
        let msg = err.to_string();
        assert!(msg.contains("positions=3"));
        assert!(msg.contains("uvs=2"));
        assert!(msg.contains("normals=3"));
    }

    #[test]
    fn asset_error_includes_path() {
        let err = EngineError::asset("models/suzanne.obj", "file not found");
        assert_eq!(
            err.to_string(),
            "failed to load asset 'models/suzanne.obj': file not found"
        );
    }
}
