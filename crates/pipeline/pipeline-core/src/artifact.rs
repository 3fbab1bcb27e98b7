//! Model artifact persistence
//!
//! Fitted models are stored as a JSON envelope:
//!
//! ```json
//! { "format_version": 1, "model": { ... } }
//! ```
//!
//! [`load`] checks the version before decoding the model, so an artifact
//! written by an incompatible release fails with
//! [`ArtifactError::UnsupportedVersion`] instead of a field-level decode
//! error.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use pipeline_spi::ModelError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Current artifact format version
pub const FORMAT_VERSION: u32 = 1;

/// Errors raised while reading or writing an artifact
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Model file not found at {}", .0.display())]
    NotFound(PathBuf),

    #[error("Failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to decode model from {}: {source}", .path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode model: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Unsupported artifact format version {found} (supported: {supported})")]
    UnsupportedVersion { found: u32, supported: u32 },

    #[error("Model in {} is not usable: {source}", .path.display())]
    Invalid {
        path: PathBuf,
        #[source]
        source: ModelError,
    },
}

#[derive(Serialize)]
struct EnvelopeRef<'a, M> {
    format_version: u32,
    model: &'a M,
}

#[derive(Deserialize)]
struct Envelope {
    format_version: u32,
    model: serde_json::Value,
}

/// Serialize `model` to `path`, creating the parent directory if needed
pub fn save<M: Serialize>(model: &M, path: &Path) -> Result<(), ArtifactError> {
    let io_err = |source: io::Error| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(
        &mut writer,
        &EnvelopeRef {
            format_version: FORMAT_VERSION,
            model,
        },
    )
    .map_err(ArtifactError::Encode)?;
    writer.flush().map_err(io_err)?;

    tracing::debug!(path = %path.display(), "artifact written");
    Ok(())
}

/// Deserialize a model previously written with [`save`]
pub fn load<M: DeserializeOwned>(path: &Path) -> Result<M, ArtifactError> {
    let file = File::open(path).map_err(|source| match source.kind() {
        io::ErrorKind::NotFound => ArtifactError::NotFound(path.to_path_buf()),
        _ => ArtifactError::Io {
            path: path.to_path_buf(),
            source,
        },
    })?;

    let decode_err = |source: serde_json::Error| ArtifactError::Decode {
        path: path.to_path_buf(),
        source,
    };

    let envelope: Envelope =
        serde_json::from_reader(BufReader::new(file)).map_err(decode_err)?;
    if envelope.format_version != FORMAT_VERSION {
        return Err(ArtifactError::UnsupportedVersion {
            found: envelope.format_version,
            supported: FORMAT_VERSION,
        });
    }

    serde_json::from_value(envelope.model).map_err(decode_err)
}
