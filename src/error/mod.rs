//! Error types for Tunesmith.

use thiserror::Error;

type Cause = Box<dyn std::error::Error + Send + Sync>;

/// Primary error type for all Tunesmith operations.
///
/// Only these variants cross into the calling layer; lower-level transport
/// and parse errors are wrapped at the component boundary and surface as the
/// `source` of the relevant variant.
#[derive(Error, Debug)]
pub enum TunesmithError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The vision backend call failed or returned unusable content.
    /// Never retried internally.
    #[error("Failed to process the image: {message}")]
    ImageProcessing {
        message: String,
        #[source]
        source: Option<Cause>,
    },

    /// Song submission failed on every attempt, or every attempt timed out
    /// waiting for audio. Carries the last underlying cause.
    #[error("Failed to generate the song after {attempts} attempt(s)")]
    SongGeneration {
        attempts: u32,
        #[source]
        source: Option<Cause>,
    },
}

impl TunesmithError {
    /// Create an image-processing error without an underlying cause.
    pub fn image_processing(message: impl Into<String>) -> Self {
        Self::ImageProcessing {
            message: message.into(),
            source: None,
        }
    }

    /// Create an image-processing error wrapping its cause.
    pub fn image_processing_with(
        message: impl Into<String>,
        source: impl Into<Cause>,
    ) -> Self {
        Self::ImageProcessing {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a song-generation error wrapping the last attempt's cause.
    pub fn song_generation(attempts: u32, source: impl Into<Cause>) -> Self {
        Self::SongGeneration {
            attempts,
            source: Some(source.into()),
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, TunesmithError>;
