use thiserror::Error;

#[derive(Error, Debug)]
pub enum StegoError {
    /// Represents an unsupported carrier media. For example, a Movie file is not supported
    #[error("Media format is not supported")]
    UnsupportedMedia,

    /// Represents an invalid carrier audio media. For example, a broken WAV file
    #[error("Audio media is invalid")]
    InvalidAudioMedia,

    /// Represents an invalid carrier image media. For example, a broken PNG file
    #[error("Image media is invalid")]
    InvalidImageMedia,

    /// Represents a channel selection that the carrier media does not provide,
    /// for example `Audio(1)` on a mono WAV file or `Red` on an audio file
    #[error("Channel {0} is not available in this media")]
    ChannelNotAvailable(String),

    /// Represents a message whose bitstream does not fit into the carrier
    #[error("Capacity Error: the message needs {required} bits, the carrier offers {available}")]
    CapacityExceeded { required: usize, available: usize },

    /// Represents a transform unit that cannot carry a bit, e.g. an all-zero block for SVD
    #[error("Transform unit at ({row}, {col}) is degenerate")]
    DegenerateTransformUnit { row: usize, col: usize },

    /// Represents a transform unit whose bits do not survive rounding and clamping to the
    /// sample range, even after its samples were moved away from the range limits
    #[error("Transform unit at ({row}, {col}) cannot keep its bits within the sample range")]
    UnstableTransformUnit { row: usize, col: usize },

    /// Represents embedding parameters that do not make sense for the chosen method
    #[error("Invalid parameter `{name}`: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Represents a message that contains the NUL character, it would collide with the terminator
    #[error("The message contains a NUL character, which is reserved as terminator")]
    MessageContainsNul,

    /// Represents a target file in a lossy format, the embedded bits would not survive
    #[error("Target format `{0}` is lossy, use PNG, BMP or WAV instead")]
    LossyTargetFormat(String),

    /// Represents a failure to read from input.
    #[error("Read error")]
    ReadError { source: std::io::Error },

    /// Represents a failure to write target file.
    #[error("Write error")]
    WriteError { source: std::io::Error },

    /// Represents a failure when encoding an audio file.
    #[error("Audio encoding error")]
    AudioEncodingError,

    /// Represents a failure when encoding an image file.
    #[error("Image encoding error")]
    ImageEncodingError,

    /// Represents a failure when creating an audio file.
    #[error("Audio creation error")]
    AudioCreationError,

    /// Represents a broken or unreadable settings file
    #[error("Settings error: {0}")]
    SettingsError(#[from] serde_json::Error),

    /// Represents all other cases of `std::io::Error`.
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error("No carrier media set")]
    CarrierNotSet,

    #[error("No target file set")]
    TargetNotSet,

    #[error("API Error: Missing message")]
    MissingMessage,
}

impl StegoError {
    /// true for all errors caused by a carrier media that could not be loaded
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            StegoError::UnsupportedMedia
                | StegoError::InvalidAudioMedia
                | StegoError::InvalidImageMedia
                | StegoError::ReadError { .. }
        )
    }
}
