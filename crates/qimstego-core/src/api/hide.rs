use std::path::{Path, PathBuf};

use crate::media::{Media, Persist};
use crate::{EmbeddingParams, StegoError};

pub fn prepare() -> HideApi {
    HideApi::default()
}

#[derive(Default, Debug)]
pub struct HideApi {
    message: Option<String>,
    carrier: Option<PathBuf>,
    output: Option<PathBuf>,
    params: EmbeddingParams,
}

impl HideApi {
    /// Use the given embedding parameters, defaults to block DCT
    pub fn with_params(mut self, params: EmbeddingParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    pub fn use_message<S: AsRef<str>>(mut self, message: Option<S>) -> Self {
        self.message = message.map(|s| s.as_ref().to_string());
        self
    }

    /// the cover image to hide the message in
    pub fn with_image<A: AsRef<Path>>(mut self, image: A) -> Self {
        self.carrier = Some(image.as_ref().to_path_buf());
        self
    }

    /// the cover audio to hide the message in
    pub fn with_audio<A: AsRef<Path>>(mut self, audio: A) -> Self {
        self.carrier = Some(audio.as_ref().to_path_buf());
        self
    }

    /// where the stego media is written to, PNG, BMP or WAV
    pub fn with_output<A: AsRef<Path>>(mut self, output: A) -> Self {
        self.output = Some(output.as_ref().to_path_buf());
        self
    }

    pub fn execute(self) -> Result<(), StegoError> {
        let Some(carrier) = self.carrier else {
            return Err(StegoError::CarrierNotSet);
        };
        let Some(output) = self.output else {
            return Err(StegoError::TargetNotSet);
        };
        let Some(message) = self.message else {
            return Err(StegoError::MissingMessage);
        };

        Media::from_file(&carrier)?
            .hide_message(&message, &self.params)?
            .save_as(&output)
    }
}
