use std::path::{Path, PathBuf};

use log::info;

use crate::media::Media;
use crate::{EmbeddingParams, StegoError};

pub fn prepare() -> UnveilApi {
    UnveilApi::default()
}

#[derive(Debug)]
pub struct UnveilApi {
    secret_media: Option<PathBuf>,
    output_file: Option<PathBuf>,
    params: EmbeddingParams,
    fallback: bool,
}

impl Default for UnveilApi {
    fn default() -> Self {
        Self {
            secret_media: None,
            output_file: None,
            params: EmbeddingParams::default(),
            fallback: true,
        }
    }
}

impl UnveilApi {
    /// Use the given embedding parameters, they must match the ones used for hiding
    pub fn with_params(mut self, params: EmbeddingParams) -> Self {
        self.params = params;
        self
    }

    /// Retry the candidate steps of the parameters when the first attempt yields nothing plausible
    pub fn use_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    /// the image or audio file that carries the secret message
    pub fn from_secret_file<A: AsRef<Path>>(mut self, secret_media: A) -> Self {
        self.secret_media = Some(secret_media.as_ref().to_path_buf());
        self
    }

    /// additionally writes the unveiled message to this file
    pub fn into_output_file<A: AsRef<Path>>(mut self, output_file: A) -> Self {
        self.output_file = Some(output_file.as_ref().to_path_buf());
        self
    }

    /// returns the unveiled message, empty when nothing readable was found
    pub fn execute(self) -> Result<String, StegoError> {
        let Some(secret_media) = self.secret_media else {
            return Err(StegoError::CarrierNotSet);
        };

        let message = Media::from_file(&secret_media)?.unveil_message(&self.params, self.fallback)?;

        if let Some(output_file) = self.output_file {
            std::fs::write(&output_file, &message)
                .map_err(|source| StegoError::WriteError { source })?;
            info!("message written to {}", output_file.display());
        }

        Ok(message)
    }
}
