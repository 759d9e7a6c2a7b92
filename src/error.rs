use thiserror::Error;

use modelmap_core::{DispatchError, NotFoundError, RegistrationError};
use modelmap_xspec::ManifestError;

pub type Result<T, E = ModelMapError> = std::result::Result<T, E>;

/// Any error produced by modelmap.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelMapError {
    /// A model table could not be parsed.
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    /// The registry could not be built.
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// A model call failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

impl From<NotFoundError> for ModelMapError {
    fn from(err: NotFoundError) -> Self {
        ModelMapError::Dispatch(DispatchError::NotFound(err))
    }
}

impl ModelMapError {
    pub fn is_manifest(&self) -> bool {
        matches!(self, ModelMapError::Manifest(_))
    }

    pub fn is_registration(&self) -> bool {
        matches!(self, ModelMapError::Registration(_))
    }

    pub fn is_dispatch(&self) -> bool {
        matches!(self, ModelMapError::Dispatch(_))
    }

    /// Check if this is a lookup of an unregistered name.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ModelMapError::Dispatch(err) if err.is_not_found())
    }
}
