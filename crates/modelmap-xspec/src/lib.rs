//! XSPEC model table for modelmap.
//!
//! The list of known models is data: `data/model.dat`, embedded at compile
//! time and parsed on first use. Regenerating it from a new package's
//! function map changes that file only.
//!
//! ```
//! use modelmap_core::SignatureKind;
//!
//! let table = modelmap_xspec::table().unwrap();
//! assert_eq!(table.get("bbody").unwrap().kind, SignatureKind::Fortran);
//! ```
//!
//! With the `dylib` feature, [`LibraryResolver`] binds the table to the
//! routines exported by a model library.

#[cfg(feature = "dylib")]
mod library;
mod table;

use std::sync::OnceLock;

use thiserror::Error;

use modelmap_registry::{HandleResolver, ModelRegistry};

#[cfg(feature = "dylib")]
pub use library::LibraryResolver;
pub use table::ModelTable;

/// Source text of the embedded model table.
pub const MODEL_DAT: &str = include_str!("../data/model.dat");

/// A malformed line in a model table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("model table line {line}: {message}")]
pub struct ManifestError {
    pub line: usize,
    pub message: String,
}

impl ManifestError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// The embedded XSPEC model table, parsed once.
pub fn table() -> Result<&'static ModelTable, ManifestError> {
    static TABLE: OnceLock<Result<ModelTable, ManifestError>> = OnceLock::new();
    TABLE
        .get_or_init(|| {
            let table = ModelTable::parse(MODEL_DAT);
            match &table {
                Ok(table) => tracing::debug!(models = table.len(), "parsed embedded model table"),
                Err(err) => tracing::error!(error = %err, "embedded model table is malformed"),
            }
            table
        })
        .as_ref()
        .map_err(Clone::clone)
}

/// An unbuilt registry over the embedded table, resolving through `resolver`.
pub fn registry(resolver: impl HandleResolver + 'static) -> Result<ModelRegistry, ManifestError> {
    Ok(ModelRegistry::from_builder(table()?.builder(), resolver))
}
