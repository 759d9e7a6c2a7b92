//! Named registry of spectral model routines.
//!
//! `modelmap` maps model names to routines with different calling
//! conventions and evaluates them through one uniform request:
//!
//! - [`core`] - signature kinds, handles, requests and errors
//! - [`registry`] - the registry, its builder and handle resolvers
//! - [`xspec`] - the XSPEC model table
//!
//! # Example
//!
//! ```
//! use modelmap::prelude::*;
//!
//! let resolver = StaticResolver::new().with_native("line", |call: &mut NativeCall<'_>| {
//!     let norm = call.param(0)?;
//!     call.flux_mut().fill(norm);
//!     Ok::<(), NativeError>(())
//! });
//! let mut registry = ModelRegistry::new(
//!     [ModelDecl::from_prefixed("flat", ModelClass::Additive, "C_line", 1)],
//!     resolver,
//! );
//! registry.build()?;
//!
//! assert_eq!(registry.evaluate("flat", &[1.0, 2.0, 3.0], &[0.5])?, [0.5, 0.5]);
//! # Ok::<(), modelmap::ModelMapError>(())
//! ```

mod error;

pub use error::{ModelMapError, Result};

pub mod core {
    pub use modelmap_core::*;
}

pub mod registry {
    pub use modelmap_registry::*;
}

pub mod xspec {
    pub use modelmap_xspec::*;
}

pub mod prelude {
    pub use crate::error::{ModelMapError, Result};
    pub use modelmap_core::{
        DispatchError, InvocationError, ModelClass, ModelDecl, ModelHandle, ModelRequest,
        NativeCall, NativeError, NotFoundError, RegistrationError, SignatureKind,
    };
    pub use modelmap_registry::{HandleResolver, ModelEntry, ModelRegistry, StaticResolver};
    pub use modelmap_xspec::ModelTable;
}
