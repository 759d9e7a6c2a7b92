//! Core types for the modelmap function registry.
//!
//! This crate holds the leaf types shared by the registry and the model
//! tables: calling-convention tags, model declarations, callable handles,
//! the canonical invocation request, and the error hierarchy.

mod decl;
mod error;
mod handle;
mod kind;
mod request;

pub use decl::ModelDecl;
pub use error::{
    DispatchError, InvocationError, NativeError, NotFoundError, RegistrationError,
};
pub use handle::{
    CFn, FortranDoubleFn, FortranFn, ModelHandle, NativeCall, NativeCallable, NativeFn,
};
pub use kind::{ModelClass, SignatureKind};
pub use request::{DEFAULT_SPECTRUM, ModelRequest};
