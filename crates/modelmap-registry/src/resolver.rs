//! Handle resolution.
//!
//! The builder asks a [`HandleResolver`] for the callable behind each
//! declaration. [`StaticResolver`] serves handles registered in code; the
//! `modelmap-xspec` crate provides one backed by a shared library.

use rustc_hash::FxHashMap;

use modelmap_core::{
    CFn, FortranDoubleFn, FortranFn, ModelDecl, ModelHandle, NativeCallable,
};

/// Source of callable handles for model declarations.
///
/// The error string becomes the `reason` of
/// [`RegistrationError::UnresolvedHandle`](modelmap_core::RegistrationError::UnresolvedHandle).
pub trait HandleResolver: Send + Sync {
    fn resolve(&self, decl: &ModelDecl) -> Result<ModelHandle, String>;
}

impl<F> HandleResolver for F
where
    F: Fn(&ModelDecl) -> Result<ModelHandle, String> + Send + Sync,
{
    fn resolve(&self, decl: &ModelDecl) -> Result<ModelHandle, String> {
        (self)(decl)
    }
}

/// Resolver over handles registered in code, keyed by bare routine name.
#[derive(Debug, Clone, Default)]
pub struct StaticResolver {
    handles: FxHashMap<String, ModelHandle>,
}

impl StaticResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handle` for routine `function`, replacing any previous one.
    pub fn with(mut self, function: impl Into<String>, handle: ModelHandle) -> Self {
        self.handles.insert(function.into(), handle);
        self
    }

    pub fn with_native<F>(self, function: impl Into<String>, f: F) -> Self
    where
        F: NativeCallable + Send + Sync + 'static,
    {
        self.with(function, ModelHandle::native(f))
    }

    pub fn with_fortran(self, function: impl Into<String>, f: FortranFn) -> Self {
        self.with(function, ModelHandle::Fortran(f))
    }

    pub fn with_c(self, function: impl Into<String>, f: CFn) -> Self {
        self.with(function, ModelHandle::C(f))
    }

    pub fn with_fortran_double(self, function: impl Into<String>, f: FortranDoubleFn) -> Self {
        self.with(function, ModelHandle::FortranDouble(f))
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl HandleResolver for StaticResolver {
    fn resolve(&self, decl: &ModelDecl) -> Result<ModelHandle, String> {
        self.handles
            .get(&decl.function)
            .cloned()
            .ok_or_else(|| format!("no routine registered for '{}'", decl.function))
    }
}
