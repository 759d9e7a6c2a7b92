//! Registry entries.

use std::fmt;

use modelmap_core::{
    InvocationError, ModelClass, ModelDecl, ModelHandle, ModelRequest, SignatureKind,
};

use crate::adapter;

/// A registered model: its name bound to a resolved handle.
///
/// Entries are immutable and owned by the registry. The handle is never
/// handed out; callers reach the routine only through [`ModelEntry::invoke`].
pub struct ModelEntry {
    decl: ModelDecl,
    handle: ModelHandle,
}

impl ModelEntry {
    /// Bind a declaration to its handle. The builder has already checked
    /// that `handle.kind() == decl.kind`.
    pub(crate) fn new(decl: ModelDecl, handle: ModelHandle) -> Self {
        debug_assert_eq!(decl.kind, handle.kind());
        Self { decl, handle }
    }

    pub fn name(&self) -> &str {
        &self.decl.name
    }

    pub fn kind(&self) -> SignatureKind {
        self.handle.kind()
    }

    pub fn class(&self) -> ModelClass {
        self.decl.class
    }

    /// Bare routine name from the model table.
    pub fn function(&self) -> &str {
        &self.decl.function
    }

    /// Number of parameter values the routine reads.
    pub fn params(&self) -> usize {
        self.decl.params
    }

    /// The declaration this entry was built from.
    pub fn decl(&self) -> &ModelDecl {
        &self.decl
    }

    /// Call the routine through the adapter for its kind and return the
    /// populated flux buffer.
    pub fn invoke<'a>(
        &self,
        mut request: ModelRequest<'a>,
    ) -> Result<&'a mut [f64], InvocationError> {
        adapter::invoke(&self.handle, self.decl.params, &mut request)?;
        Ok(request.flux)
    }
}

impl fmt::Debug for ModelEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelEntry")
            .field("name", &self.decl.name)
            .field("kind", &self.kind())
            .field("class", &self.decl.class)
            .field("function", &self.decl.function)
            .field("params", &self.decl.params)
            .finish()
    }
}
