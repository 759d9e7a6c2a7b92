//! Model declarations: one row of the fixed model table.

use crate::{ModelClass, SignatureKind};

/// A model as listed in the model table, before its handle is resolved.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelDecl {
    /// Name the fitting engine uses to address the model.
    pub name: String,
    /// Additive, multiplicative or convolution.
    pub class: ModelClass,
    /// Calling convention of the routine.
    pub kind: SignatureKind,
    /// Bare routine name, without kind prefix or ABI decoration.
    pub function: String,
    /// Number of parameter values the routine reads.
    pub params: usize,
}

impl ModelDecl {
    pub fn new(
        name: impl Into<String>,
        class: ModelClass,
        kind: SignatureKind,
        function: impl Into<String>,
        params: usize,
    ) -> Self {
        Self {
            name: name.into(),
            class,
            kind,
            function: function.into(),
            params,
        }
    }

    /// Build a declaration from a prefixed table function name such as `C_apec`.
    pub fn from_prefixed(
        name: impl Into<String>,
        class: ModelClass,
        prefixed: &str,
        params: usize,
    ) -> Self {
        let (kind, function) = SignatureKind::from_prefixed(prefixed);
        Self::new(name, class, kind, function, params)
    }

    /// Symbol exported by a shared library for this routine.
    pub fn symbol(&self) -> String {
        self.kind.link_symbol(&self.function)
    }
}
