//! ModelRegistry - name-based lookup and dispatch of model routines.
//!
//! # Lifecycle
//!
//! ```text
//! Empty --build()--> Populated --clear()--> Empty --build()--> ...
//! ```
//!
//! The registry is either empty or holds every declared model; a failed
//! [`build`](ModelRegistry::build) leaves the previous state untouched.
//! Calling `build` on a populated registry rebuilds it from the table.
//!
//! # Thread Safety
//!
//! `build` and `clear` take `&mut self`, so the borrow checker enforces
//! that no lookup or dispatch runs during a lifecycle transition. Once
//! populated, a shared `&ModelRegistry` (or `Arc<ModelRegistry>`) serves
//! `lookup` and `dispatch` from any number of threads without locking.
//!
//! # Example
//!
//! ```
//! use modelmap_core::{ModelClass, ModelDecl, NativeCall, NativeError};
//! use modelmap_registry::{ModelRegistry, StaticResolver};
//!
//! let resolver = StaticResolver::new().with_native("offset", |call: &mut NativeCall<'_>| {
//!     let p = call.param(0)?;
//!     call.flux_mut().fill(p);
//!     Ok::<(), NativeError>(())
//! });
//! let table = [ModelDecl::from_prefixed("const", ModelClass::Additive, "C_offset", 1)];
//!
//! let mut registry = ModelRegistry::new(table, resolver);
//! registry.build().unwrap();
//!
//! let flux = registry.evaluate("const", &[0.1, 0.2, 0.3], &[4.0]).unwrap();
//! assert_eq!(flux, [4.0, 4.0]);
//! ```

use std::fmt;

use modelmap_core::{
    DispatchError, ModelClass, ModelDecl, ModelRequest, NotFoundError, RegistrationError,
};

use crate::builder::{EntryTable, RegistryBuilder};
use crate::entry::ModelEntry;
use crate::resolver::HandleResolver;

/// Name-to-routine registry.
///
/// Owns the fixed declaration table, the resolver that binds it, and the
/// entries produced by the last successful build.
pub struct ModelRegistry {
    // Entries drop before the resolver that produced their handles.
    table: EntryTable,
    built: bool,
    builder: RegistryBuilder,
    resolver: Box<dyn HandleResolver>,
}

impl ModelRegistry {
    /// Create an empty registry over a fixed declaration table.
    pub fn new(
        decls: impl IntoIterator<Item = ModelDecl>,
        resolver: impl HandleResolver + 'static,
    ) -> Self {
        Self::from_builder(RegistryBuilder::from_decls(decls), resolver)
    }

    pub fn from_builder(builder: RegistryBuilder, resolver: impl HandleResolver + 'static) -> Self {
        Self {
            table: EntryTable::default(),
            built: false,
            builder,
            resolver: Box::new(resolver),
        }
    }

    // ==========================================================================
    // Lifecycle
    // ==========================================================================

    /// Populate the registry from the declaration table.
    ///
    /// Fails with [`RegistrationError::DuplicateRegistration`] or
    /// [`RegistrationError::UnresolvedHandle`]. On failure the registry keeps
    /// whatever it held before the call.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn build(&mut self) -> Result<(), RegistrationError> {
        match self.builder.resolve_all(self.resolver.as_ref()) {
            Ok(table) => {
                self.table = table;
                self.built = true;
                tracing::info!(models = self.table.entries.len(), "model registry built");
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "model registry build failed");
                Err(err)
            }
        }
    }

    /// Drop every entry and return to the empty state. Idempotent.
    pub fn clear(&mut self) {
        if self.built {
            tracing::info!(models = self.table.entries.len(), "model registry cleared");
        }
        self.table = EntryTable::default();
        self.built = false;
    }

    /// Whether the last lifecycle operation was a successful build.
    pub fn is_built(&self) -> bool {
        self.built
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    /// Get the entry registered under `name`.
    pub fn lookup(&self, name: &str) -> Result<&ModelEntry, NotFoundError> {
        self.table
            .index
            .get(name)
            .map(|&i| &self.table.entries[i])
            .ok_or_else(|| NotFoundError::new(name))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.table.index.contains_key(name)
    }

    /// Registered names, in table order.
    ///
    /// The iterator borrows the registry; call again for a fresh pass.
    pub fn names(&self) -> impl ExactSizeIterator<Item = &str> + '_ {
        self.table.entries.iter().map(ModelEntry::name)
    }

    /// Names of registered models of one class, in table order.
    pub fn names_of_class(&self, class: ModelClass) -> impl Iterator<Item = &str> + '_ {
        self.table
            .entries
            .iter()
            .filter(move |entry| entry.class() == class)
            .map(ModelEntry::name)
    }

    pub fn len(&self) -> usize {
        self.table.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.entries.is_empty()
    }

    /// The declaration table this registry builds from.
    pub fn decls(&self) -> &[ModelDecl] {
        self.builder.decls()
    }

    // ==========================================================================
    // Dispatch
    // ==========================================================================

    /// Evaluate model `name` into the request's flux buffer.
    ///
    /// Returns the populated flux buffer. Unknown names give
    /// [`DispatchError::NotFound`]; adapter or routine failures give
    /// [`DispatchError::Invocation`].
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn dispatch<'a>(
        &self,
        name: &str,
        request: ModelRequest<'a>,
    ) -> Result<&'a mut [f64], DispatchError> {
        let entry = self.lookup(name)?;
        tracing::debug!(
            model = name,
            kind = %entry.kind(),
            bins = request.bins(),
            "dispatching model"
        );
        entry
            .invoke(request)
            .map_err(|source| DispatchError::invocation(name, source))
    }

    /// Evaluate model `name` on a grid of bin edges with default options.
    ///
    /// Allocates one output value per bin (`energy.len() - 1`).
    pub fn evaluate(
        &self,
        name: &str,
        energy: &[f64],
        params: &[f64],
    ) -> Result<Vec<f64>, DispatchError> {
        let mut flux = vec![0.0; energy.len().saturating_sub(1)];
        self.dispatch(name, ModelRequest::new(energy, params, &mut flux))?;
        Ok(flux)
    }
}

impl fmt::Debug for ModelRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModelRegistry")
            .field("built", &self.built)
            .field("declared", &self.builder.len())
            .field("count", &self.table.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::StaticResolver;
    use modelmap_core::{InvocationError, NativeCall, NativeError, SignatureKind};

    fn registry() -> ModelRegistry {
        let resolver = StaticResolver::new()
            .with_native("fill", |call: &mut NativeCall<'_>| -> Result<(), NativeError> {
                let value = call.param(0)?;
                call.flux_mut().fill(value);
                Ok(())
            })
            .with_native("scale", |call: &mut NativeCall<'_>| -> Result<(), NativeError> {
                let factor = call.param(0)?;
                call.flux_mut().iter_mut().for_each(|v| *v *= factor);
                Ok(())
            });
        ModelRegistry::new(
            [
                ModelDecl::from_prefixed("fill", ModelClass::Additive, "C_fill", 0),
                ModelDecl::from_prefixed("scale", ModelClass::Multiplicative, "C_scale", 1),
            ],
            resolver,
        )
    }

    #[test]
    fn registry_starts_empty() {
        let reg = registry();
        assert!(!reg.is_built());
        assert!(reg.is_empty());
        assert_eq!(reg.decls().len(), 2);
        assert_eq!(reg.lookup("fill").unwrap_err(), NotFoundError::new("fill"));
    }

    #[test]
    fn build_then_lookup() {
        let mut reg = registry();
        reg.build().unwrap();
        assert!(reg.is_built());
        assert_eq!(reg.len(), 2);

        let entry = reg.lookup("scale").unwrap();
        assert_eq!(entry.kind(), SignatureKind::Native);
        assert_eq!(entry.class(), ModelClass::Multiplicative);
        assert_eq!(entry.function(), "scale");
    }

    #[test]
    fn names_are_restartable_and_ordered() {
        let mut reg = registry();
        reg.build().unwrap();
        let first: Vec<_> = reg.names().collect();
        let second: Vec<_> = reg.names().collect();
        assert_eq!(first, ["fill", "scale"]);
        assert_eq!(first, second);
        assert_eq!(reg.names().len(), 2);
        assert_eq!(
            reg.names_of_class(ModelClass::Multiplicative).collect::<Vec<_>>(),
            ["scale"]
        );
    }

    #[test]
    fn clear_is_idempotent() {
        let mut reg = registry();
        reg.clear();
        assert!(reg.is_empty());

        reg.build().unwrap();
        reg.clear();
        reg.clear();
        assert!(!reg.is_built());
        assert!(!reg.contains("fill"));
    }

    #[test]
    fn repeated_build_does_not_duplicate() {
        let mut reg = registry();
        reg.build().unwrap();
        reg.build().unwrap();
        assert_eq!(reg.len(), 2);
        assert_eq!(reg.names().collect::<Vec<_>>(), ["fill", "scale"]);
    }

    #[test]
    fn failed_build_keeps_previous_state() {
        let mut reg = ModelRegistry::new(
            [ModelDecl::from_prefixed("x", ModelClass::Additive, "C_missing", 0)],
            StaticResolver::new(),
        );
        assert!(reg.build().is_err());
        assert!(!reg.is_built());
        assert!(reg.is_empty());
    }

    #[test]
    fn dispatch_returns_flux_buffer() {
        let mut reg = registry();
        reg.build().unwrap();

        let mut flux = [2.0, 3.0];
        let out = reg
            .dispatch("scale", ModelRequest::new(&[0.0, 1.0, 2.0], &[10.0], &mut flux))
            .unwrap();
        assert_eq!(out, &[20.0, 30.0]);
    }

    #[test]
    fn dispatch_unknown_is_not_found() {
        let mut reg = registry();
        reg.build().unwrap();
        let mut flux = [0.0];
        let err = reg
            .dispatch("nope", ModelRequest::new(&[0.0, 1.0], &[], &mut flux))
            .unwrap_err();
        assert_eq!(err, DispatchError::NotFound(NotFoundError::new("nope")));
    }

    #[test]
    fn dispatch_wraps_routine_failure() {
        let mut reg = registry();
        reg.build().unwrap();
        let err = reg.evaluate("fill", &[0.0, 1.0], &[]).unwrap_err();
        assert_eq!(
            err,
            DispatchError::invocation(
                "fill",
                InvocationError::Failed(NativeError::MissingParameter { index: 0, count: 0 })
            )
        );
    }

    #[test]
    fn evaluate_allocates_one_value_per_bin() {
        let mut reg = registry();
        reg.build().unwrap();
        assert_eq!(reg.evaluate("fill", &[0.0, 1.0, 2.0, 3.0], &[5.0]).unwrap(), [5.0; 3]);
        assert_eq!(
            reg.evaluate("fill", &[0.0], &[5.0]).unwrap_err(),
            DispatchError::invocation("fill", InvocationError::EmptyOutput)
        );
    }

    #[test]
    fn debug_is_compact() {
        let reg = registry();
        assert_eq!(
            format!("{reg:?}"),
            "ModelRegistry { built: false, declared: 2, count: 0 }"
        );
    }
}
