//! Registry builder.
//!
//! [`RegistryBuilder`] holds the fixed list of model declarations and turns
//! it into registry entries in one pass. The pass is all-or-nothing: it
//! either returns the complete entry table or an error, and nothing is
//! published until the whole table has validated and resolved.

use rustc_hash::{FxHashMap, FxHashSet};

use modelmap_core::{ModelDecl, RegistrationError};

use crate::entry::ModelEntry;
use crate::resolver::HandleResolver;

/// Resolved entries plus a name index into them.
#[derive(Debug, Default)]
pub(crate) struct EntryTable {
    pub(crate) entries: Vec<ModelEntry>,
    pub(crate) index: FxHashMap<String, usize>,
}

/// The fixed list of declarations a registry is built from.
#[derive(Debug, Clone, Default)]
pub struct RegistryBuilder {
    decls: Vec<ModelDecl>,
}

impl RegistryBuilder {
    /// Duplicates are accepted here and rejected by [`validate`](Self::validate).
    pub fn from_decls(decls: impl IntoIterator<Item = ModelDecl>) -> Self {
        Self {
            decls: decls.into_iter().collect(),
        }
    }

    pub fn decls(&self) -> &[ModelDecl] {
        &self.decls
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    /// Check that every name is non-empty and unique.
    pub fn validate(&self) -> Result<(), RegistrationError> {
        let mut seen = FxHashSet::default();
        for decl in &self.decls {
            if decl.name.is_empty() {
                return Err(RegistrationError::InvalidDeclaration(format!(
                    "model for routine '{}' has an empty name",
                    decl.function
                )));
            }
            if !seen.insert(decl.name.as_str()) {
                return Err(RegistrationError::DuplicateRegistration {
                    name: decl.name.clone(),
                });
            }
        }
        Ok(())
    }

    /// Validate, then resolve every declaration through `resolver`.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub(crate) fn resolve_all(
        &self,
        resolver: &dyn HandleResolver,
    ) -> Result<EntryTable, RegistrationError> {
        self.validate()?;

        let mut table = EntryTable {
            entries: Vec::with_capacity(self.decls.len()),
            index: FxHashMap::with_capacity_and_hasher(self.decls.len(), Default::default()),
        };

        for decl in &self.decls {
            let unresolved = |reason: String| RegistrationError::UnresolvedHandle {
                name: decl.name.clone(),
                symbol: decl.symbol(),
                reason,
            };

            let handle = resolver.resolve(decl).map_err(unresolved)?;
            if handle.kind() != decl.kind {
                return Err(unresolved(format!(
                    "kind mismatch: declared {}, resolved {}",
                    decl.kind,
                    handle.kind()
                )));
            }

            table.index.insert(decl.name.clone(), table.entries.len());
            table.entries.push(ModelEntry::new(decl.clone(), handle));
        }

        Ok(table)
    }
}
