//! Model function registry.
//!
//! This crate provides [`ModelRegistry`], which maps model names to
//! routines with heterogeneous calling conventions and dispatches calls to
//! them through one adapter per [`SignatureKind`](modelmap_core::SignatureKind).
//!
//! - [`RegistryBuilder`] - the fixed declaration table, validated and
//!   resolved all-or-nothing
//! - [`HandleResolver`] / [`StaticResolver`] - where handles come from
//! - [`ModelEntry`] - an immutable name/kind/handle record

mod adapter;
mod builder;
mod entry;
mod registry;
mod resolver;

pub use builder::RegistryBuilder;
pub use entry::ModelEntry;
pub use registry::ModelRegistry;
pub use resolver::{HandleResolver, StaticResolver};
