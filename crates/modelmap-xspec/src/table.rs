//! Model table parsing.
//!
//! A table is plain text, one model per line:
//!
//! ```text
//! # comment
//! powerlaw   add  C_powerLaw  1
//! phabs      mul  xsphab      1
//! ```
//!
//! Columns are the model name, its class (`add`, `mul`, `con`), the
//! prefixed routine name and the number of parameters the routine reads
//! (an additive model's normalisation is not passed to the routine).
//! Everything after `#` is ignored.

use modelmap_core::{ModelClass, ModelDecl};
use modelmap_registry::RegistryBuilder;

use crate::ManifestError;

/// Parsed model table, in file order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelTable {
    decls: Vec<ModelDecl>,
}

impl ModelTable {
    /// Parse a table. Duplicate names are kept; the registry builder
    /// rejects them.
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let mut decls = Vec::new();

        for (i, raw) in text.lines().enumerate() {
            let line = i + 1;
            let content = raw.split('#').next().unwrap_or_default();
            let mut fields = content.split_whitespace();

            let Some(name) = fields.next() else {
                continue;
            };
            let class = fields
                .next()
                .ok_or_else(|| ManifestError::new(line, format!("model '{name}' has no class")))?
                .parse::<ModelClass>()
                .map_err(|message| ManifestError::new(line, message))?;
            let function = fields.next().ok_or_else(|| {
                ManifestError::new(line, format!("model '{name}' has no routine"))
            })?;
            let params = fields
                .next()
                .ok_or_else(|| {
                    ManifestError::new(line, format!("model '{name}' has no parameter count"))
                })
                .and_then(|count| {
                    count.parse::<usize>().map_err(|_| {
                        ManifestError::new(line, format!("invalid parameter count '{count}'"))
                    })
                })?;
            if let Some(extra) = fields.next() {
                return Err(ManifestError::new(
                    line,
                    format!("unexpected token '{extra}' after parameter count"),
                ));
            }

            let decl = ModelDecl::from_prefixed(name, class, function, params);
            if !is_identifier(&decl.function) {
                return Err(ManifestError::new(
                    line,
                    format!("invalid routine name '{function}'"),
                ));
            }
            decls.push(decl);
        }

        Ok(Self { decls })
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

    pub fn get(&self, name: &str) -> Option<&ModelDecl> {
        self.decls.iter().find(|decl| decl.name == name)
    }

    /// A registry builder over this table.
    pub fn builder(&self) -> RegistryBuilder {
        RegistryBuilder::from_decls(self.decls.iter().cloned())
    }
}

impl IntoIterator for ModelTable {
    type Item = ModelDecl;
    type IntoIter = std::vec::IntoIter<ModelDecl>;

    fn into_iter(self) -> Self::IntoIter {
        self.decls.into_iter()
    }
}

fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
