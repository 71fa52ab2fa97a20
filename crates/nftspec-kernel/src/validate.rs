//! Semantic validation of a specification tree.
//!
//! Four phases run in order (derive, include, extend, modify). The first
//! violated constraint aborts the pass. Accepted selections mark their
//! feature closure as used in the registry as they are validated, so later
//! phases can check against what earlier phases admitted.

use crate::error::CompileError;
use crate::registry::{FeatureRegistry, function_feature, modifier_trait, module_id, trait_id};
use crate::spec_tree::{FieldDecl, FieldKind, IncludeDecl, ModifierBinding, Param, SpecificationTree};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Derive,
    Include,
    Extend,
    Modify,
}

/// An accepted module selection with its parameters in typed form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "module", rename_all = "snake_case")]
pub enum Selection {
    Plain {
        id: &'static str,
    },
    Mint {
        #[serde(skip_serializing_if = "Option::is_none")]
        cap: Option<u64>,
    },
    Metadata {
        base_uri: String,
        contract_uri: String,
    },
}

impl Selection {
    pub fn module_id(&self) -> &'static str {
        match self {
            Selection::Plain { id } => *id,
            Selection::Mint { .. } => module_id::MINT,
            Selection::Metadata { .. } => module_id::METADATA,
        }
    }
}

/// A field whose type has been normalized to one canonical token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedField {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
}

/// A specification that passed every phase.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatedSpec {
    pub derived: Vec<&'static str>,
    pub selections: Vec<Selection>,
    pub fields: Vec<ResolvedField>,
    pub modifiers: IndexMap<String, String>,
}

impl ValidatedSpec {
    pub fn uses_extend(&self) -> bool {
        !self.fields.is_empty()
    }
}

/// Validate `tree` against `registry`, resolving feature closures as a side
/// effect. `registry` must be fresh.
pub fn validate(
    tree: SpecificationTree,
    registry: &mut FeatureRegistry,
) -> Result<ValidatedSpec, CompileError> {
    let mut validator = Validator { registry };
    validator.resolve_roots();

    let derived = validator.derive(&tree.derive)?;
    tracing::debug!(phase = ?Phase::Derive, count = derived.len(), "phase accepted");

    let selections = validator.include(&tree.include)?;
    tracing::debug!(phase = ?Phase::Include, count = selections.len(), "phase accepted");

    let fields = validator.extend(&tree.fields)?;
    tracing::debug!(phase = ?Phase::Extend, count = fields.len(), "phase accepted");

    let modifiers = validator.modify(tree.modifiers)?;
    tracing::debug!(phase = ?Phase::Modify, count = modifiers.len(), "phase accepted");

    Ok(ValidatedSpec {
        derived,
        selections,
        fields,
        modifiers,
    })
}

struct Validator<'a> {
    registry: &'a mut FeatureRegistry,
}

impl Validator<'_> {
    /// The base trait and both aggregation modules are part of every output.
    fn resolve_roots(&mut self) {
        self.registry.traits.mark_used(trait_id::BASE);
        self.registry.modules.mark_used(module_id::BASE);
        self.registry.modules.mark_used(module_id::CORE);
    }

    fn derive(&mut self, requested: &[String]) -> Result<Vec<&'static str>, CompileError> {
        let mut derived = Vec::with_capacity(requested.len());
        for id in requested {
            let node = self
                .registry
                .traits
                .get(id)
                .ok_or_else(|| CompileError::UnknownTrait {
                    id: id.clone(),
                    expected: self.registry.traits.public_ids().join(", "),
                })?;
            let id = node.id;
            self.registry.traits.mark_used(id);
            derived.push(id);
        }
        Ok(derived)
    }

    fn include(&mut self, requested: &[IncludeDecl]) -> Result<Vec<Selection>, CompileError> {
        let mut seen = BTreeSet::new();
        let mut selections = Vec::with_capacity(requested.len());
        for decl in requested {
            let id = self
                .registry
                .modules
                .get(&decl.module)
                .filter(|node| node.public)
                .map(|node| node.id)
                .ok_or_else(|| CompileError::UnknownModule {
                    id: decl.module.clone(),
                    expected: self.registry.modules.public_ids().join(", "),
                })?;
            if !seen.insert(id) {
                return Err(CompileError::DuplicateModule { id: id.to_string() });
            }

            let selection = match id {
                module_id::MINT => mint_selection(decl)?,
                module_id::METADATA => metadata_selection(decl)?,
                _ => plain_selection(id, decl)?,
            };
            if let Selection::Mint { cap: Some(_) } = selection {
                self.registry.modules.mark_used(module_id::LIMIT);
            }
            self.registry.modules.mark_used(id);
            selections.push(selection);
        }
        Ok(selections)
    }

    fn extend(&mut self, fields: &[FieldDecl]) -> Result<Vec<ResolvedField>, CompileError> {
        if !fields.is_empty() {
            self.registry.modules.mark_used(module_id::EXTEND);
        }
        let mut names = BTreeSet::new();
        let mut resolved = Vec::with_capacity(fields.len());
        for field in fields {
            if !is_identifier(&field.name) {
                return Err(CompileError::InvalidFieldName {
                    name: field.name.clone(),
                });
            }
            if !names.insert(field.name.as_str()) {
                return Err(CompileError::DuplicateFieldName {
                    name: field.name.clone(),
                });
            }
            resolved.push(ResolvedField {
                name: field.name.clone(),
                ty: canonical_type(field)?,
            });
        }
        Ok(resolved)
    }

    fn modify(
        &mut self,
        bindings: Vec<ModifierBinding>,
    ) -> Result<IndexMap<String, String>, CompileError> {
        let mut bound: IndexMap<String, String> = IndexMap::with_capacity(bindings.len());
        for ModifierBinding { function, modifier } in bindings {
            let feature =
                function_feature(&function).ok_or_else(|| CompileError::UnknownFunction {
                    function: function.clone(),
                })?;
            if !self.registry.modules.is_used(feature) {
                return Err(CompileError::FeatureNotIncluded {
                    function,
                    feature: feature.to_string(),
                });
            }
            if let Some(existing) = bound.get(&function) {
                return Err(CompileError::DuplicateModifier {
                    existing: existing.clone(),
                    function,
                    modifier,
                });
            }
            let owner = modifier_trait(&modifier).ok_or_else(|| CompileError::UnknownModifier {
                modifier: modifier.clone(),
            })?;
            if owner != trait_id::BASE && !self.registry.traits.is_used(owner) {
                return Err(CompileError::TraitNotDerived {
                    modifier,
                    trait_id: owner.to_string(),
                });
            }
            bound.insert(function, modifier);
        }
        Ok(bound)
    }
}

fn mint_selection(decl: &IncludeDecl) -> Result<Selection, CompileError> {
    let Some(params) = &decl.params else {
        return Ok(Selection::Mint { cap: None });
    };
    match params.as_slice() {
        [Param::Int(value)] if *value > 0 => Ok(Selection::Mint {
            cap: Some(value.unsigned_abs()),
        }),
        [Param::UInt(value)] => Ok(Selection::Mint { cap: Some(*value) }),
        [Param::Int(value)] => Err(CompileError::InvalidParameterValue {
            module: decl.module.clone(),
            value: *value,
            expected: "a supply cap > 0",
        }),
        [other] => Err(CompileError::InvalidParameterType {
            module: decl.module.clone(),
            index: 0,
            expected: "integer",
            actual: other.type_name(),
        }),
        _ => Err(arity(decl, 1, params.len())),
    }
}

fn metadata_selection(decl: &IncludeDecl) -> Result<Selection, CompileError> {
    let Some(params) = &decl.params else {
        return Ok(Selection::Metadata {
            base_uri: String::new(),
            contract_uri: String::new(),
        });
    };
    if params.len() != 2 {
        return Err(arity(decl, 2, params.len()));
    }
    let mut values = Vec::with_capacity(2);
    for (index, param) in params.iter().enumerate() {
        match param {
            Param::Str(value) => values.push(value.clone()),
            other => {
                return Err(CompileError::InvalidParameterType {
                    module: decl.module.clone(),
                    index,
                    expected: "string",
                    actual: other.type_name(),
                });
            }
        }
    }
    let contract_uri = values.pop().unwrap_or_default();
    let base_uri = values.pop().unwrap_or_default();
    Ok(Selection::Metadata {
        base_uri,
        contract_uri,
    })
}

fn plain_selection(id: &'static str, decl: &IncludeDecl) -> Result<Selection, CompileError> {
    match &decl.params {
        Some(params) if !params.is_empty() => Err(arity(decl, 0, params.len())),
        _ => Ok(Selection::Plain { id }),
    }
}

fn arity(decl: &IncludeDecl, expected: usize, actual: usize) -> CompileError {
    CompileError::InvalidParameterArity {
        module: decl.module.clone(),
        expected,
        actual,
    }
}

/// A Solidity identifier: a letter, `_` or `$`, then letters, digits, `_`
/// or `$`.
fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

fn canonical_type(field: &FieldDecl) -> Result<String, CompileError> {
    let invalid = |size: i64, expected: &'static str| CompileError::InvalidFieldSize {
        field: field.name.clone(),
        kind: field.kind.as_str(),
        size,
        expected,
    };
    match (field.kind, field.size) {
        (_, Some(size)) if size < 0 => Err(invalid(size, "a non-negative size")),
        (kind, None) => Ok(kind.as_str().to_string()),
        (kind, Some(size)) if kind.is_integer() => {
            if (8..=256).contains(&size) && size % 8 == 0 {
                Ok(format!("{kind}{size}"))
            } else {
                Err(invalid(size, "a multiple of 8 in [8, 256]"))
            }
        }
        (FieldKind::Bytes, Some(size)) => {
            if (1..=32).contains(&size) {
                Ok(format!("bytes{size}"))
            } else {
                Err(invalid(size, "a size in [1, 32]"))
            }
        }
        (_, Some(size)) => Err(invalid(size, "no size")),
    }
}
