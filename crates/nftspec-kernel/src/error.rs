//! Error types for specification validation.

/// A violated constraint in the input specification.
///
/// Every variant aborts the compilation before any output is written.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// `expected` lists the derivable trait ids.
    #[error("unknown trait `{id}`: expected one of {expected}")]
    UnknownTrait { id: String, expected: String },

    /// The module does not exist or is not directly selectable. `expected`
    /// lists the includable module ids.
    #[error("unknown module `{id}`: expected one of {expected}")]
    UnknownModule { id: String, expected: String },

    #[error("module `{id}` is included more than once")]
    DuplicateModule { id: String },

    #[error("module `{module}` expects {expected} parameter(s), got {actual}")]
    InvalidParameterArity {
        module: String,
        expected: usize,
        actual: usize,
    },

    #[error("module `{module}` parameter {index}: expected {expected}, got {actual}")]
    InvalidParameterType {
        module: String,
        index: usize,
        expected: &'static str,
        actual: &'static str,
    },

    #[error("module `{module}` parameter value {value}: expected {expected}")]
    InvalidParameterValue {
        module: String,
        value: i64,
        expected: &'static str,
    },

    #[error("field name `{name}` is not a valid identifier")]
    InvalidFieldName { name: String },

    #[error("field `{name}` is declared more than once")]
    DuplicateFieldName { name: String },

    #[error("field `{field}` of type {kind} has size {size}: expected {expected}")]
    InvalidFieldSize {
        field: String,
        kind: &'static str,
        size: i64,
        expected: &'static str,
    },

    #[error("unknown function `{function}`")]
    UnknownFunction { function: String },

    #[error("function `{function}` belongs to module `{feature}`, which is not included")]
    FeatureNotIncluded { function: String, feature: String },

    #[error("function `{function}` already has modifier `{existing}`, cannot add `{modifier}`")]
    DuplicateModifier {
        function: String,
        existing: String,
        modifier: String,
    },

    #[error("unknown modifier `{modifier}`")]
    UnknownModifier { modifier: String },

    #[error("modifier `{modifier}` requires trait `{trait_id}`, which is not derived")]
    TraitNotDerived { modifier: String, trait_id: String },
}

impl CompileError {
    /// Stable machine-readable class of the violation.
    pub fn code(&self) -> &'static str {
        match self {
            CompileError::UnknownTrait { .. } => "unknown_trait",
            CompileError::UnknownModule { .. } => "unknown_module",
            CompileError::DuplicateModule { .. } => "duplicate_module",
            CompileError::InvalidParameterArity { .. } => "invalid_parameter_arity",
            CompileError::InvalidParameterType { .. } => "invalid_parameter_type",
            CompileError::InvalidParameterValue { .. } => "invalid_parameter_value",
            CompileError::InvalidFieldName { .. } => "invalid_field_name",
            CompileError::DuplicateFieldName { .. } => "duplicate_field_name",
            CompileError::InvalidFieldSize { .. } => "invalid_field_size",
            CompileError::UnknownFunction { .. } => "unknown_function",
            CompileError::FeatureNotIncluded { .. } => "feature_not_included",
            CompileError::DuplicateModifier { .. } => "duplicate_modifier",
            CompileError::UnknownModifier { .. } => "unknown_modifier",
            CompileError::TraitNotDerived { .. } => "trait_not_derived",
        }
    }
}
