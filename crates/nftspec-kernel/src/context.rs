//! Render-context extraction from a validated specification.

use crate::registry::{FUNCTION_TO_FEATURE, FeatureRegistry, PAUSE_GUARD, module_id, trait_id};
use crate::validate::{Selection, ValidatedSpec};
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// Modifiers that take the token id as an argument.
const TOKEN_MODIFIERS: &[&str] = &["onlyTokenOwner", "onlyTokenOwnerOrApproved"];

/// Everything the renderer needs, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderContext {
    pub base_imports: Vec<String>,
    pub base_extensions: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_guard: Option<String>,
    pub core_imports: Vec<String>,
    pub core_extensions: Vec<String>,
    pub fields: IndexMap<String, String>,
    pub modifiers: IndexMap<String, String>,
}

impl RenderContext {
    /// Build the context. `registry` must be the one `spec` was validated
    /// against.
    pub fn extract(registry: &FeatureRegistry, spec: &ValidatedSpec) -> Self {
        let mut context = RenderContext::default();

        for node in registry.traits.used() {
            context.base_imports.push(node.artifact.to_string());
            context.base_extensions.push(node.display_name.to_string());
            if node.id == trait_id::PAUSE {
                context.pause_guard = Some(PAUSE_GUARD.to_string());
            }
        }

        for selection in &spec.selections {
            let (import, extension) = core_entry(registry, selection);
            context.core_imports.push(import);
            context.core_extensions.push(extension);
        }
        if spec.selections.is_empty() {
            context.push_core(registry, module_id::BASE);
        }
        if spec.uses_extend() {
            context.push_core(registry, module_id::EXTEND);
        }

        context.fields = spec
            .fields
            .iter()
            .map(|field| (field.name.clone(), field.ty.clone()))
            .collect();
        context.modifiers = spec.modifiers.clone();
        context
    }

    fn push_core(&mut self, registry: &FeatureRegistry, id: &str) {
        if let Some(node) = registry.modules.get(id) {
            self.core_imports.push(node.artifact.to_string());
            self.core_extensions.push(node.display_name.to_string());
        }
    }

    /// Modifier expression for `function`, as it appears in a signature.
    pub fn modifier_expression(&self, function: &str) -> String {
        match self.modifiers.get(function) {
            Some(modifier) if TOKEN_MODIFIERS.contains(&modifier.as_str()) => {
                format!("{modifier}(tokenId)")
            }
            Some(modifier) => modifier.clone(),
            None => String::new(),
        }
    }

    /// Flatten into `{{ key }}` placeholder values.
    pub fn values(&self) -> BTreeMap<String, String> {
        let mut values = BTreeMap::new();
        values.insert("base_imports".to_string(), import_lines(&self.base_imports));
        values.insert("base_extensions".to_string(), self.base_extensions.join(", "));
        values.insert("core_imports".to_string(), import_lines(&self.core_imports));
        values.insert("core_extensions".to_string(), self.core_extensions.join(", "));
        values.insert(
            "pause_guard".to_string(),
            self.pause_guard.clone().unwrap_or_default(),
        );
        values.insert(
            "fields".to_string(),
            self.fields
                .iter()
                .map(|(name, ty)| format!("{ty} public {name};"))
                .collect::<Vec<_>>()
                .join("\n    "),
        );
        for (function, _) in FUNCTION_TO_FEATURE {
            values.insert(
                format!("modifier.{function}"),
                self.modifier_expression(function),
            );
        }
        values
    }
}

fn core_entry(registry: &FeatureRegistry, selection: &Selection) -> (String, String) {
    let (id, arguments) = match selection {
        Selection::Plain { id } => (*id, None),
        Selection::Mint { cap: None } => (module_id::MINT, None),
        Selection::Mint { cap: Some(cap) } => (module_id::LIMIT, Some(cap.to_string())),
        Selection::Metadata {
            base_uri,
            contract_uri,
        } => (
            module_id::METADATA,
            Some(format!(
                "{}, {}",
                string_literal(base_uri),
                string_literal(contract_uri)
            )),
        ),
    };
    // Selections only name registered modules.
    let (artifact, display_name) = registry
        .modules
        .get(id)
        .map(|node| (node.artifact, node.display_name))
        .unwrap_or((id, id));
    let extension = match arguments {
        Some(arguments) => format!("{display_name}({arguments})"),
        None => display_name.to_string(),
    };
    (artifact.to_string(), extension)
}

fn string_literal(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{escaped}\"")
}

fn import_lines(files: &[String]) -> String {
    files
        .iter()
        .map(|file| format!("import \"./{file}\";\n"))
        .collect()
}
