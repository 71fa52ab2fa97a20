//! One full compilation: validate, resolve, extract, plan.

use crate::context::RenderContext;
use crate::error::CompileError;
use crate::materialize::MaterializePlan;
use crate::registry::FeatureRegistry;
use crate::spec_tree::SpecificationTree;
use crate::validate::{ValidatedSpec, validate};

/// The result of compiling one specification tree.
#[derive(Debug, Clone)]
pub struct Compilation {
    pub registry: FeatureRegistry,
    pub spec: ValidatedSpec,
    pub context: RenderContext,
    pub plan: MaterializePlan,
}

/// Compile `tree` against a fresh registry.
///
/// Nothing is written anywhere; on error no plan exists to materialize.
pub fn compile(tree: SpecificationTree) -> Result<Compilation, CompileError> {
    let mut registry = FeatureRegistry::standard();
    let spec = validate(tree, &mut registry)?;
    let context = RenderContext::extract(&registry, &spec);
    let plan = MaterializePlan::from_registry(&registry);
    tracing::info!(
        traits = ?registry.traits.used_ids(),
        modules = ?registry.modules.used_ids(),
        excluded = plan.excluded.len(),
        "specification compiled"
    );
    Ok(Compilation {
        registry,
        spec,
        context,
        plan,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_compilation_starts_from_a_fresh_registry() {
        let tree = SpecificationTree::from_toml_str(
            "derive = [\"pause\"]\n[[include]]\nmodule = \"burn\"\n",
        )
        .expect("tree should parse");
        let first = compile(tree).expect("first compile");
        assert!(first.registry.modules.is_used("burn"));

        let second = compile(SpecificationTree::default()).expect("second compile");
        assert!(!second.registry.modules.is_used("burn"));
        assert!(!second.registry.traits.is_used("pause"));
        assert!(second.plan.is_excluded("ERC721BaseBurnable.sol"));
    }
}
