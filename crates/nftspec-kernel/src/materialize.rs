//! Selective materialization plan: which skeleton files to drop and which to
//! render. Pure set computation; the I/O lives in `nftspec-emit`.

use crate::registry::FeatureRegistry;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterializePlan {
    /// Primary and interface artifacts of every unused feature.
    pub excluded: BTreeSet<String>,
    /// Artifacts of used, renderable features: traits first, then modules,
    /// each in registry order.
    pub rendered: Vec<String>,
}

impl MaterializePlan {
    pub fn from_registry(registry: &FeatureRegistry) -> Self {
        let collections = [&registry.traits, &registry.modules];
        let excluded = collections
            .iter()
            .flat_map(|set| set.unused())
            .flat_map(|node| node.artifacts())
            .map(str::to_string)
            .collect();
        let rendered = collections
            .iter()
            .flat_map(|set| set.used())
            .filter(|node| node.renderable)
            .map(|node| node.artifact.to_string())
            .collect();
        Self { excluded, rendered }
    }

    pub fn is_excluded(&self, file_name: &str) -> bool {
        self.excluded.contains(file_name)
    }
}
