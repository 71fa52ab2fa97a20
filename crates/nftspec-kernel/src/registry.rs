//! Static feature registry: every derivable trait and includable module.
//!
//! The tables in this module are the single authority for feature identity,
//! artifact names and dependency edges. A [`FeatureRegistry`] is a working
//! copy of those tables with per-node `used` flags; build a fresh one for
//! every compilation.

use indexmap::IndexMap;
use serde::Serialize;

pub mod trait_id {
    /// Always-available base trait, resolved before any derive.
    pub const BASE: &str = "erc721";
    pub const OWNER: &str = "owner";
    pub const ADMIN: &str = "admin";
    pub const PAUSE: &str = "pause";
    pub const RECEIVER: &str = "receiver";
}

pub mod module_id {
    pub const BASE: &str = "base";
    pub const SUPPLY: &str = "supply";
    pub const MINT: &str = "mint";
    pub const LIMIT: &str = "limit";
    pub const BURN: &str = "burn";
    pub const METADATA: &str = "metadata";
    pub const ENUMERABLE: &str = "enumerable";
    pub const ROYALTY: &str = "royalty";
    pub const EXTEND: &str = "extend";
    pub const CORE: &str = "core";
}

/// Guard token contributed by the pause trait.
pub const PAUSE_GUARD: &str = "whenNotPaused";

/// One row of the compiled-in registry tables.
#[derive(Debug, Clone, Copy)]
pub struct FeatureRow {
    pub id: &'static str,
    pub display_name: &'static str,
    pub artifact: &'static str,
    pub interface: Option<&'static str>,
    pub dependencies: &'static [&'static str],
    pub public: bool,
    pub renderable: bool,
}

pub const TRAIT_ROWS: &[FeatureRow] = &[
    FeatureRow {
        id: trait_id::BASE,
        display_name: "ERC721",
        artifact: "ERC721.sol",
        interface: Some("IERC721.sol"),
        dependencies: &[],
        public: true,
        renderable: false,
    },
    FeatureRow {
        id: trait_id::OWNER,
        display_name: "Ownable",
        artifact: "Ownable.sol",
        interface: None,
        dependencies: &[],
        public: true,
        renderable: false,
    },
    FeatureRow {
        id: trait_id::ADMIN,
        display_name: "Administrable",
        artifact: "Administrable.sol",
        interface: None,
        dependencies: &[trait_id::OWNER],
        public: true,
        renderable: false,
    },
    FeatureRow {
        id: trait_id::PAUSE,
        display_name: "Pausable",
        artifact: "Pausable.sol",
        interface: None,
        dependencies: &[trait_id::ADMIN],
        public: true,
        renderable: false,
    },
    FeatureRow {
        id: trait_id::RECEIVER,
        display_name: "ERC721Holder",
        artifact: "ERC721Holder.sol",
        interface: Some("IERC721Receiver.sol"),
        dependencies: &[],
        public: true,
        renderable: false,
    },
];

pub const MODULE_ROWS: &[FeatureRow] = &[
    FeatureRow {
        id: module_id::BASE,
        display_name: "ERC721Base",
        artifact: "ERC721Base.sol",
        interface: None,
        dependencies: &[],
        public: false,
        renderable: true,
    },
    FeatureRow {
        id: module_id::SUPPLY,
        display_name: "ERC721BaseSupply",
        artifact: "ERC721BaseSupply.sol",
        interface: None,
        dependencies: &[module_id::BASE],
        public: false,
        renderable: false,
    },
    FeatureRow {
        id: module_id::MINT,
        display_name: "ERC721BaseMintable",
        artifact: "ERC721BaseMintable.sol",
        interface: None,
        dependencies: &[module_id::SUPPLY],
        public: true,
        renderable: true,
    },
    FeatureRow {
        id: module_id::LIMIT,
        display_name: "ERC721BaseMintableLimited",
        artifact: "ERC721BaseMintableLimited.sol",
        interface: None,
        dependencies: &[module_id::MINT],
        public: false,
        renderable: false,
    },
    FeatureRow {
        id: module_id::BURN,
        display_name: "ERC721BaseBurnable",
        artifact: "ERC721BaseBurnable.sol",
        interface: None,
        dependencies: &[module_id::SUPPLY],
        public: true,
        renderable: true,
    },
    FeatureRow {
        id: module_id::METADATA,
        display_name: "ERC721BaseMetadata",
        artifact: "ERC721BaseMetadata.sol",
        interface: Some("IERC721Metadata.sol"),
        dependencies: &[module_id::BASE],
        public: true,
        renderable: true,
    },
    FeatureRow {
        id: module_id::ENUMERABLE,
        display_name: "ERC721BaseEnumerable",
        artifact: "ERC721BaseEnumerable.sol",
        interface: Some("IERC721Enumerable.sol"),
        dependencies: &[module_id::SUPPLY],
        public: true,
        renderable: false,
    },
    FeatureRow {
        id: module_id::ROYALTY,
        display_name: "ERC721BaseRoyalty",
        artifact: "ERC721BaseRoyalty.sol",
        interface: Some("IERC2981.sol"),
        dependencies: &[module_id::BASE],
        public: true,
        renderable: true,
    },
    FeatureRow {
        id: module_id::EXTEND,
        display_name: "ERC721BaseExtend",
        artifact: "ERC721BaseExtend.sol",
        interface: None,
        dependencies: &[module_id::BASE],
        public: false,
        renderable: true,
    },
    FeatureRow {
        id: module_id::CORE,
        display_name: "ERC721Core",
        artifact: "ERC721Core.sol",
        interface: None,
        dependencies: &[module_id::BASE],
        public: false,
        renderable: true,
    },
];

/// Function -> owning module.
pub const FUNCTION_TO_FEATURE: &[(&str, &str)] = &[
    ("transferFrom", module_id::BASE),
    ("safeTransferFrom", module_id::BASE),
    ("approve", module_id::BASE),
    ("setApprovalForAll", module_id::BASE),
    ("mint", module_id::MINT),
    ("safeMint", module_id::MINT),
    ("burn", module_id::BURN),
    ("setTokenURI", module_id::METADATA),
    ("setBaseURI", module_id::METADATA),
    ("setRoyalty", module_id::ROYALTY),
];

/// Modifier -> owning trait.
pub const MODIFIER_TO_TRAIT: &[(&str, &str)] = &[
    ("onlyTokenOwner", trait_id::BASE),
    ("onlyTokenOwnerOrApproved", trait_id::BASE),
    ("onlyOwner", trait_id::OWNER),
    ("onlyAdmin", trait_id::ADMIN),
    ("whenNotPaused", trait_id::PAUSE),
    ("whenPaused", trait_id::PAUSE),
];

pub fn function_feature(function: &str) -> Option<&'static str> {
    FUNCTION_TO_FEATURE
        .iter()
        .find_map(|(name, feature)| (*name == function).then_some(*feature))
}

pub fn modifier_trait(modifier: &str) -> Option<&'static str> {
    MODIFIER_TO_TRAIT
        .iter()
        .find_map(|(name, owner)| (*name == modifier).then_some(*owner))
}

/// Which collection a node lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureKind {
    Trait,
    Module,
}

impl std::fmt::Display for FeatureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureKind::Trait => write!(f, "trait"),
            FeatureKind::Module => write!(f, "module"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FeatureNode {
    pub id: &'static str,
    pub display_name: &'static str,
    pub artifact: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interface: Option<&'static str>,
    pub dependencies: &'static [&'static str],
    pub public: bool,
    pub renderable: bool,
    pub(crate) used: bool,
}

impl FeatureNode {
    fn from_row(row: &FeatureRow) -> Self {
        Self {
            id: row.id,
            display_name: row.display_name,
            artifact: row.artifact,
            interface: row.interface,
            dependencies: row.dependencies,
            public: row.public,
            renderable: row.renderable,
            used: false,
        }
    }

    pub fn is_used(&self) -> bool {
        self.used
    }

    /// Primary artifact followed by the interface artifact, if any.
    pub fn artifacts(&self) -> impl Iterator<Item = &'static str> {
        std::iter::once(self.artifact).chain(self.interface)
    }
}

/// One collection of feature nodes, in registry order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSet {
    kind: FeatureKind,
    pub(crate) nodes: IndexMap<&'static str, FeatureNode>,
}

impl FeatureSet {
    pub fn from_rows(kind: FeatureKind, rows: &[FeatureRow]) -> Self {
        let nodes = rows
            .iter()
            .map(|row| (row.id, FeatureNode::from_row(row)))
            .collect();
        Self { kind, nodes }
    }

    pub fn kind(&self) -> FeatureKind {
        self.kind
    }

    pub fn get(&self, id: &str) -> Option<&FeatureNode> {
        self.nodes.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn is_used(&self, id: &str) -> bool {
        self.nodes.get(id).is_some_and(FeatureNode::is_used)
    }

    pub fn nodes(&self) -> impl Iterator<Item = &FeatureNode> {
        self.nodes.values()
    }

    pub fn used(&self) -> impl Iterator<Item = &FeatureNode> {
        self.nodes().filter(|node| node.used)
    }

    pub fn unused(&self) -> impl Iterator<Item = &FeatureNode> {
        self.nodes().filter(|node| !node.used)
    }

    pub fn used_ids(&self) -> Vec<&'static str> {
        self.used().map(|node| node.id).collect()
    }

    /// Ids a specification may name directly, in registry order.
    pub fn public_ids(&self) -> Vec<&'static str> {
        self.nodes()
            .filter(|node| node.public)
            .map(|node| node.id)
            .collect()
    }
}

/// Working copy of both collections, owned by one compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureRegistry {
    pub traits: FeatureSet,
    pub modules: FeatureSet,
}

impl FeatureRegistry {
    /// Fresh registry with every `used` flag cleared.
    pub fn standard() -> Self {
        Self {
            traits: FeatureSet::from_rows(FeatureKind::Trait, TRAIT_ROWS),
            modules: FeatureSet::from_rows(FeatureKind::Module, MODULE_ROWS),
        }
    }
}

impl Default for FeatureRegistry {
    fn default() -> Self {
        Self::standard()
    }
}
