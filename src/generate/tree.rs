//! The generator tree for the leads document.
//!
//! The tree is declared statically as nested [`NodeSpec`]s and compiled
//! against a [`SchemaRegistry`] into an arena of [`NodeDef`]s, so that every
//! entity name and column is resolved once, before any document is read.

use super::node::{NodeDef, NodeId, Normalize};
use crate::error::{LeadsError, Result};
use crate::schema::SchemaRegistry;
use std::collections::HashSet;

/// Static declaration of a node and its children.
#[derive(Debug)]
pub struct NodeSpec {
    pub match_key: &'static str,
    pub entity: &'static str,
    pub own_foreign_key: Option<&'static str>,
    pub identity_field: &'static str,
    pub normalize: Normalize,
    pub column_renames: &'static [(&'static str, &'static str)],
    pub children: &'static [NodeSpec],
}

impl NodeSpec {
    /// A map of entries identified by their `slug` field or map key.
    pub const fn entries(
        match_key: &'static str,
        entity: &'static str,
        own_foreign_key: Option<&'static str>,
        children: &'static [NodeSpec],
    ) -> Self {
        NodeSpec {
            match_key,
            entity,
            own_foreign_key,
            identity_field: "slug",
            normalize: Normalize::Identity,
            column_renames: &[],
            children,
        }
    }

    /// A map of entries whose key is the value of `column`.
    pub const fn keyed(
        match_key: &'static str,
        entity: &'static str,
        column: &'static str,
        children: &'static [NodeSpec],
    ) -> Self {
        NodeSpec {
            match_key,
            entity,
            own_foreign_key: Some(column),
            identity_field: "slug",
            normalize: Normalize::KeyAsIdentity { column },
            column_renames: &[],
            children,
        }
    }

    /// A bare list of years.
    pub const fn years(entity: &'static str) -> Self {
        NodeSpec {
            match_key: "years",
            entity,
            own_foreign_key: Some("year_slug"),
            identity_field: "slug",
            normalize: Normalize::ListToMap { column: "year_slug" },
            column_renames: &[],
            children: &[],
        }
    }
}

static MAKE_MODELS: &[NodeSpec] = &[NodeSpec::years("make_model_year")];
static MAKES: &[NodeSpec] = &[
    NodeSpec::years("make_year"),
    NodeSpec::entries("models", "make_model", Some("model_slug"), MAKE_MODELS),
];

static BUYER_MAKE_MODELS: &[NodeSpec] = &[NodeSpec::years("buyer_make_model_year")];
static BUYER_MAKES: &[NodeSpec] = &[
    NodeSpec::years("buyer_make_year"),
    NodeSpec::keyed("models", "buyer_make_model", "model_slug", BUYER_MAKE_MODELS),
];

static TIER_MAKE_MODELS: &[NodeSpec] = &[NodeSpec::years("buyer_tier_make_model_year")];
static TIER_MAKES: &[NodeSpec] = &[
    NodeSpec::years("buyer_tier_make_year"),
    NodeSpec::keyed("models", "buyer_tier_make_model", "model_slug", TIER_MAKE_MODELS),
];
static TIERS: &[NodeSpec] = &[
    NodeSpec {
        match_key: "legacy",
        entity: "legacy_buyer_tier",
        own_foreign_key: None,
        identity_field: "slug",
        normalize: Normalize::SingleEntry {
            key: "legacy",
            renames: &[("id", "legacy_id"), ("name", "legacy_name")],
        },
        column_renames: &[("tier_slug", "buyer_tier_slug")],
        children: &[],
    },
    NodeSpec::years("buyer_tier_year"),
    NodeSpec::keyed("makes", "buyer_tier_make", "make_slug", TIER_MAKES),
];

static DEALER_MAKE_MODELS: &[NodeSpec] = &[NodeSpec::years("buyer_dealer_make_model_year")];
static DEALER_MAKES: &[NodeSpec] = &[
    NodeSpec::years("buyer_dealer_make_year"),
    NodeSpec::keyed("models", "buyer_dealer_make_model", "model_slug", DEALER_MAKE_MODELS),
];
static DEALERS: &[NodeSpec] = &[
    NodeSpec::years("buyer_dealer_year"),
    NodeSpec::keyed("makes", "buyer_dealer_make", "make_slug", DEALER_MAKES),
    NodeSpec {
        match_key: "coverage",
        entity: "buyer_tier_dealer_coverage",
        own_foreign_key: None,
        identity_field: "slug",
        normalize: Normalize::RecordList,
        column_renames: &[],
        children: &[],
    },
];

static BUYERS: &[NodeSpec] = &[
    NodeSpec::years("buyer_year"),
    NodeSpec::keyed("makes", "buyer_make", "make_slug", BUYER_MAKES),
    NodeSpec::entries("tiers", "buyer_tier", Some("tier_slug"), TIERS),
    NodeSpec {
        match_key: "dealers",
        entity: "buyer_dealer",
        own_foreign_key: Some("dealer_code"),
        identity_field: "code",
        normalize: Normalize::KeyAsIdentity { column: "code" },
        column_renames: &[],
        children: DEALERS,
    },
];

static COUNTRIES: &[NodeSpec] = &[NodeSpec::entries("states", "country_state", None, &[])];

/// Top-level sections of the document. Sibling order is emission order, so
/// referenced sections come first.
pub static LEADS_SECTIONS: &[NodeSpec] = &[
    NodeSpec::entries("years", "year", None, &[]),
    NodeSpec::entries("countries", "country", Some("country_slug"), COUNTRIES),
    NodeSpec::entries("makes", "make", Some("make_slug"), MAKES),
    NodeSpec::entries("buyers", "buyer", Some("buyer_slug"), BUYERS),
];

/// Compiled generator tree. Node ids follow pre-order, so iterating nodes
/// by id visits parents before their children.
#[derive(Debug, Clone)]
pub struct GeneratorTree {
    nodes: Vec<NodeDef>,
}

impl GeneratorTree {
    /// The tree for the leads document.
    pub fn leads(registry: &SchemaRegistry) -> Result<Self> {
        Self::build(registry, LEADS_SECTIONS)
    }

    /// Compile top-level `sections` under a pass-through root.
    pub fn build(registry: &SchemaRegistry, sections: &'static [NodeSpec]) -> Result<Self> {
        let mut tree = GeneratorTree {
            nodes: vec![NodeDef {
                id: 0,
                parent: None,
                match_key: "",
                entity: None,
                own_foreign_key: None,
                identity_field: "slug",
                normalize: Normalize::Identity,
                column_renames: &[],
                children: Vec::new(),
                columns: Vec::new(),
            }],
        };
        let mut bound = HashSet::new();
        for spec in sections {
            let child = tree.add(registry, spec, 0, &mut bound)?;
            tree.nodes[0].children.push(child);
        }
        tree.check_unique_child_keys()?;
        Ok(tree)
    }

    fn add(
        &mut self,
        registry: &SchemaRegistry,
        spec: &'static NodeSpec,
        parent: NodeId,
        bound: &mut HashSet<&'static str>,
    ) -> Result<NodeId> {
        let entity = registry.get_entity(spec.entity)?;
        if !bound.insert(entity.name) {
            return Err(LeadsError::InvalidSchema(format!(
                "entity `{}` is bound to more than one node",
                entity.name
            )));
        }

        let child_keys: Vec<&str> = spec.children.iter().map(|c| c.match_key).collect();
        let columns = entity
            .fields
            .iter()
            .filter(|f| !child_keys.contains(&f.name))
            .cloned()
            .collect();

        let id = self.nodes.len();
        self.nodes.push(NodeDef {
            id,
            parent: Some(parent),
            match_key: spec.match_key,
            entity: Some(entity.name),
            own_foreign_key: spec.own_foreign_key,
            identity_field: spec.identity_field,
            normalize: spec.normalize.clone(),
            column_renames: spec.column_renames,
            children: Vec::new(),
            columns,
        });

        for child_spec in spec.children {
            let child = self.add(registry, child_spec, id, bound)?;
            self.nodes[id].children.push(child);
        }
        Ok(id)
    }

    fn check_unique_child_keys(&self) -> Result<()> {
        for node in &self.nodes {
            let mut keys = HashSet::new();
            for &child in &node.children {
                if !keys.insert(self.nodes[child].match_key) {
                    return Err(LeadsError::InvalidSchema(format!(
                        "key `{}` declared twice under `{}`",
                        self.nodes[child].match_key,
                        self.path_of(node.id)
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn root(&self) -> NodeId {
        0
    }

    pub fn node(&self, id: NodeId) -> &NodeDef {
        &self.nodes[id]
    }

    pub fn nodes(&self) -> impl Iterator<Item = &NodeDef> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Child of `id` selected by document key `key`.
    pub fn child_by_key(&self, id: NodeId, key: &str) -> Option<NodeId> {
        self.nodes[id]
            .children
            .iter()
            .copied()
            .find(|&child| self.nodes[child].match_key == key)
    }

    /// Dotted match-key path from the root, e.g. `buyers.tiers.makes`.
    pub fn path_of(&self, id: NodeId) -> String {
        let mut keys = Vec::new();
        let mut current = Some(id);
        while let Some(node_id) = current {
            let node = &self.nodes[node_id];
            if node.parent.is_some() {
                keys.push(node.match_key);
            }
            current = node.parent;
        }
        if keys.is_empty() {
            return "<root>".to_string();
        }
        keys.reverse();
        keys.join(".")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree() -> GeneratorTree {
        GeneratorTree::leads(&SchemaRegistry::new().unwrap()).unwrap()
    }

    fn find(tree: &GeneratorTree, entity: &str) -> NodeId {
        tree.nodes().find(|n| n.entity == Some(entity)).unwrap().id
    }

    #[test]
    fn test_every_table_has_a_node() {
        let registry = SchemaRegistry::new().unwrap();
        let tree = GeneratorTree::leads(&registry).unwrap();
        // root plus one node per entity
        assert_eq!(tree.len(), registry.entities().count() + 1);
    }

    #[test]
    fn test_child_lookup_and_paths() {
        let tree = tree();
        let buyers = tree.child_by_key(tree.root(), "buyers").unwrap();
        let tiers = tree.child_by_key(buyers, "tiers").unwrap();
        let makes = tree.child_by_key(tiers, "makes").unwrap();

        assert_eq!(tree.node(makes).entity, Some("buyer_tier_make"));
        assert_eq!(tree.path_of(makes), "buyers.tiers.makes");
        assert_eq!(tree.node(makes).parent, Some(tiers));
        assert!(tree.child_by_key(tiers, "dealers").is_none());
    }

    #[test]
    fn test_preorder_respects_foreign_keys() {
        let registry = SchemaRegistry::new().unwrap();
        let tree = GeneratorTree::leads(&registry).unwrap();

        for entity in registry.entities() {
            for fk in &entity.foreign_keys {
                assert!(
                    find(&tree, fk.references) < find(&tree, entity.name),
                    "{} must be emitted before {}",
                    fk.references,
                    entity.name
                );
            }
        }
    }

    #[test]
    fn test_columns_follow_declaration_order() {
        let tree = tree();
        let dealer = tree.node(find(&tree, "buyer_dealer"));
        let names: Vec<_> = dealer.columns.iter().map(|f| f.name).collect();
        assert_eq!(
            names,
            vec!["buyer_slug", "code", "name", "address", "city", "state", "zipcode", "country_slug", "phone"]
        );

        let legacy = tree.node(find(&tree, "legacy_buyer_tier"));
        assert_eq!(legacy.column_index("tier_slug"), Some(1));
    }

    static DUPLICATE: &[NodeSpec] = &[
        NodeSpec::entries("makes", "make", Some("make_slug"), &[]),
        NodeSpec::entries("brands", "make", Some("make_slug"), &[]),
    ];

    static UNKNOWN: &[NodeSpec] = &[NodeSpec::entries("dealers", "dealer", None, &[])];

    #[test]
    fn test_build_errors() {
        let registry = SchemaRegistry::new().unwrap();
        assert!(matches!(
            GeneratorTree::build(&registry, DUPLICATE),
            Err(LeadsError::InvalidSchema(_))
        ));
        assert!(matches!(
            GeneratorTree::build(&registry, UNKNOWN),
            Err(LeadsError::UnknownEntity(_))
        ));
    }
}
