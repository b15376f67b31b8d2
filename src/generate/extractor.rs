use super::node::{derive_identity, NodeDef, NodeId};
use super::rows::{Row, RowSet};
use super::tree::GeneratorTree;
use crate::error::{LeadsError, Result};
use serde_json::{Map, Value};
use tracing::{debug, info};

/// Foreign-key values inherited from ancestors, in the order they were
/// contributed.
type ForeignData = Vec<(&'static str, Value)>;

/// Walks a document against a [`GeneratorTree`] and accumulates one row
/// per entry for every entity, carrying ancestor keys down the tree.
pub struct RowExtractor<'a> {
    tree: &'a GeneratorTree,
    validate_required: bool,
}

impl<'a> RowExtractor<'a> {
    pub fn new(tree: &'a GeneratorTree) -> Self {
        RowExtractor {
            tree,
            validate_required: true,
        }
    }

    /// Toggle required-value checks during extraction.
    pub fn validate_required(mut self, enabled: bool) -> Self {
        self.validate_required = enabled;
        self
    }

    /// Extract every row of the document. Any error aborts the whole run
    /// and no rows are returned.
    pub fn extract(&self, document: &Value) -> Result<RowSet> {
        let mut rows = RowSet::for_tree(self.tree);
        let root = self.tree.root();

        match document {
            Value::Null => {}
            Value::Object(sections) => {
                for (key, raw) in sections {
                    let child = self.tree.child_by_key(root, key).ok_or_else(|| {
                        LeadsError::UnrecognizedKey {
                            key: key.clone(),
                            node: self.tree.path_of(root),
                            entity: self.tree.node(root).entity_name().to_string(),
                            path: String::new(),
                        }
                    })?;
                    self.extract_node(child, raw, &Vec::new(), key, &mut rows)?;
                }
            }
            _ => {
                return Err(LeadsError::InvalidShape {
                    node: self.tree.path_of(root),
                    path: String::new(),
                    expected: "a map of top-level sections",
                })
            }
        }

        info!(
            tables = rows.tables().filter(|t| !t.is_empty()).count(),
            rows = rows.total_rows(),
            "extracted rows from document"
        );
        Ok(rows)
    }

    fn extract_node(
        &self,
        id: NodeId,
        raw: &Value,
        foreign: &ForeignData,
        path: &str,
        rows: &mut RowSet,
    ) -> Result<()> {
        if is_empty(raw) {
            return Ok(());
        }

        let node = self.tree.node(id);
        let entries = node.normalize.apply(raw, &self.tree.path_of(id), path)?;
        debug!(node = %self.tree.path_of(id), entries = entries.len(), "extracting");

        for (map_key, fields) in entries {
            let entry_path = format!("{path}.{map_key}");

            let mut sub_foreign = foreign.clone();
            if let Some(column) = node.own_foreign_key {
                let identity = derive_identity(node.identity_field, &map_key, &fields);
                set_foreign(&mut sub_foreign, column, Value::String(identity));
            }

            let mut row: Row = vec![None; node.columns.len()];
            let mut nested = Vec::new();

            for (field, value) in &fields {
                if let Some(col) = node.column_index(field) {
                    row[col] = Some(value.clone());
                } else if let Some(child) = self.tree.child_by_key(id, field) {
                    nested.push((child, field, value));
                } else {
                    return Err(LeadsError::UnrecognizedKey {
                        key: field.clone(),
                        node: self.tree.path_of(id),
                        entity: node.entity_name().to_string(),
                        path: entry_path,
                    });
                }
            }

            // Inherited keys always land in their columns. Keys this entity
            // has no column for were not written in the document, so they
            // are dropped instead of rejected.
            for (field, value) in foreign {
                if let Some(col) = node.column_index(field) {
                    row[col] = Some(value.clone());
                }
            }

            if self.validate_required {
                check_required(node, &row, &entry_path)?;
            }
            rows.push(id, row);

            for (child, field, value) in nested {
                let child_path = format!("{entry_path}.{field}");
                self.extract_node(child, value, &sub_foreign, &child_path, rows)?;
            }
        }

        Ok(())
    }
}

fn set_foreign(foreign: &mut ForeignData, column: &'static str, value: Value) {
    match foreign.iter_mut().find(|(name, _)| *name == column) {
        Some(slot) => slot.1 = value,
        None => foreign.push((column, value)),
    }
}

fn check_required(node: &NodeDef, row: &Row, path: &str) -> Result<()> {
    for (field, slot) in node.columns.iter().zip(row) {
        let missing = matches!(slot, None | Some(Value::Null));
        if missing && !field.nullable {
            return Err(LeadsError::MissingRequiredValue {
                entity: node.entity_name().to_string(),
                column: field.name.to_string(),
                path: path.to_string(),
            });
        }
    }
    Ok(())
}

fn is_empty(raw: &Value) -> bool {
    match raw {
        Value::Null => true,
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => Map::is_empty(map),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::SchemaRegistry;
    use serde_json::json;

    fn tree() -> GeneratorTree {
        GeneratorTree::leads(&SchemaRegistry::new().unwrap()).unwrap()
    }

    fn column<'r>(rows: &'r RowSet, entity: &str, idx: usize, column: &str) -> Option<&'r Value> {
        rows.table(entity).unwrap().value(idx, column)
    }

    #[test]
    fn test_top_level_entities() {
        let tree = tree();
        let doc = json!({
            "years": {"2020": {"slug": "2020", "name": "2020"}},
            "makes": {"honda": {"slug": "honda", "name": "Honda"}}
        });

        let rows = RowExtractor::new(&tree).extract(&doc).unwrap();
        assert_eq!(rows.total_rows(), 2);
        assert_eq!(column(&rows, "make", 0, "name").unwrap(), "Honda");
        assert_eq!(column(&rows, "year", 0, "slug").unwrap(), "2020");
    }

    #[test]
    fn test_foreign_keys_accumulate_down_the_tree() {
        let tree = tree();
        let doc = json!({
            "buyers": {
                "b1": {
                    "slug": "b1",
                    "name": "Buyer One",
                    "tiers": {
                        "t1": {
                            "slug": "t1",
                            "name": "Tier One",
                            "makes": {
                                "honda": {"models": {"civic": {"years": [2020]}}}
                            }
                        }
                    }
                }
            }
        });

        let rows = RowExtractor::new(&tree).extract(&doc).unwrap();

        let leaf = rows.table("buyer_tier_make_model_year").unwrap();
        assert_eq!(leaf.rows.len(), 1);
        assert_eq!(leaf.value(0, "buyer_slug").unwrap(), "b1");
        assert_eq!(leaf.value(0, "tier_slug").unwrap(), "t1");
        assert_eq!(leaf.value(0, "make_slug").unwrap(), "honda");
        assert_eq!(leaf.value(0, "model_slug").unwrap(), "civic");
        assert_eq!(leaf.value(0, "year_slug").unwrap(), 2020);

        let tier_make = rows.table("buyer_tier_make").unwrap();
        assert_eq!(tier_make.rows[0].len(), 3);
        assert_eq!(tier_make.value(0, "tier_slug").unwrap(), "t1");
    }

    #[test]
    fn test_year_list_expansion() {
        let tree = tree();
        let doc = json!({"makes": {"honda": {"slug": "honda", "name": "Honda", "years": [2020, 2021]}}});

        let rows = RowExtractor::new(&tree).extract(&doc).unwrap();
        let years = rows.table("make_year").unwrap();

        assert_eq!(years.rows.len(), 2);
        assert_eq!(years.value(0, "make_slug").unwrap(), "honda");
        assert_eq!(years.value(0, "year_slug").unwrap(), 2020);
        assert_eq!(years.value(1, "year_slug").unwrap(), 2021);
        assert!(years.rows.iter().all(|row| row.len() == 2));
    }

    #[test]
    fn test_identity_prefers_slug_field() {
        let tree = tree();
        let doc = json!({
            "makes": {
                "Honda Motors": {"slug": "honda", "name": "Honda", "models": {"m": {"slug": "civic", "name": "Civic"}}}
            }
        });

        let rows = RowExtractor::new(&tree).extract(&doc).unwrap();
        assert_eq!(column(&rows, "make_model", 0, "make_slug").unwrap(), "honda");
        assert_eq!(column(&rows, "make_model", 0, "slug").unwrap(), "civic");
    }

    #[test]
    fn test_dealer_code_from_map_key() {
        let tree = tree();
        let doc = json!({
            "buyers": {
                "b1": {
                    "slug": "b1",
                    "name": "Buyer One",
                    "dealers": {
                        "d1": {
                            "name": "Dealer A",
                            "zipcode": "10020",
                            "makes": {"honda": {"years": [2021]}},
                            "coverage": [
                                {"buyer_tier_slug": "t1", "zipcode": "10010", "distance": 10}
                            ]
                        }
                    }
                }
            }
        });

        let rows = RowExtractor::new(&tree).extract(&doc).unwrap();
        assert_eq!(column(&rows, "buyer_dealer", 0, "code").unwrap(), "d1");
        assert_eq!(column(&rows, "buyer_dealer", 0, "phone"), None);
        assert_eq!(column(&rows, "buyer_dealer_make_year", 0, "dealer_code").unwrap(), "d1");

        let coverage = rows.table("buyer_tier_dealer_coverage").unwrap();
        assert_eq!(coverage.value(0, "dealer_code").unwrap(), "d1");
        assert_eq!(coverage.value(0, "buyer_tier_slug").unwrap(), "t1");
        assert_eq!(coverage.value(0, "distance").unwrap(), 10);
    }

    #[test]
    fn test_explicit_dealer_code_wins_over_map_key() {
        let tree = tree();
        let doc = json!({
            "buyers": {"b1": {"slug": "b1", "name": "Buyer One", "dealers": {
                "Dealer One": {"code": "d1", "name": "Dealer One", "years": [2020]}
            }}}
        });

        let rows = RowExtractor::new(&tree).extract(&doc).unwrap();
        assert_eq!(column(&rows, "buyer_dealer", 0, "code").unwrap(), "d1");
        assert_eq!(column(&rows, "buyer_dealer_year", 0, "dealer_code").unwrap(), "d1");
    }

    #[test]
    fn test_legacy_tier() {
        let tree = tree();
        let doc = json!({
            "buyers": {"b1": {"slug": "b1", "name": "B", "tiers": {
                "t1": {"slug": "t1", "name": "T", "legacy": {"id": 42, "name": "Old Tier"}}
            }}}
        });

        let rows = RowExtractor::new(&tree).extract(&doc).unwrap();
        let legacy = rows.table("legacy_buyer_tier").unwrap();
        assert_eq!(legacy.value(0, "buyer_slug").unwrap(), "b1");
        assert_eq!(legacy.value(0, "buyer_tier_slug").unwrap(), "t1");
        assert_eq!(legacy.value(0, "legacy_id").unwrap(), 42);
        assert_eq!(legacy.value(0, "legacy_name").unwrap(), "Old Tier");
    }

    #[test]
    fn test_unrecognized_key_at_any_level() {
        let tree = tree();
        let documents = [
            json!({"bogus": {}}),
            json!({"makes": {"honda": {"slug": "honda", "name": "Honda", "bogus": 1}}}),
            json!({"buyers": {"b1": {"slug": "b1", "name": "B", "tiers": {
                "t1": {"slug": "t1", "name": "T", "makes": {"honda": {"bogus": [1]}}}
            }}}}),
        ];

        for doc in &documents {
            let err = RowExtractor::new(&tree).extract(doc).unwrap_err();
            assert!(
                matches!(err, LeadsError::UnrecognizedKey { ref key, .. } if key == "bogus"),
                "{err}"
            );
        }

        let err = RowExtractor::new(&tree).extract(&documents[2]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("buyers.tiers.makes"), "{message}");
        assert!(message.contains("buyer_tier_make"), "{message}");
        assert!(message.contains("buyers.b1.tiers.t1.makes.honda"), "{message}");
    }

    #[test]
    fn test_missing_required_value() {
        let tree = tree();
        let doc = json!({"makes": {"honda": {"slug": "honda"}}});

        let err = RowExtractor::new(&tree).extract(&doc).unwrap_err();
        assert!(matches!(
            err,
            LeadsError::MissingRequiredValue { ref entity, ref column, .. }
                if entity == "make" && column == "name"
        ));

        let rows = RowExtractor::new(&tree).validate_required(false).extract(&doc).unwrap();
        assert_eq!(column(&rows, "make", 0, "name"), None);
    }

    #[test]
    fn test_empty_sections_are_skipped() {
        let tree = tree();
        let doc = json!({"years": null, "makes": {}, "buyers": {"b1": {"slug": "b1", "name": "B", "years": []}}});

        let rows = RowExtractor::new(&tree).extract(&doc).unwrap();
        assert_eq!(rows.total_rows(), 1);
    }

    #[test]
    fn test_invalid_shape() {
        let tree = tree();
        let doc = json!({"makes": [{"slug": "honda"}]});
        let err = RowExtractor::new(&tree).extract(&doc).unwrap_err();
        assert!(matches!(err, LeadsError::InvalidShape { .. }));
    }
}
