//! Node definitions: how one entity's slice of the document is parsed.

use crate::error::{LeadsError, Result};
use crate::schema::Field;
use serde_json::{Map, Value};

/// Index of a node inside its [`GeneratorTree`](super::GeneratorTree).
pub type NodeId = usize;

/// Per-node reshaping of raw document data into `(map_key, fields)` entries.
#[derive(Debug, Clone, PartialEq)]
pub enum Normalize {
    /// Data is already a map of entries.
    Identity,
    /// Data is a list of bare identifiers; each becomes an entry whose only
    /// field is `column`.
    ListToMap { column: &'static str },
    /// Data is a map of entries whose map key is also the value of `column`,
    /// unless the entry states `column` itself.
    KeyAsIdentity { column: &'static str },
    /// Data is one flat object; listed fields are renamed and the object is
    /// wrapped as a single entry under `key`.
    SingleEntry {
        key: &'static str,
        renames: &'static [(&'static str, &'static str)],
    },
    /// Data is a list of records, keyed by position.
    RecordList,
}

/// One normalized entry: the document map key and its field map.
pub type Entry = (String, Map<String, Value>);

impl Normalize {
    pub fn apply(&self, raw: &Value, node: &str, path: &str) -> Result<Vec<Entry>> {
        let shape_error = |expected| LeadsError::InvalidShape {
            node: node.to_string(),
            path: path.to_string(),
            expected,
        };

        match self {
            Normalize::Identity => entries_of(raw).ok_or_else(|| shape_error("a map of entries")),
            Normalize::KeyAsIdentity { column } => {
                let mut entries = entries_of(raw).ok_or_else(|| shape_error("a map of entries"))?;
                for (key, fields) in entries.iter_mut() {
                    fields
                        .entry(column.to_string())
                        .or_insert_with(|| Value::String(key.clone()));
                }
                Ok(entries)
            }
            Normalize::ListToMap { column } => {
                let Value::Array(items) = raw else {
                    return Err(shape_error("a list of identifiers"));
                };
                items
                    .iter()
                    .map(|item| -> Result<Entry> {
                        let key = scalar_to_string(item)
                            .ok_or_else(|| shape_error("a list of identifiers"))?;
                        let mut fields = Map::new();
                        fields.insert(column.to_string(), item.clone());
                        Ok((key, fields))
                    })
                    .collect()
            }
            Normalize::SingleEntry { key, renames } => {
                let Value::Object(object) = raw else {
                    return Err(shape_error("a single object"));
                };
                let fields = object
                    .iter()
                    .map(|(field, value)| {
                        let name = renames
                            .iter()
                            .find(|(from, _)| from == field)
                            .map(|(_, to)| to.to_string())
                            .unwrap_or_else(|| field.clone());
                        (name, value.clone())
                    })
                    .collect();
                Ok(vec![(key.to_string(), fields)])
            }
            Normalize::RecordList => {
                let Value::Array(items) = raw else {
                    return Err(shape_error("a list of records"));
                };
                items
                    .iter()
                    .enumerate()
                    .map(|(idx, item)| match item {
                        Value::Object(fields) => Ok((idx.to_string(), fields.clone())),
                        _ => Err(shape_error("a list of records")),
                    })
                    .collect()
            }
        }
    }
}

fn entries_of(raw: &Value) -> Option<Vec<Entry>> {
    let Value::Object(map) = raw else {
        return None;
    };
    map.iter()
        .map(|(key, value)| match value {
            Value::Object(fields) => Some((key.clone(), fields.clone())),
            Value::Null => Some((key.clone(), Map::new())),
            _ => None,
        })
        .collect()
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// The identity a node passes down as a foreign key: the entry's
/// `identity_field` when present and non-empty, otherwise the map key.
pub fn derive_identity(identity_field: &str, map_key: &str, fields: &Map<String, Value>) -> String {
    fields
        .get(identity_field)
        .and_then(scalar_to_string)
        .filter(|identity| !identity.is_empty())
        .unwrap_or_else(|| map_key.to_string())
}

/// A node of the generator tree, bound to one entity.
#[derive(Debug, Clone)]
pub struct NodeDef {
    pub id: NodeId,
    /// Non-owning back-reference used for diagnostics.
    pub parent: Option<NodeId>,
    /// Document key selecting this node under its parent.
    pub match_key: &'static str,
    /// `None` only for the root.
    pub entity: Option<&'static str>,
    /// Column name under which this node's identity reaches descendants.
    pub own_foreign_key: Option<&'static str>,
    pub identity_field: &'static str,
    pub normalize: Normalize,
    /// Inherited or document field name → column name.
    pub column_renames: &'static [(&'static str, &'static str)],
    pub children: Vec<NodeId>,
    /// Entity columns minus child keys, in declared order.
    pub columns: Vec<Field>,
}

impl NodeDef {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let name = self
            .column_renames
            .iter()
            .find(|(from, _)| *from == name)
            .map(|(_, to)| *to)
            .unwrap_or(name);
        self.columns.iter().position(|f| f.name == name)
    }

    pub fn entity_name(&self) -> &'static str {
        self.entity.unwrap_or("<root>")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_derive_identity() {
        assert_eq!(derive_identity("slug", "b1", &Map::new()), "b1");
        assert_eq!(derive_identity("slug", "b1", &fields(json!({"slug": "x"}))), "x");
        assert_eq!(derive_identity("slug", "b1", &fields(json!({"slug": ""}))), "b1");
        assert_eq!(derive_identity("slug", "y", &fields(json!({"slug": 2020}))), "2020");
        assert_eq!(derive_identity("code", "d1", &fields(json!({"slug": "x"}))), "d1");
    }

    #[test]
    fn test_list_to_map() {
        let normalize = Normalize::ListToMap { column: "year_slug" };
        let entries = normalize.apply(&json!([2020, 2021]), "years", "makes.honda.years").unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].0, "2020");
        assert_eq!(entries[0].1, fields(json!({"year_slug": 2020})));
        assert_eq!(entries[1].1, fields(json!({"year_slug": 2021})));
    }

    #[test]
    fn test_list_to_map_rejects_maps() {
        let normalize = Normalize::ListToMap { column: "year_slug" };
        let err = normalize.apply(&json!({"2020": {}}), "years", "p").unwrap_err();
        assert!(matches!(err, LeadsError::InvalidShape { expected: "a list of identifiers", .. }));
    }

    #[test]
    fn test_key_as_identity() {
        let normalize = Normalize::KeyAsIdentity { column: "make_slug" };
        let entries = normalize
            .apply(&json!({"honda": {"years": [2020]}, "ford": null}), "makes", "p")
            .unwrap();

        assert_eq!(entries[0].1, fields(json!({"years": [2020], "make_slug": "honda"})));
        assert_eq!(entries[1].1, fields(json!({"make_slug": "ford"})));

        let entries = normalize.apply(&json!({"Honda Motors": {"make_slug": "honda"}}), "makes", "p").unwrap();
        assert_eq!(entries[0].1, fields(json!({"make_slug": "honda"})));
    }

    #[test]
    fn test_single_entry_renames() {
        let normalize = Normalize::SingleEntry {
            key: "legacy",
            renames: &[("id", "legacy_id"), ("name", "legacy_name")],
        };
        let entries = normalize.apply(&json!({"id": 7, "name": "Old"}), "legacy", "p").unwrap();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].0, "legacy");
        assert_eq!(entries[0].1, fields(json!({"legacy_id": 7, "legacy_name": "Old"})));
    }

    #[test]
    fn test_record_list() {
        let entries = Normalize::RecordList
            .apply(&json!([{"zipcode": "10010"}, {"zipcode": "10011"}]), "coverage", "p")
            .unwrap();
        assert_eq!(entries[1].0, "1");
        assert_eq!(entries[1].1["zipcode"], "10011");

        assert!(Normalize::RecordList.apply(&json!(["10010"]), "coverage", "p").is_err());
    }
}
