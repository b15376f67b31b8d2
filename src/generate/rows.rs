use super::node::NodeId;
use super::tree::GeneratorTree;
use crate::schema::Field;
use serde_json::Value;

/// One row: a slot per column, `None` when the document never set it.
pub type Row = Vec<Option<Value>>;

/// Rows accumulated for one entity.
#[derive(Debug, Clone)]
pub struct EntityRows {
    pub entity: &'static str,
    pub columns: Vec<Field>,
    pub rows: Vec<Row>,
}

impl EntityRows {
    /// Value of `column` in row `idx`, if set.
    pub fn value(&self, idx: usize, column: &str) -> Option<&Value> {
        let col = self.columns.iter().position(|f| f.name == column)?;
        self.rows.get(idx)?.get(col)?.as_ref()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Per-entity row lists, held in generator pre-order.
#[derive(Debug, Clone)]
pub struct RowSet {
    slots: Vec<Option<EntityRows>>,
}

impl RowSet {
    pub fn for_tree(tree: &GeneratorTree) -> Self {
        RowSet {
            slots: tree
                .nodes()
                .map(|node| {
                    node.entity.map(|entity| EntityRows {
                        entity,
                        columns: node.columns.clone(),
                        rows: Vec::new(),
                    })
                })
                .collect(),
        }
    }

    pub(crate) fn push(&mut self, node: NodeId, row: Row) {
        if let Some(Some(table)) = self.slots.get_mut(node) {
            table.rows.push(row);
        }
    }

    /// Every entity with its rows, parents before children. Entities
    /// without rows are included.
    pub fn tables(&self) -> impl DoubleEndedIterator<Item = &EntityRows> {
        self.slots.iter().flatten()
    }

    pub fn table(&self, entity: &str) -> Option<&EntityRows> {
        self.tables().find(|t| t.entity == entity)
    }

    pub fn total_rows(&self) -> usize {
        self.tables().map(|t| t.rows.len()).sum()
    }
}
