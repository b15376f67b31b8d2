use super::tables::ALL_TABLES;
use super::types::{Entity, TableDef};
use crate::error::{LeadsError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::{HashMap, HashSet};

static IDENTIFIER_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z_][a-z0-9_]*$").expect("valid identifier pattern"));

/// Immutable lookup of every entity, validated once at construction.
#[derive(Debug, Clone)]
pub struct SchemaRegistry {
    entities: Vec<Entity>,
    by_name: HashMap<&'static str, usize>,
}

impl SchemaRegistry {
    /// The registry for the leads schema.
    pub fn new() -> Result<Self> {
        Self::from_tables(ALL_TABLES)
    }

    /// Compile and validate a set of table definitions.
    pub fn from_tables(defs: &[&'static TableDef]) -> Result<Self> {
        let mut entities = Vec::with_capacity(defs.len());
        let mut by_name = HashMap::with_capacity(defs.len());

        for &def in defs {
            validate_identifiers(def)?;
            if by_name.insert(def.name, entities.len()).is_some() {
                return Err(LeadsError::InvalidSchema(format!(
                    "table `{}` declared twice",
                    def.name
                )));
            }
            entities.push(Entity::compile(def)?);
        }

        let registry = SchemaRegistry { entities, by_name };
        for entity in &registry.entities {
            registry.validate_keys(entity)?;
        }
        Ok(registry)
    }

    pub fn get_entity(&self, name: &str) -> Result<&Entity> {
        self.by_name
            .get(name)
            .map(|&idx| &self.entities[idx])
            .ok_or_else(|| LeadsError::UnknownEntity(name.to_string()))
    }

    /// Entities in declaration order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Entity names ordered so that every referenced entity comes before
    /// the entities that reference it. Ties keep declaration order.
    pub fn topological_order(&self) -> Result<Vec<&'static str>> {
        let mut ordered = Vec::with_capacity(self.entities.len());
        let mut placed: HashSet<&str> = HashSet::new();

        while ordered.len() < self.entities.len() {
            let ready = self.entities.iter().find(|entity| {
                !placed.contains(entity.name)
                    && entity
                        .foreign_keys
                        .iter()
                        .all(|fk| fk.references == entity.name || placed.contains(fk.references))
            });

            let Some(entity) = ready else {
                let stuck: Vec<_> = self
                    .entities
                    .iter()
                    .map(|e| e.name)
                    .filter(|name| !placed.contains(name))
                    .collect();
                return Err(LeadsError::InvalidSchema(format!(
                    "foreign key cycle between {}",
                    stuck.join(", ")
                )));
            };

            placed.insert(entity.name);
            ordered.push(entity.name);
        }

        Ok(ordered)
    }

    fn validate_keys(&self, entity: &Entity) -> Result<()> {
        if entity.primary_key.is_empty() {
            return Err(LeadsError::InvalidSchema(format!(
                "table `{}` has no primary key",
                entity.name
            )));
        }

        for key in &entity.unique_keys {
            if let Some(column) = key.iter().find(|c| !entity.has_column(c)) {
                return Err(LeadsError::InvalidSchema(format!(
                    "unique key on `{}` names unknown column `{column}`",
                    entity.name
                )));
            }
        }

        for fk in &entity.foreign_keys {
            if let Some(column) = fk.columns.iter().find(|c| !entity.has_column(c)) {
                return Err(LeadsError::InvalidSchema(format!(
                    "foreign key on `{}` names unknown column `{column}`",
                    entity.name
                )));
            }
            if fk.columns.len() != fk.referenced_columns.len() {
                return Err(LeadsError::InvalidSchema(format!(
                    "foreign key ({}) on `{}` has {} referenced columns",
                    fk.columns.join(", "),
                    entity.name,
                    fk.referenced_columns.len()
                )));
            }

            let target = self.get_entity(fk.references).map_err(|_| {
                LeadsError::InvalidSchema(format!(
                    "foreign key on `{}` references unknown table `{}`",
                    entity.name, fk.references
                ))
            })?;
            if !target.is_key(&fk.referenced_columns) {
                return Err(LeadsError::InvalidSchema(format!(
                    "foreign key on `{}` references ({}) which is not a key of `{}`",
                    entity.name,
                    fk.referenced_columns.join(", "),
                    target.name
                )));
            }
        }

        Ok(())
    }
}

fn validate_identifiers(def: &TableDef) -> Result<()> {
    let names = std::iter::once(def.name).chain(def.columns.iter().map(|c| c.name));
    let mut seen = HashSet::new();
    for (idx, name) in names.enumerate() {
        if !IDENTIFIER_REGEX.is_match(name) {
            return Err(LeadsError::InvalidSchema(format!(
                "`{name}` in table `{}` is not a valid identifier",
                def.name
            )));
        }
        // the table name itself may coincide with a column name
        if idx > 0 && !seen.insert(name) {
            return Err(LeadsError::InvalidSchema(format!(
                "column `{name}` declared twice in table `{}`",
                def.name
            )));
        }
    }
    Ok(())
}
