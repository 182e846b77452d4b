//! Field-path resolution against the data-model registry.
//!
//! A slash path like `supervisor/username` is snake_cased component by
//! component and walked through the registry; every hop but the last
//! must be a relationship and registers a LEFT JOIN under a fresh alias.

use std::collections::HashMap;

use inflector::Inflector;
use sea_query::{Expr, Iden, JoinType, SelectStatement};

use crate::error::OdataError;
use crate::model::{EntityDef, FieldType, ModelRegistry, RelationKind, Relationship};

/// Identifier wrapper for dynamic table, alias and column names.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SqlIden(pub String);

impl Iden for SqlIden {
    fn unquoted(&self, s: &mut dyn std::fmt::Write) {
        write!(s, "{}", self.0).unwrap();
    }
}

/// A field path bound to a concrete column, carrying its declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedField {
    /// Table or join alias the column lives on.
    pub table: SqlIden,
    pub column: SqlIden,
    pub ty: FieldType,
}

/// Joins accumulated on one in-flight query, deduplicated by the
/// relationship path that produced them.
#[derive(Debug, Default)]
pub(crate) struct JoinSet {
    aliases: HashMap<Vec<String>, SqlIden>,
    seq: usize,
}

impl JoinSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn next_alias(&mut self, table: &str) -> SqlIden {
        self.seq += 1;
        SqlIden(format!("{}_{}", table, self.seq))
    }

    /// Return the alias for `path`, emitting the join(s) on first use.
    fn ensure(
        &mut self,
        select: &mut SelectStatement,
        path: &[String],
        source: &EntityDef,
        source_table: &SqlIden,
        rel: &Relationship,
        target: &EntityDef,
    ) -> SqlIden {
        if let Some(alias) = self.aliases.get(path) {
            return alias.clone();
        }
        let alias = self.next_alias(&target.table);
        match &rel.kind {
            RelationKind::BelongsTo { local_key } => {
                select.join_as(
                    JoinType::LeftJoin,
                    SqlIden(target.table.clone()),
                    alias.clone(),
                    Expr::col((source_table.clone(), SqlIden(local_key.clone())))
                        .equals((alias.clone(), SqlIden(target.key.clone()))),
                );
            }
            RelationKind::HasMany { remote_key } => {
                select.join_as(
                    JoinType::LeftJoin,
                    SqlIden(target.table.clone()),
                    alias.clone(),
                    Expr::col((source_table.clone(), SqlIden(source.key.clone())))
                        .equals((alias.clone(), SqlIden(remote_key.clone()))),
                );
            }
            RelationKind::ManyToMany {
                junction_table,
                local_key,
                remote_key,
            } => {
                let junction = self.next_alias(junction_table);
                select.join_as(
                    JoinType::LeftJoin,
                    SqlIden(junction_table.clone()),
                    junction.clone(),
                    Expr::col((source_table.clone(), SqlIden(source.key.clone())))
                        .equals((junction.clone(), SqlIden(local_key.clone()))),
                );
                select.join_as(
                    JoinType::LeftJoin,
                    SqlIden(target.table.clone()),
                    alias.clone(),
                    Expr::col((junction, SqlIden(remote_key.clone())))
                        .equals((alias.clone(), SqlIden(target.key.clone()))),
                );
            }
        }
        self.aliases.insert(path.to_vec(), alias.clone());
        alias
    }
}

/// Resolve a slash-separated field path starting at `root`, registering
/// any joins the query needs along the way.
pub(crate) fn resolve_field(
    registry: &ModelRegistry,
    root: &EntityDef,
    select: &mut SelectStatement,
    joins: &mut JoinSet,
    path: &str,
) -> Result<ResolvedField, OdataError> {
    let components: Vec<String> = path
        .trim()
        .split('/')
        .map(|component| component.to_snake_case())
        .collect();

    let mut entity = root;
    let mut table = SqlIden(root.table.clone());
    let mut prefix: Vec<String> = Vec::new();

    for (index, component) in components.iter().enumerate() {
        if index + 1 == components.len() {
            let ty = *entity.fields.get(component).ok_or_else(|| {
                OdataError::UnknownField {
                    entity: entity.name.clone(),
                    field: component.clone(),
                }
            })?;
            return Ok(ResolvedField {
                table,
                column: SqlIden(component.clone()),
                ty,
            });
        }
        let rel = match entity.relationships.get(component) {
            Some(rel) => rel,
            None if entity.fields.contains_key(component) => {
                return Err(OdataError::InvalidRelationshipStep {
                    entity: entity.name.clone(),
                    field: component.clone(),
                })
            }
            None => {
                return Err(OdataError::UnknownField {
                    entity: entity.name.clone(),
                    field: component.clone(),
                })
            }
        };
        prefix.push(component.clone());
        let target = registry.entity(&rel.target)?;
        table = joins.ensure(select, &prefix, entity, &table, rel, target);
        entity = target;
    }
    unreachable!("split('/') yields at least one component")
}
