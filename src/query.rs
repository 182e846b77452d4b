//! Per-request entry point: one parse pass over the odata parameters,
//! producing a ready-to-execute SELECT.

use log::{debug, info};
use sea_query::{Asterisk, Order, QueryBuilder, SelectStatement};
use serde::{Deserialize, Serialize};

use crate::builder;
use crate::error::OdataError;
use crate::model::{EntityDef, ModelRegistry};
use crate::resolver::{self, JoinSet, ResolvedField, SqlIden};
use crate::segment;

/// The odata query-string parameters, as deserialized by the boundary
/// layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    pub filter: Option<String>,
    pub orderby: Option<String>,
}

impl QueryParams {
    pub fn filter(filter: &str) -> Self {
        Self {
            filter: Some(filter.to_string()),
            orderby: None,
        }
    }

    pub fn orderby(orderby: &str) -> Self {
        Self {
            filter: None,
            orderby: Some(orderby.to_string()),
        }
    }
}

/// A built query, ready to hand to the execution backend.
#[derive(Debug, Clone)]
pub struct OdataQuery {
    select: SelectStatement,
}

impl OdataQuery {
    pub fn select(&self) -> &SelectStatement {
        &self.select
    }

    pub fn into_select(self) -> SelectStatement {
        self.select
    }

    /// Render the query for a concrete backend dialect.
    pub fn to_sql<T: QueryBuilder>(&self, query_builder: T) -> String {
        self.select.to_string(query_builder)
    }
}

/// Everything accumulated while building one query. Created fresh per
/// call and discarded once the final statement is handed back.
pub(crate) struct QueryState<'m> {
    pub(crate) registry: &'m ModelRegistry,
    pub(crate) root: &'m EntityDef,
    pub(crate) select: SelectStatement,
    pub(crate) joins: JoinSet,
}

impl<'m> QueryState<'m> {
    pub(crate) fn resolve(&mut self, path: &str) -> Result<ResolvedField, OdataError> {
        resolver::resolve_field(
            self.registry,
            self.root,
            &mut self.select,
            &mut self.joins,
            path,
        )
    }
}

/// Build a query for `entity` from odata parameters.
///
/// An absent or blank filter applies no predicate; an absent or blank
/// orderby falls back to `default_orderby` (which may also be absent).
/// The first structural or semantic error in either parameter is
/// returned as-is.
pub fn build_query(
    registry: &ModelRegistry,
    entity: &str,
    params: &QueryParams,
    default_orderby: Option<&str>,
) -> Result<OdataQuery, OdataError> {
    let root = registry.entity(entity)?;
    let mut select = SelectStatement::new();
    select.from(SqlIden(root.table.clone()));
    select.column((SqlIden(root.table.clone()), Asterisk));

    let mut state = QueryState {
        registry,
        root,
        select,
        joins: JoinSet::new(),
    };

    if let Some(filter) = present(params.filter.as_deref()) {
        info!("parsing filter string [{filter}]");
        let segments = segment::parse(filter)?;
        debug!("segments: {segments:?}");
        if let Some(predicate) = builder::build_filter(&mut state, &segments)? {
            state.select.and_where(predicate);
        }
    }

    if let Some(orderby) = present(params.orderby.as_deref()).or(default_orderby) {
        info!("parsing orderby string [{orderby}]");
        apply_orderby(&mut state, orderby)?;
    }

    Ok(OdataQuery {
        select: state.select,
    })
}

fn present(value: Option<&str>) -> Option<&str> {
    value.filter(|text| !text.trim().is_empty())
}

/// Parse `field [asc|desc]`, validate the field and add the sort.
fn apply_orderby(state: &mut QueryState<'_>, orderby: &str) -> Result<(), OdataError> {
    let tokens: Vec<&str> = orderby.split_whitespace().collect();
    if tokens.len() > 2 {
        return Err(OdataError::MalformedOrderby);
    }
    let order = match tokens.get(1) {
        None => Order::Asc,
        Some(direction) => match direction.to_lowercase().as_str() {
            "asc" => Order::Asc,
            "desc" => Order::Desc,
            _ => return Err(OdataError::InvalidOrderDirection),
        },
    };
    let field = state.resolve(tokens[0])?;
    state.select.order_by((field.table, field.column), order);
    Ok(())
}
