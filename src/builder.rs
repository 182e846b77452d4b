//! Builds one predicate from a segment tree.
//!
//! Children are walked left to right with a running junction and an
//! accumulator. When a leaf's junction differs from the running one the
//! accumulated predicates are flushed under the running junction and a
//! new run starts. A nested group is combined with the clause
//! immediately preceding it under the group's own outer junction, so
//! `a and (b or c)` becomes `a AND (b OR c)` without a spurious extra
//! layer. Whatever remains at the end is flushed under the last-seen
//! junction, defaulting to AND.

use sea_query::{Expr, SimpleExpr};

use crate::error::OdataError;
use crate::matcher::{self, Clause, CompareOp, FilterFunc, IdentityLiteral};
use crate::query::QueryState;
use crate::segment::{Junction, Segment};
use crate::value;

/// Build the root predicate for a parsed filter, if any clause survives.
pub(crate) fn build_filter(
    state: &mut QueryState<'_>,
    segments: &[Segment],
) -> Result<Option<SimpleExpr>, OdataError> {
    let filters = build_group(state, segments)?;
    Ok(filters.into_iter().reduce(|acc, expr| acc.and(expr)))
}

fn build_group(
    state: &mut QueryState<'_>,
    segments: &[Segment],
) -> Result<Vec<SimpleExpr>, OdataError> {
    let mut filters: Vec<SimpleExpr> = Vec::new();
    let mut expressions: Vec<SimpleExpr> = Vec::new();
    let mut junction: Option<Junction> = None;

    for segment in segments {
        if let Some(text) = &segment.expression {
            let predicate = build_clause(state, text)?;
            match (junction, segment.junction) {
                (None, next) => junction = next,
                (Some(current), Some(next)) if current != next && !expressions.is_empty() => {
                    if let Some(flushed) = combine(current, std::mem::take(&mut expressions)) {
                        filters.push(flushed);
                    }
                    junction = Some(next);
                }
                _ => {}
            }
            expressions.push(predicate);
        }
        if !segment.children.is_empty() {
            let inner = build_group(state, &segment.children)?;
            let outer = segment.junction.unwrap_or(Junction::And);
            // The clause just before the group is folded into it under
            // the group's outer junction.
            let nested = match expressions.pop() {
                Some(target) => combine(outer, std::iter::once(target).chain(inner).collect()),
                None => combine(outer, inner),
            };
            if let Some(nested) = nested {
                expressions.push(nested);
            }
        }
    }

    if !expressions.is_empty() {
        let last = junction.unwrap_or(Junction::And);
        if let Some(flushed) = combine(last, expressions) {
            filters.push(flushed);
        }
    }
    Ok(filters)
}

fn combine(junction: Junction, expressions: Vec<SimpleExpr>) -> Option<SimpleExpr> {
    expressions.into_iter().reduce(|acc, expr| match junction {
        Junction::And => acc.and(expr),
        Junction::Or => acc.or(expr),
    })
}

/// Match one leaf clause and turn it into a predicate over the resolved
/// column.
fn build_clause(state: &mut QueryState<'_>, text: &str) -> Result<SimpleExpr, OdataError> {
    match matcher::match_clause(text)? {
        Clause::Function { func, field, value } => {
            let field = state.resolve(field)?;
            let col = Expr::col((field.table, field.column));
            Ok(match func {
                FilterFunc::Contains => col.like(format!("%{value}%")),
                FilterFunc::StartsWith => col.like(format!("{value}%")),
                FilterFunc::EndsWith => col.like(format!("%{value}")),
            })
        }
        Clause::Identity {
            field,
            negated,
            literal,
        } => {
            let field = state.resolve(field)?;
            let col = Expr::col((field.table, field.column));
            Ok(match (literal, negated) {
                (IdentityLiteral::Null, false) => col.is_null(),
                (IdentityLiteral::Null, true) => col.is_not_null(),
                (IdentityLiteral::True, false) => col.eq(true),
                (IdentityLiteral::True, true) => col.ne(true),
                (IdentityLiteral::False, false) => col.eq(false),
                (IdentityLiteral::False, true) => col.ne(false),
            })
        }
        Clause::Membership { field, values } => {
            let field = state.resolve(field)?;
            let values = values
                .iter()
                .map(|value| value::coerce(field.ty, value))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Expr::col((field.table, field.column)).is_in(values))
        }
        Clause::Compare { field, op, value } => {
            let field = state.resolve(field)?;
            let value = value::coerce(field.ty, &value)?;
            let col = Expr::col((field.table, field.column));
            Ok(match op {
                CompareOp::Eq => col.eq(value),
                CompareOp::Ne => col.ne(value),
                CompareOp::Gt => col.gt(value),
                CompareOp::Lt => col.lt(value),
                CompareOp::Ge => col.gte(value),
                CompareOp::Le => col.lte(value),
            })
        }
    }
}
