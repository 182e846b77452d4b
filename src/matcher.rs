//! Operator matchers for leaf filter clauses.
//!
//! Each matcher recognizes one clause shape and extracts its parts into a
//! tagged [`Clause`]. Matchers are tried in a fixed priority order:
//! function-style operators and `in` before the generic comparisons, so a
//! comma inside `contains(...)` or an `in` list is never mistaken for
//! clause structure. The first match wins; no match is an
//! [`OdataError::UnknownOperator`].

use crate::error::OdataError;

/// Substring-style filter functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterFunc {
    Contains,
    StartsWith,
    EndsWith,
}

/// Ordered comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
}

/// Literals that compare by identity rather than by value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentityLiteral {
    Null,
    True,
    False,
}

/// One recognized filter clause, fields still unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Clause<'a> {
    /// `contains(field,'v')` and friends. The literal must be quoted.
    Function {
        func: FilterFunc,
        field: &'a str,
        value: String,
    },
    /// `field eq null|true|false` / `field ne ...`: identity comparison,
    /// not string equality.
    Identity {
        field: &'a str,
        negated: bool,
        literal: IdentityLiteral,
    },
    /// `field in (v1, v2, ...)`.
    Membership { field: &'a str, values: Vec<String> },
    /// `field op literal` with a value-coerced literal.
    Compare {
        field: &'a str,
        op: CompareOp,
        value: String,
    },
}

/// Try every matcher in priority order against one leaf clause.
pub fn match_clause(text: &str) -> Result<Clause<'_>, OdataError> {
    match_function(text)
        .or_else(|| match_identity(text))
        .or_else(|| match_membership(text))
        .or_else(|| match_compare(text))
        .ok_or_else(|| OdataError::UnknownOperator(text.to_string()))
}

const FUNCTIONS: [(&str, FilterFunc); 3] = [
    ("contains", FilterFunc::Contains),
    ("startswith", FilterFunc::StartsWith),
    ("endswith", FilterFunc::EndsWith),
];

fn match_function(text: &str) -> Option<Clause<'_>> {
    for (name, func) in FUNCTIONS {
        let Some(rest) = text.strip_prefix(name) else {
            continue;
        };
        let Some(args) = rest
            .strip_prefix('(')
            .and_then(|args| args.strip_suffix(')'))
        else {
            continue;
        };
        let Some((field, literal)) = args.split_once(',') else {
            continue;
        };
        let Some(value) = strip_quotes(literal.trim()) else {
            continue;
        };
        return Some(Clause::Function {
            func,
            field: field.trim(),
            value: value.to_string(),
        });
    }
    None
}

fn match_identity(text: &str) -> Option<Clause<'_>> {
    let mut tokens = text.split_whitespace();
    let (field, op, literal) = (tokens.next()?, tokens.next()?, tokens.next()?);
    if tokens.next().is_some() {
        return None;
    }
    let negated = match op {
        "eq" => false,
        "ne" => true,
        _ => return None,
    };
    let literal = match literal {
        "null" => IdentityLiteral::Null,
        "true" => IdentityLiteral::True,
        "false" => IdentityLiteral::False,
        _ => return None,
    };
    Some(Clause::Identity {
        field,
        negated,
        literal,
    })
}

fn match_membership(text: &str) -> Option<Clause<'_>> {
    let (field, rest) = text.split_once(" in")?;
    let field = field.trim();
    if field.is_empty() || field.contains(char::is_whitespace) {
        return None;
    }
    let list = rest
        .trim_start()
        .strip_prefix('(')
        .and_then(|list| list.strip_suffix(')'))?;
    let values = list
        .split(',')
        .map(|value| value.trim().trim_matches(['\'', '"']).to_string())
        .collect();
    Some(Clause::Membership { field, values })
}

const COMPARISONS: [(&str, CompareOp); 6] = [
    ("eq", CompareOp::Eq),
    ("ne", CompareOp::Ne),
    ("gt", CompareOp::Gt),
    ("lt", CompareOp::Lt),
    ("ge", CompareOp::Ge),
    ("le", CompareOp::Le),
];

fn match_compare(text: &str) -> Option<Clause<'_>> {
    for (name, op) in COMPARISONS {
        let Some((field, literal)) = split_on_operator(text, name) else {
            continue;
        };
        let literal = literal.trim();
        let value = strip_quotes(literal).unwrap_or(literal);
        return Some(Clause::Compare {
            field,
            op,
            value: value.to_string(),
        });
    }
    None
}

/// Split `field op literal` on the first ` op ` whose left side is a
/// single token.
fn split_on_operator<'a>(text: &'a str, op: &str) -> Option<(&'a str, &'a str)> {
    let pattern = format!(" {op} ");
    let (field, literal) = text.split_once(&pattern)?;
    let field = field.trim();
    if field.is_empty() || field.contains(char::is_whitespace) {
        return None;
    }
    Some((field, literal))
}

/// Return the inner text when the literal is wrapped in matching quotes.
fn strip_quotes(literal: &str) -> Option<&str> {
    let mut chars = literal.chars();
    let (first, last) = (chars.next()?, chars.next_back()?);
    if first == last && (first == '\'' || first == '"') {
        Some(&literal[1..literal.len() - 1])
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains() {
        let clause = match_clause("contains(note,'backup')").unwrap();
        assert_eq!(
            clause,
            Clause::Function {
                func: FilterFunc::Contains,
                field: "note",
                value: "backup".to_string(),
            }
        );
    }

    #[test]
    fn test_startswith_endswith() {
        assert!(matches!(
            match_clause("startswith(username,'od')").unwrap(),
            Clause::Function {
                func: FilterFunc::StartsWith,
                ..
            }
        ));
        assert!(matches!(
            match_clause("endswith(username, \"2\")").unwrap(),
            Clause::Function {
                func: FilterFunc::EndsWith,
                ..
            }
        ));
    }

    #[test]
    fn test_identity_wins_over_generic_eq() {
        let clause = match_clause("note eq null").unwrap();
        assert_eq!(
            clause,
            Clause::Identity {
                field: "note",
                negated: false,
                literal: IdentityLiteral::Null,
            }
        );
        let clause = match_clause("isActive ne true").unwrap();
        assert_eq!(
            clause,
            Clause::Identity {
                field: "isActive",
                negated: true,
                literal: IdentityLiteral::True,
            }
        );
    }

    #[test]
    fn test_membership() {
        let clause = match_clause("id in (1, 3)").unwrap();
        assert_eq!(
            clause,
            Clause::Membership {
                field: "id",
                values: vec!["1".to_string(), "3".to_string()],
            }
        );
        // No space before the list is accepted too.
        let clause = match_clause("username in('user2', \"odd\")").unwrap();
        assert_eq!(
            clause,
            Clause::Membership {
                field: "username",
                values: vec!["user2".to_string(), "odd".to_string()],
            }
        );
    }

    #[test]
    fn test_comparisons() {
        assert_eq!(
            match_clause("logins ge 51").unwrap(),
            Clause::Compare {
                field: "logins",
                op: CompareOp::Ge,
                value: "51".to_string(),
            }
        );
        assert_eq!(
            match_clause("username eq 'user1'").unwrap(),
            Clause::Compare {
                field: "username",
                op: CompareOp::Eq,
                value: "user1".to_string(),
            }
        );
        assert_eq!(
            match_clause("created gt 2020-05-01T01:00:00").unwrap(),
            Clause::Compare {
                field: "created",
                op: CompareOp::Gt,
                value: "2020-05-01T01:00:00".to_string(),
            }
        );
    }

    #[test]
    fn test_path_fields_pass_through() {
        assert_eq!(
            match_clause("supervisor/username eq 'user1'").unwrap(),
            Clause::Compare {
                field: "supervisor/username",
                op: CompareOp::Eq,
                value: "user1".to_string(),
            }
        );
    }

    #[test]
    fn test_unknown_operator() {
        let err = match_clause("logins near 51").unwrap_err();
        assert_eq!(
            err.to_string(),
            "No available filter matches segment logins near 51"
        );
    }

    #[test]
    fn test_unquoted_function_argument_is_rejected() {
        assert!(match_clause("contains(note,backup)").is_err());
    }
}
