//! Request-level errors raised while parsing a filter or orderby string.
//!
//! Every variant is a user error: the input was malformed or referenced
//! something the data model does not declare. Nothing here is fatal to the
//! process, and nothing is retried; parsing is deterministic over its
//! input. The caller decides how to surface the message; an HTTP
//! boundary would map every variant to a 400 response.

/// Error raised while building a query from odata parameters.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OdataError {
    /// Unbalanced grouping parentheses in the filter string.
    #[error("Parentheses in filter string are mismatched.")]
    MismatchedParentheses,

    /// A quoted literal was never closed.
    #[error("Quotes in filter string are mismatched.")]
    MismatchedQuotes,

    /// A leaf clause matched none of the operator matchers.
    #[error("No available filter matches segment {0}")]
    UnknownOperator(String),

    /// The start entity is not declared in the model registry.
    #[error("No entity named {0} in the data model")]
    UnknownEntity(String),

    /// A path component does not name anything on the current entity.
    #[error("{entity} has no column named {field}")]
    UnknownField { entity: String, field: String },

    /// A non-final path component names a scalar field, not a relationship.
    #[error("{entity} has no relationship property named {field}")]
    InvalidRelationshipStep { entity: String, field: String },

    /// The orderby direction token is neither `asc` nor `desc`.
    #[error("orderby direction can only be [asc] or [desc]")]
    InvalidOrderDirection,

    /// The orderby string has more than two tokens.
    #[error("The orderby parameter should only contain [columnName direction]")]
    MalformedOrderby,

    /// A datetime or date literal does not match the expected format.
    #[error("literal {value} does not match the {expected} format")]
    LiteralCoercionFailure { value: String, expected: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_boundary_wording() {
        assert_eq!(
            OdataError::MismatchedParentheses.to_string(),
            "Parentheses in filter string are mismatched."
        );
        assert_eq!(
            OdataError::MismatchedQuotes.to_string(),
            "Quotes in filter string are mismatched."
        );
        assert_eq!(
            OdataError::UnknownField {
                entity: "User".to_string(),
                field: "body".to_string(),
            }
            .to_string(),
            "User has no column named body"
        );
        assert_eq!(
            OdataError::InvalidRelationshipStep {
                entity: "Comment".to_string(),
                field: "body".to_string(),
            }
            .to_string(),
            "Comment has no relationship property named body"
        );
    }
}
