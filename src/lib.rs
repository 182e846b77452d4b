//! OData-style filter and orderby parsing over a declared data model.
//!
//! A compact query-string grammar (`filter=logins ge 51 and
//! (isActive eq true or note eq null)`, `orderby=id desc`) is parsed
//! into a predicate tree and sort specification and bound to a
//! sea-query [`sea_query::SelectStatement`] against a
//! [`model::ModelRegistry`] describing entities, typed fields and
//! relationships. Relationship paths (`supervisor/username`) register
//! the LEFT JOINs the statement needs, with aliases for self-referential
//! hops.
//!
//! The entry point is [`build_query`]:
//!
//! ```
//! use odata_filter::model::{EntityDef, FieldType, ModelRegistry};
//! use odata_filter::{build_query, QueryParams};
//! use sea_query::PostgresQueryBuilder;
//!
//! let registry = ModelRegistry::with_entities([(
//!     "User",
//!     EntityDef::new("users")
//!         .field("id", FieldType::Integer)
//!         .field("username", FieldType::String),
//! )]);
//!
//! let params = QueryParams::filter("username eq 'user1'");
//! let query = build_query(&registry, "User", &params, Some("id")).unwrap();
//! assert_eq!(
//!     query.to_sql(PostgresQueryBuilder),
//!     r#"SELECT "users".* FROM "users" WHERE "users"."username" = 'user1' ORDER BY "users"."id" ASC"#
//! );
//! ```

pub mod config;
pub mod error;
pub mod matcher;
pub mod model;
pub mod query;
pub mod resolver;
pub mod segment;
pub mod value;

mod builder;

pub use error::OdataError;
pub use query::{build_query, OdataQuery, QueryParams};
