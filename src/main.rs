//! Interactive demo: type filter strings, get SQL back.

use anyhow::Result;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use sea_query::PostgresQueryBuilder;

use odata_filter::config::ModelConfig;
use odata_filter::model::{EntityDef, FieldType, ModelRegistry};
use odata_filter::{build_query, QueryParams};

/// Model used when no `model.json` is present: the User/Comment/Role
/// schema from the test fixtures.
fn demo_registry() -> ModelRegistry {
    ModelRegistry::with_entities([
        (
            "User",
            EntityDef::new("users")
                .field("id", FieldType::Integer)
                .field("username", FieldType::String)
                .field("is_active", FieldType::Boolean)
                .field("logins", FieldType::Integer)
                .field("note", FieldType::String)
                .field("start_date", FieldType::Date)
                .field("created", FieldType::DateTime)
                .belongs_to("supervisor", "User", "supervisor_id")
                .has_many("comments", "Comment", "user_id")
                .many_to_many("roles", "Role", "user_roles", "user_id", "role_id"),
        ),
        (
            "Comment",
            EntityDef::new("comments")
                .field("id", FieldType::Integer)
                .field("body", FieldType::String)
                .field("created", FieldType::DateTime)
                .belongs_to("user", "User", "user_id"),
        ),
        (
            "Role",
            EntityDef::new("roles")
                .field("id", FieldType::Integer)
                .field("name", FieldType::String)
                .many_to_many("users", "User", "user_roles", "role_id", "user_id"),
        ),
    ])
}

fn load_registry() -> ModelRegistry {
    match ModelConfig::from_json_file("model.json") {
        Ok(config) => {
            println!("loaded data model from model.json");
            config.into_registry()
        }
        Err(err) => {
            println!("no model.json ({err}), using the built-in demo model");
            demo_registry()
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let registry = load_registry();

    println!("--- odata_filter: filter/orderby to SQL ---");
    println!("entities: {}", entity_names(&registry));
    println!();
    println!("enter a filter string, e.g.  logins ge 51 and (isActive eq true or note eq null)");
    println!("commands:  :entity <Name>    switch the start entity (default User)");
    println!("           :orderby <spec>   set the orderby, e.g.  :orderby id desc");
    println!("           :quit");
    println!();

    let mut entity = "User".to_string();
    let mut orderby: Option<String> = None;
    let mut editor = DefaultEditor::new()?;

    loop {
        let line = match editor.readline(&format!("{entity}> ")) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(err) => return Err(err.into()),
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        editor.add_history_entry(line)?;

        if line == ":quit" {
            break;
        }
        if let Some(name) = line.strip_prefix(":entity ") {
            entity = name.trim().to_string();
            continue;
        }
        if let Some(spec) = line.strip_prefix(":orderby ") {
            orderby = Some(spec.trim().to_string());
            continue;
        }

        let params = QueryParams {
            filter: Some(line.to_string()),
            orderby: orderby.clone(),
        };
        match build_query(&registry, &entity, &params, None) {
            Ok(query) => println!("{}", query.to_sql(PostgresQueryBuilder)),
            Err(err) => println!("error: {err}"),
        }
    }

    Ok(())
}

fn entity_names(registry: &ModelRegistry) -> String {
    let mut names: Vec<&str> = registry.entities().map(|entity| entity.name.as_str()).collect();
    names.sort_unstable();
    names.join(", ")
}
