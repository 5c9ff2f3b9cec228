//! Routing-key derivation from query request bodies.
//!
//! # Responsibilities
//! - Decode the buffered JSON body of a query request
//! - Tables mode: extract the primary table identifier from the SQL text
//! - Tenants mode: take the literal `tenant` field value
//!
//! # Design Decisions
//! - The body is decoded from an already-buffered byte slice so the caller
//!   can forward the original bytes untouched
//! - Only select/insert/update/delete yield a table key; anything else is
//!   rejected rather than guessed at

use serde::Deserialize;
use sqlparser::ast::{FromTable, ObjectName, SetExpr, Statement, TableFactor, TableObject};
use sqlparser::dialect::GenericDialect;
use sqlparser::parser::{Parser, ParserError};
use thiserror::Error;

use crate::config::RoutingMode;

/// A query request that cannot be routed. Surfaced to the caller as a 400,
/// not logged as a system error.
#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("request body is not valid JSON: {0}")]
    Body(#[from] serde_json::Error),

    #[error("missing or empty sql field")]
    EmptySql,

    #[error("missing or empty tenant field")]
    EmptyTenant,

    #[error("failed to parse sql: {0}")]
    Sql(#[from] ParserError),

    #[error("statement kind does not name a table")]
    UnsupportedStatement,
}

#[derive(Debug, Deserialize)]
struct QueryBody {
    #[serde(default)]
    sql: String,
    #[serde(default)]
    tenant: String,
}

/// Derive the routing key for a query request body.
pub fn resolve_key(mode: RoutingMode, body: &[u8]) -> Result<String, ResolveError> {
    let body: QueryBody = serde_json::from_slice(body)?;
    if body.sql.is_empty() {
        return Err(ResolveError::EmptySql);
    }
    match mode {
        RoutingMode::Tables => table_name_from_sql(&body.sql),
        RoutingMode::Tenants => {
            if body.tenant.is_empty() {
                Err(ResolveError::EmptyTenant)
            } else {
                Ok(body.tenant)
            }
        }
    }
}

/// Extract the primary table identifier from a SQL statement.
fn table_name_from_sql(sql: &str) -> Result<String, ResolveError> {
    let statements = Parser::parse_sql(&GenericDialect {}, sql)?;
    let statement = statements
        .into_iter()
        .next()
        .ok_or(ResolveError::UnsupportedStatement)?;

    let table = match statement {
        Statement::Query(query) => match *query.body {
            SetExpr::Select(select) => select
                .from
                .first()
                .and_then(|from| table_factor_name(&from.relation)),
            _ => None,
        },
        Statement::Insert(insert) => match &insert.table {
            TableObject::TableName(name) => object_name_tail(name),
            _ => None,
        },
        Statement::Update { table, .. } => table_factor_name(&table.relation),
        Statement::Delete(delete) => {
            let tables = match delete.from {
                FromTable::WithFromKeyword(tables) | FromTable::WithoutKeyword(tables) => tables,
            };
            tables
                .first()
                .and_then(|from| table_factor_name(&from.relation))
        }
        _ => None,
    };

    table.ok_or(ResolveError::UnsupportedStatement)
}

fn table_factor_name(factor: &TableFactor) -> Option<String> {
    match factor {
        TableFactor::Table { name, .. } => object_name_tail(name),
        _ => None,
    }
}

fn object_name_tail(name: &ObjectName) -> Option<String> {
    name.0.last().map(|part| part.to_string())
}
