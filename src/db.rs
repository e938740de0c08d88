use anyhow::Result;
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};

use crate::entity::{AuditLogs, CartItems, Carts, Items, OrderLines, Orders, Users};

pub type OrmConn = DatabaseConnection;

/// Create a SeaORM connection.
pub async fn create_orm_conn(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    if is_in_memory_sqlite(database_url) {
        // An in-memory database lives only as long as its connection.
        options.max_connections(1).min_connections(1);
    }
    let conn = Database::connect(options).await?;
    Ok(conn)
}

/// Create every table from its entity definition, parents before children.
pub async fn run_migrations(conn: &DatabaseConnection) -> Result<()> {
    let schema = Schema::new(conn.get_database_backend());
    create_table(conn, &schema, Users).await?;
    create_table(conn, &schema, Items).await?;
    create_table(conn, &schema, Carts).await?;
    create_table(conn, &schema, CartItems).await?;
    create_table(conn, &schema, Orders).await?;
    create_table(conn, &schema, OrderLines).await?;
    create_table(conn, &schema, AuditLogs).await?;
    tracing::debug!("schema is up to date");
    Ok(())
}

async fn create_table<E: EntityTrait>(
    conn: &DatabaseConnection,
    schema: &Schema,
    entity: E,
) -> Result<()> {
    let mut stmt = schema.create_table_from_entity(entity);
    stmt.if_not_exists();
    conn.execute(conn.get_database_backend().build(&stmt)).await?;
    Ok(())
}

fn is_in_memory_sqlite(database_url: &str) -> bool {
    database_url.starts_with("sqlite")
        && (database_url.contains(":memory:") || database_url.contains("mode=memory"))
}
