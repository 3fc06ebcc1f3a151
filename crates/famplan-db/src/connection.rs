use std::fs;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use anyhow::Result;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteConnection},
    Connection as SqlConnection,
};
use tokio::sync::Mutex;

use crate::schema;

/// A thread safe connection to the database
pub type Connection = Arc<Mutex<SqliteConnection>>;

/// Open a connection to the database
pub async fn open(filename: &str) -> Result<Connection> {
    let opts = SqliteConnectOptions::from_str(filename)?
        .create_if_missing(true)
        .foreign_keys(true);
    let conn = SqliteConnection::connect_with(&opts).await?;
    tracing::debug!(filename, "opened database");
    Ok(Arc::new(Mutex::new(conn)))
}

/// Removes the test database file when dropped.
pub struct TestHandle {
    path: PathBuf,
}

impl Drop for TestHandle {
    fn drop(&mut self) {
        if self.path.exists() {
            let _ = fs::remove_file(&self.path);
        }
    }
}

/// Open a new test database connection.
/// The database will be created on each open.
pub async fn open_test() -> (TestHandle, Connection) {
    let path = std::env::temp_dir().join(format!(
        "famplan_test_{}.sqlite3",
        rand::random::<u64>()
    ));
    let handle = TestHandle { path: path.clone() };

    let conn = open(path.to_str().unwrap()).await.unwrap();

    // Install the schema
    schema::install(&conn).await.unwrap();

    (handle, conn)
}
