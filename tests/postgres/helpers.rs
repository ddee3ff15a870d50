//! Shared helpers for `PostgreSQL` task repository tests.
//!
//! Every test runs against the embedded cluster provided by
//! `pg-embed-setup-unpriv`, in its own database cloned from a migrated
//! template.

use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use fermata::task::adapters::postgres::PostgresTaskRepository;
use pg_embedded_setup_unpriv::TestCluster;
use rstest::fixture;
use tokio::runtime::Runtime;
use uuid::Uuid;

/// Boxed error type for fallible helpers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// SQL creating the task table.
pub const CREATE_SCHEMA_SQL: &str =
    include_str!("../../migrations/2026-10-01-000000_create_scheduled_tasks/up.sql");

/// Template database holding the migrated schema.
pub const TEMPLATE_DB: &str = "fermata_test_template";

/// Provides a tokio runtime for async repository calls.
///
/// # Errors
///
/// Returns an error if the runtime cannot be created.
#[fixture]
pub fn test_runtime() -> std::io::Result<Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
}

/// Ensures the template database exists with the task schema applied.
///
/// # Errors
///
/// Returns an error if template creation or migration fails.
pub fn ensure_template(cluster: &TestCluster) -> Result<(), BoxError> {
    cluster
        .ensure_template_exists(TEMPLATE_DB, |db_name| {
            let url = cluster.connection().database_url(db_name);
            let mut conn = PgConnection::establish(&url).map_err(|e| eyre::eyre!("{e}"))?;
            conn.batch_execute(CREATE_SCHEMA_SQL)
                .map_err(|e| eyre::eyre!("migration failed: {e}"))?;
            Ok(())
        })
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok(())
}

/// Creates a fresh database from the template and returns its drop guard
/// alongside a repository bound to it.
///
/// Bind the pair as `let (_guard, repository) = ...` so the repository's pool
/// is released before the guard drops the database.
///
/// # Errors
///
/// Returns an error if the template, the database, or the pool cannot be
/// created.
pub fn setup_repository(
    cluster: &'static TestCluster,
) -> Result<(CleanupGuard, PostgresTaskRepository), BoxError> {
    ensure_template(cluster)?;
    let db_name = format!("fermata_test_{}", Uuid::new_v4().simple());
    cluster
        .create_database_from_template(db_name.as_str(), TEMPLATE_DB)
        .map_err(|e| Box::new(e) as BoxError)?;
    let guard = CleanupGuard::new(cluster, db_name);

    let url = cluster.connection().database_url(&guard.db_name);
    let manager = ConnectionManager::<PgConnection>::new(url);
    let pool = Pool::builder()
        .max_size(1)
        .build(manager)
        .map_err(|e| Box::new(e) as BoxError)?;
    Ok((guard, PostgresTaskRepository::new(pool)))
}

/// Drops a per-test database, even when the test panics.
pub struct CleanupGuard {
    cluster: &'static TestCluster,
    db_name: String,
}

impl CleanupGuard {
    const fn new(cluster: &'static TestCluster, db_name: String) -> Self {
        Self { cluster, db_name }
    }
}

impl Drop for CleanupGuard {
    fn drop(&mut self) {
        if let Err(err) = self.cluster.drop_database(self.db_name.as_str()) {
            tracing::warn!(database = %self.db_name, error = %err, "failed to drop test database");
        }
    }
}
