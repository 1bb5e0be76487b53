//! Shared test infrastructure for model layer tests.
//!
//! Every test gets its own in-memory SQLite database with the full schema
//! applied, plus a seeded workspace, member user and empty proposal.

use std::str::FromStr;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use propdeck::db::{DbPool, MIGRATIONS};
use propdeck::models::{proposal, user, workspace};

pub const OWNER_EMAIL: &str = "owner@example.com";
pub const PROPOSAL_TITLE: &str = "Acme Corp";

/// Fresh in-memory database with migrations applied. A single pooled
/// connection is pinned open so the in-memory database survives for the
/// whole test.
pub async fn setup_test_db() -> DbPool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("Bad test database URL")
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("Failed to open test DB");

    sqlx::raw_sql(MIGRATIONS)
        .execute(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

pub struct TestContext {
    pub pool: DbPool,
    pub workspace_id: i64,
    pub user_id: i64,
    pub proposal_id: i64,
}

/// Database plus one workspace, one owner and one empty draft proposal.
pub async fn setup_workspace() -> TestContext {
    let pool = setup_test_db().await;

    // Model tests never log in, so the stored hash does not matter here.
    let user_id = user::create(&pool, OWNER_EMAIL, "unused-hash", "Owner")
        .await
        .expect("Failed to create user");
    let workspace_id = workspace::create(&pool, "Test Workspace")
        .await
        .expect("Failed to create workspace");
    workspace::add_member(&pool, workspace_id, user_id, "owner")
        .await
        .expect("Failed to add member");

    let proposal_id = proposal::create(&pool, workspace_id, PROPOSAL_TITLE, "Acme", user_id)
        .await
        .expect("Failed to create proposal");

    TestContext {
        pool,
        workspace_id,
        user_id,
        proposal_id,
    }
}

/// A second proposal in the same workspace, for slug collision tests.
pub async fn add_proposal(ctx: &TestContext, title: &str) -> i64 {
    proposal::create(&ctx.pool, ctx.workspace_id, title, "", ctx.user_id)
        .await
        .expect("Failed to create proposal")
}
