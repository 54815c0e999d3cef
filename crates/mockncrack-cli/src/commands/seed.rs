//! Seed command
//!
//! Loads the built-in sample question bank.

use anyhow::Result;
use mockncrack_core::{seed_questions, SqliteQuestionStore};

use super::Context;
use crate::output;

pub async fn execute(ctx: &Context) -> Result<()> {
    let store = SqliteQuestionStore::new(ctx.db.pool.clone());
    let result = seed_questions(&store).await?;

    output::done(
        &format!(
            "Seeded {} questions ({} already present)",
            result.inserted, result.skipped
        ),
        ctx.quiet,
    );
    Ok(())
}
