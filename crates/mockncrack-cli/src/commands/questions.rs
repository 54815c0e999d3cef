//! Question bank commands

use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use mockncrack_core::{validate_topic, QuestionStore, SqliteQuestionStore, TopicStats};

use super::Context;
use crate::output;

#[derive(Subcommand)]
pub enum QuestionsAction {
    /// Show per-topic question counts
    Stats,

    /// Mark every used question of a topic as unused again
    Reset {
        /// Topic (exact, case-sensitive)
        topic: String,
    },
}

/// Topic row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct TopicRow {
    #[tabled(rename = "Topic")]
    pub topic: String,
    #[tabled(rename = "Total")]
    pub total: i64,
    #[tabled(rename = "Used")]
    pub used: i64,
    #[tabled(rename = "Available")]
    pub available: i64,
}

impl From<TopicStats> for TopicRow {
    fn from(stats: TopicStats) -> Self {
        Self {
            available: stats.total - stats.used,
            topic: stats.topic,
            total: stats.total,
            used: stats.used,
        }
    }
}

pub async fn execute(ctx: &Context, action: QuestionsAction) -> Result<()> {
    let store = SqliteQuestionStore::new(ctx.db.pool.clone());

    match action {
        QuestionsAction::Stats => {
            let rows: Vec<TopicRow> = store
                .topic_stats()
                .await?
                .into_iter()
                .map(TopicRow::from)
                .collect();
            output::print_rows(&rows, ctx.format)
        }
        QuestionsAction::Reset { topic } => {
            let topic = validate_topic(&topic)?;
            let count = store.reset_topic(&topic).await?;
            output::done(
                &format!("Reset {} questions for topic '{}'", count, topic),
                ctx.quiet,
            );
            Ok(())
        }
    }
}
