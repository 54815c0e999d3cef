//! Token balance commands
//!
//! Operators credit balances here after verifying a payment out of band.

use anyhow::{bail, Result};
use clap::Subcommand;
use serde::Serialize;
use tabled::Tabled;

use mockncrack_core::{SqliteTokenLedger, TokenLedger};

use super::Context;
use crate::output;

#[derive(Subcommand)]
pub enum TokensAction {
    /// Add tokens to a user's balance (creates the account if needed)
    Grant {
        /// User id (identity token subject)
        user: String,

        /// Number of tokens to add
        amount: i64,
    },

    /// Show a user's balance
    Balance {
        /// User id (identity token subject)
        user: String,
    },
}

/// Balance row for table display
#[derive(Debug, Serialize, Tabled)]
pub struct BalanceRow {
    #[tabled(rename = "User")]
    pub user_id: String,
    #[tabled(rename = "Email")]
    pub email: String,
    #[tabled(rename = "Balance")]
    pub token_balance: i64,
}

pub async fn execute(ctx: &Context, action: TokensAction) -> Result<()> {
    let ledger = SqliteTokenLedger::new(ctx.db.pool.clone());

    match action {
        TokensAction::Grant { user, amount } => {
            let balance = ledger.credit(&user, amount).await?;
            output::done(
                &format!("Granted {} tokens to {} (balance: {})", amount, user, balance),
                ctx.quiet,
            );
            Ok(())
        }
        TokensAction::Balance { user } => {
            let Some(account) = ledger.account(&user).await? else {
                bail!("Unknown account: {}", user);
            };
            let row = BalanceRow {
                user_id: account.user_id,
                email: account.email.unwrap_or_default(),
                token_balance: account.token_balance,
            };
            output::print_record(&row, ctx.format)
        }
    }
}
