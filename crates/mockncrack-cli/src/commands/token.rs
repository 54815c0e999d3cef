//! Identity token commands

use anyhow::Result;
use clap::Subcommand;

use mockncrack_core::auth::{JwtKeys, DEFAULT_TOKEN_EXPIRY_DAYS};

use super::Context;

#[derive(Subcommand)]
pub enum TokenAction {
    /// Mint a bearer token for a user (requires MOCKNCRACK_JWT_SECRET)
    Issue {
        /// User id to place in the token subject
        user: String,

        /// Optional email claim
        #[arg(long)]
        email: Option<String>,

        /// Validity in days
        #[arg(long, default_value_t = DEFAULT_TOKEN_EXPIRY_DAYS)]
        days: i64,
    },
}

pub async fn execute(ctx: &Context, action: TokenAction) -> Result<()> {
    match action {
        TokenAction::Issue { user, email, days } => {
            let keys = JwtKeys::new(ctx.config.require_jwt_secret()?);
            let token = keys.create_token(&user, email.as_deref(), days)?;
            // Printed even in quiet mode; the token is the output
            println!("{}", token);
            Ok(())
        }
    }
}
