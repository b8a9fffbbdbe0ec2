//! Authorization gate for command units.

use async_trait::async_trait;
use tracing::debug;

use super::{CommandContext, CommandHandler, CommandOutcome, HandlerResult};
use crate::db::AuthLevel;

/// Runs the inner unit only for senders at or above a level.
///
/// Anyone else gets [`CommandOutcome::Declined`] and nothing happens.
pub struct AdminOnly<H> {
    inner: H,
    required: AuthLevel,
}

impl<H: CommandHandler> AdminOnly<H> {
    /// Gate at [`AuthLevel::Admin`].
    pub fn new(inner: H) -> Self {
        Self::with_level(inner, AuthLevel::Admin)
    }

    pub fn with_level(inner: H, required: AuthLevel) -> Self {
        Self { inner, required }
    }
}

#[async_trait]
impl<H: CommandHandler> CommandHandler for AdminOnly<H> {
    async fn handle(&self, ctx: &mut CommandContext<'_>, message: &str) -> HandlerResult {
        if ctx.sender.level() < self.required {
            debug!(
                nick = %ctx.sender.nickname(),
                level = ?ctx.sender.level(),
                "Restricted command refused"
            );
            return Ok(CommandOutcome::Declined);
        }
        self.inner.handle(ctx, message).await
    }

    fn release(&self) {
        self.inner.release();
    }
}
