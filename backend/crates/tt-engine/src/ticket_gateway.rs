use crate::Result as EngineResult;

use tt_core::{TicketComment, TicketContext};
use tt_db::{TicketCommentRepository, TicketRepository};

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

/// The engine's window onto tickets owned by the surrounding application.
#[async_trait]
pub trait TicketGateway: Send + Sync {
    async fn ticket_context(&self, ticket_id: Uuid) -> EngineResult<Option<TicketContext>>;

    async fn append_comment(&self, comment: &TicketComment) -> EngineResult<()>;
}

/// Reads tickets from and writes notes to the company database.
pub struct SqliteTicketGateway {
    pool: SqlitePool,
}

impl SqliteTicketGateway {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TicketGateway for SqliteTicketGateway {
    async fn ticket_context(&self, ticket_id: Uuid) -> EngineResult<Option<TicketContext>> {
        Ok(TicketRepository::find_context(&self.pool, ticket_id).await?)
    }

    async fn append_comment(&self, comment: &TicketComment) -> EngineResult<()> {
        TicketCommentRepository::create(&self.pool, comment).await?;
        Ok(())
    }
}
