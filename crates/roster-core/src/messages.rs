use std::sync::Arc;

use tracing::info;

use roster_types::models::Message;

use crate::Error;
use crate::store::MessageProvider;

/// Read-only view over a user's message history. Messages are produced
/// elsewhere (the seeding utility); this service never writes.
#[derive(Clone)]
pub struct MessageService {
    provider: Arc<dyn MessageProvider>,
}

impl MessageService {
    pub fn new(provider: Arc<dyn MessageProvider>) -> Self {
        Self { provider }
    }

    /// Newest-first, offset-paginated. Does not check that the user exists;
    /// an unknown id and a user with no messages both come back empty.
    pub fn user_messages(
        &self,
        user_id: i64,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<Message>, Error> {
        let messages = self.provider.user_messages(user_id, limit, offset)?;
        info!(user_id, count = messages.len(), "user messages retrieved");
        Ok(messages)
    }
}
