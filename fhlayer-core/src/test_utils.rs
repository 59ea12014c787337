use async_trait::async_trait;
use std::{collections::VecDeque, sync::Mutex};

use crate::{client::DbClient, envelope::Envelope, error::LayerResult, request::DbRequest};

/// Client double that answers from a queue of canned replies and records
/// every request it receives.
#[derive(Debug, Default)]
pub(crate) struct ScriptedClient {
    replies: Mutex<VecDeque<LayerResult<Envelope>>>,
    requests: Mutex<Vec<DbRequest>>,
}

impl ScriptedClient {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn reply(self, reply: LayerResult<Envelope>) -> Self {
        self.replies.lock().unwrap().push_back(reply);
        self
    }

    pub(crate) fn requests(&self) -> Vec<DbRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl DbClient for ScriptedClient {
    async fn request(&self, request: DbRequest) -> LayerResult<Envelope> {
        self.requests.lock().unwrap().push(request);
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(Envelope::empty()))
    }
}
