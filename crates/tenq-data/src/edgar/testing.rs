//! Scripted transport for unit tests.

use super::client::{HttpResponse, Transport, TransportError};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

type Reply = Result<HttpResponse, TransportError>;

/// Replays a fixed sequence of replies and records every requested URL.
#[derive(Debug)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    fallback: Option<Reply>,
    requests: Mutex<Vec<String>>,
}

impl ScriptedTransport {
    /// Reply with `replies` in order; running out is a test bug.
    pub(crate) fn new(replies: Vec<Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            fallback: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Reply with `reply` to every request.
    pub(crate) fn repeating(reply: Reply) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: Some(reply),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Number of requests made so far.
    pub(crate) fn attempts(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// URLs requested so far, in order.
    pub(crate) fn requested_urls(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, TransportError> {
        self.requests.lock().unwrap().push(url.to_string());
        let scripted = self.replies.lock().unwrap().pop_front();
        scripted
            .or_else(|| self.fallback.clone())
            .expect("scripted transport ran out of replies")
    }
}
