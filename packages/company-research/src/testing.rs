//! Testing utilities.
//!
//! [`MockChat`] stands in for the completion service so the collector and
//! the analysis service can be exercised without network calls.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chat_client::{ChatCompletion, ChatError, ChatRequest, ChatResponse};

#[derive(Debug, Clone)]
enum Scripted {
    Reply(Option<String>),
    Fail(String),
}

/// A scripted chat completion.
///
/// Each rule matches when its needle appears in the request's user message;
/// the first matching rule wins. Unmatched requests get a reply with no
/// content. Every request is recorded for assertions.
#[derive(Clone, Default)]
pub struct MockChat {
    rules: Arc<RwLock<Vec<(String, Scripted)>>>,
    calls: Arc<RwLock<Vec<ChatRequest>>>,
}

impl MockChat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests mentioning `needle` with `content`.
    pub fn with_reply(self, needle: impl Into<String>, content: impl Into<String>) -> Self {
        self.push(needle, Scripted::Reply(Some(content.into())))
    }

    /// Answer requests mentioning `needle` with a null message body.
    pub fn with_empty(self, needle: impl Into<String>) -> Self {
        self.push(needle, Scripted::Reply(None))
    }

    /// Fail requests mentioning `needle` with a network error.
    pub fn with_failure(self, needle: impl Into<String>, message: impl Into<String>) -> Self {
        self.push(needle, Scripted::Fail(message.into()))
    }

    fn push(self, needle: impl Into<String>, scripted: Scripted) -> Self {
        self.rules.write().unwrap().push((needle.into(), scripted));
        self
    }

    /// Requests received so far, in order.
    pub fn calls(&self) -> Vec<ChatRequest> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl ChatCompletion for MockChat {
    async fn complete(&self, request: ChatRequest) -> chat_client::Result<ChatResponse> {
        let user = request.user_content().unwrap_or_default().to_string();
        self.calls.write().unwrap().push(request);

        let scripted = self
            .rules
            .read()
            .unwrap()
            .iter()
            .find(|(needle, _)| user.contains(needle.as_str()))
            .map(|(_, s)| s.clone());

        match scripted {
            Some(Scripted::Fail(message)) => Err(ChatError::Network(message)),
            Some(Scripted::Reply(content)) => Ok(ChatResponse {
                content,
                usage: None,
            }),
            None => Ok(ChatResponse::default()),
        }
    }
}
