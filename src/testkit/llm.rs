//! Mock text-generation service and token counter.
//!
//! [`ScriptedLlm`] plays queued [`Step`]s first, then falls back to a fixed
//! reply (or echoes the prompt). Every request is recorded, and the peak
//! number of concurrent calls is tracked for concurrency assertions.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::port::outbound::llm::{CompletionRequest, Llm};
use crate::port::outbound::tokenizer::TokenCounter;

/// One scripted response.
#[derive(Debug, Clone)]
pub enum Step {
    /// Return this text.
    Reply(String),
    /// Fail with a connection error carrying this message.
    Fail(String),
    /// Wait, then return this text.
    Delay(Duration, String),
}

enum Fallback {
    Text(String),
    Echo,
}

type CallHook = Box<dyn Fn(usize) + Send + Sync>;

/// An [`Llm`] that follows a script.
pub struct ScriptedLlm {
    script: Mutex<VecDeque<Step>>,
    fallback: Fallback,
    latency: Duration,
    calls: Mutex<Vec<CompletionRequest>>,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
    on_call: Option<CallHook>,
}

impl ScriptedLlm {
    fn with_fallback(fallback: Fallback) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
            in_flight: AtomicUsize::new(0),
            peak_in_flight: AtomicUsize::new(0),
            on_call: None,
        }
    }

    /// Reply with `text` once the script is exhausted.
    pub fn replying(text: impl Into<String>) -> Self {
        Self::with_fallback(Fallback::Text(text.into()))
    }

    /// Reply with the prompt itself once the script is exhausted.
    pub fn echoing() -> Self {
        Self::with_fallback(Fallback::Echo)
    }

    /// Queue a step to play before the fallback.
    #[must_use]
    pub fn then(self, step: Step) -> Self {
        self.script.lock().push_back(step);
        self
    }

    /// Sleep this long on every fallback reply.
    #[must_use]
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Run `hook` with the 1-based call number as each call starts.
    #[must_use]
    pub fn on_call(mut self, hook: impl Fn(usize) + Send + Sync + 'static) -> Self {
        self.on_call = Some(Box::new(hook));
        self
    }

    /// Requests received so far, in arrival order.
    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Most calls observed in flight at the same time.
    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    async fn respond(&self, request: &CompletionRequest) -> Result<String> {
        let step = self.script.lock().pop_front();
        match step {
            Some(Step::Reply(text)) => Ok(text),
            Some(Step::Fail(message)) => Err(Error::Connection(message)),
            Some(Step::Delay(delay, text)) => {
                tokio::time::sleep(delay).await;
                Ok(text)
            }
            None => {
                if !self.latency.is_zero() {
                    tokio::time::sleep(self.latency).await;
                }
                match &self.fallback {
                    Fallback::Text(text) => Ok(text.clone()),
                    Fallback::Echo => Ok(request.prompt.clone()),
                }
            }
        }
    }
}

#[async_trait]
impl Llm for ScriptedLlm {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let call_number = {
            let mut calls = self.calls.lock();
            calls.push(request.clone());
            calls.len()
        };
        if let Some(hook) = &self.on_call {
            hook(call_number);
        }

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);
        let result = self.respond(request).await;
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

/// Counts whitespace-separated words as tokens.
#[derive(Debug, Clone, Copy, Default)]
pub struct WordCounter;

impl TokenCounter for WordCounter {
    fn vocabulary(&self) -> &'static str {
        "words"
    }

    fn count_tokens(&self, text: &str) -> u64 {
        text.split_whitespace().count() as u64
    }
}
