//! Scripted provider for gateway tests
//!
//! `MockProvider` answers from a queue of scripted replies and falls back to a
//! fixed reply once the queue is drained. It counts every call it receives so
//! tests can assert exactly how the manager routed a request.

use async_trait::async_trait;
use parking_lot::Mutex;
use rpc_gateway::core::providers::base::StatsTracker;
use rpc_gateway::core::traits::provider::BatchResult;
use rpc_gateway::{ProviderConfig, ProviderError, ProviderType, RpcCall, RpcProvider};
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

/// One scripted answer
#[derive(Debug, Clone)]
pub enum Reply {
    Value(Value),
    Error(ProviderError),
    /// Wait, then answer
    Delay(Duration, Box<Reply>),
}

impl Reply {
    pub fn delayed(delay: Duration, reply: Reply) -> Self {
        Reply::Delay(delay, Box::new(reply))
    }

    async fn resolve(self) -> Result<Value, ProviderError> {
        let mut reply = self;
        loop {
            match reply {
                Reply::Value(value) => return Ok(value),
                Reply::Error(error) => return Err(error),
                Reply::Delay(delay, next) => {
                    tokio::time::sleep(delay).await;
                    reply = *next;
                }
            }
        }
    }
}

pub struct MockProvider {
    id: String,
    config: ProviderConfig,
    tracker: StatsTracker,
    connected: AtomicBool,
    healthy: AtomicBool,
    native_batch: bool,
    script: Mutex<VecDeque<Reply>>,
    fallback: Mutex<Reply>,
    batch_script: Mutex<VecDeque<Result<BatchResult, ProviderError>>>,
    methods: Mutex<Vec<String>>,
    calls: AtomicUsize,
    batch_calls: AtomicUsize,
}

impl MockProvider {
    /// Custom-type provider named `name`, answering `"0x1"` to everything
    pub fn new(name: &str) -> Self {
        Self::with_config(
            ProviderConfig::new(name, ProviderType::Custom).with_url("http://127.0.0.1:1"),
        )
    }

    pub fn with_config(config: ProviderConfig) -> Self {
        Self {
            id: config.id(),
            config,
            tracker: StatsTracker::new(),
            connected: AtomicBool::new(false),
            healthy: AtomicBool::new(true),
            native_batch: false,
            script: Mutex::new(VecDeque::new()),
            fallback: Mutex::new(Reply::Value(json!("0x1"))),
            batch_script: Mutex::new(VecDeque::new()),
            methods: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            batch_calls: AtomicUsize::new(0),
        }
    }

    /// Answer `value` once the script is drained
    pub fn replying(self, value: Value) -> Self {
        *self.fallback.lock() = Reply::Value(value);
        self
    }

    /// Fail with `error` once the script is drained
    pub fn failing(self, error: ProviderError) -> Self {
        *self.fallback.lock() = Reply::Error(error);
        self
    }

    /// Queue replies served before the fallback
    pub fn scripted(self, replies: impl IntoIterator<Item = Reply>) -> Self {
        self.script.lock().extend(replies);
        self
    }

    /// Advertise native batch support
    pub fn with_batch(mut self) -> Self {
        self.native_batch = true;
        self
    }

    /// Queue a whole-batch outcome; without one, batches answer call by call
    pub fn batch_reply(self, result: Result<BatchResult, ProviderError>) -> Self {
        self.batch_script.lock().push_back(result);
        self
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.healthy.store(healthy, Ordering::SeqCst);
    }

    pub fn set_fallback(&self, reply: Reply) {
        *self.fallback.lock() = reply;
    }

    /// Single calls received
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Native batches received
    pub fn batch_calls(&self) -> usize {
        self.batch_calls.load(Ordering::SeqCst)
    }

    /// Methods of the single calls received, in order
    pub fn methods(&self) -> Vec<String> {
        self.methods.lock().clone()
    }

    fn next_reply(&self) -> Reply {
        match self.script.lock().pop_front() {
            Some(reply) => reply,
            None => self.fallback.lock().clone(),
        }
    }
}

impl fmt::Debug for MockProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MockProvider")
            .field("id", &self.id)
            .field("calls", &self.calls())
            .finish()
    }
}

#[async_trait]
impl RpcProvider for MockProvider {
    fn id(&self) -> &str {
        &self.id
    }

    fn config(&self) -> &ProviderConfig {
        &self.config
    }

    async fn connect(&self) -> Result<(), ProviderError> {
        self.connected.store(true, Ordering::SeqCst);
        Ok(())
    }

    async fn disconnect(&self) -> Result<(), ProviderError> {
        self.connected.store(false, Ordering::SeqCst);
        Ok(())
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    async fn request(&self, call: &RpcCall) -> Result<Value, ProviderError> {
        if !self.is_connected() {
            return Err(ProviderError::not_connected(&self.id));
        }
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.methods.lock().push(call.method.clone());
        let reply = self.next_reply();
        self.tracker.track(reply.resolve()).await
    }

    fn supports_batch(&self) -> bool {
        self.native_batch
    }

    async fn batch(&self, calls: &[RpcCall]) -> Result<BatchResult, ProviderError> {
        if !self.native_batch {
            return Err(ProviderError::not_supported(&self.id, "batch"));
        }
        self.batch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(result) = self.batch_script.lock().pop_front() {
            return result;
        }

        let mut results = Vec::with_capacity(calls.len());
        for _ in calls {
            match self.next_reply().resolve().await {
                Ok(value) => results.push(Ok(value)),
                Err(ProviderError::Upstream { error, .. }) => results.push(Err(error)),
                Err(other) => return Err(other),
            }
        }
        Ok(results)
    }

    async fn health_check(&self) -> bool {
        let healthy = self.is_connected() && self.healthy.load(Ordering::SeqCst);
        if healthy {
            self.tracker.set_healthy(true);
        } else {
            self.tracker.mark_unhealthy("scripted health check failure");
        }
        healthy
    }

    fn tracker(&self) -> &StatsTracker {
        &self.tracker
    }
}
