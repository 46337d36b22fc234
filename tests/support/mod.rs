//! Shared fixtures for write path integration tests
//!
//! `ScriptedTransport` records every batch it is given, answers from a
//! script of outcomes (success once the script is exhausted), tracks how
//! many calls overlap, and can hold calls until the test releases them.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures_util::future::BoxFuture;
use futures_util::FutureExt;
use tokio::sync::Semaphore;

use p4write::{Transport, TransportOutcome, Update, WriteBatch};

pub struct ScriptedTransport {
    calls: Mutex<Vec<WriteBatch>>,
    script: Mutex<VecDeque<TransportOutcome>>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    delay: Duration,
    gate: Option<Semaphore>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            script: Mutex::new(VecDeque::new()),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
            delay: Duration::ZERO,
            gate: None,
        }
    }

    /// Every call sleeps for `delay` before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Every call waits for a `release` before answering
    pub fn gated(mut self) -> Self {
        self.gate = Some(Semaphore::new(0));
        self
    }

    /// Answer the next unanswered call with `outcome`
    pub fn push_outcome(&self, outcome: TransportOutcome) {
        self.script.lock().unwrap().push_back(outcome);
    }

    /// Let `calls` held calls proceed
    pub fn release(&self, calls: usize) {
        if let Some(gate) = &self.gate {
            gate.add_permits(calls);
        }
    }

    pub fn calls(&self) -> Vec<WriteBatch> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Transport for ScriptedTransport {
    fn write<'a>(&'a self, batch: &'a WriteBatch) -> BoxFuture<'a, TransportOutcome> {
        async move {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);
            self.calls.lock().unwrap().push(batch.clone());

            if let Some(gate) = &self.gate {
                gate.acquire().await.unwrap().forget();
            }
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            self.script.lock().unwrap().pop_front().unwrap_or(Ok(()))
        }
        .boxed()
    }
}

/// A batch of `size` inserts whose entities encode `tag`
pub fn tagged_batch(tag: u64, size: usize) -> WriteBatch {
    let mut batch = WriteBatch::new(tag);
    for i in 0..size {
        batch.push(Update::insert(format!("{}:{}", tag, i).into_bytes()));
    }
    batch
}

/// Poll `condition` until it holds; panics after two seconds
pub async fn wait_until<F: Fn() -> bool>(condition: F) {
    within(async {
        while !condition() {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await
}

/// Await `future`; panics if it takes more than two seconds
pub async fn within<T>(future: impl Future<Output = T>) -> T {
    tokio::time::timeout(Duration::from_secs(2), future)
        .await
        .expect("timed out")
}

pub fn shared(transport: ScriptedTransport) -> Arc<ScriptedTransport> {
    Arc::new(transport)
}
