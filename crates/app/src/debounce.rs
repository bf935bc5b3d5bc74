//! Debounce utility and cancellable subscription handles.
//!
//! Both directions of the sync bridge (target-protocol writes and device
//! change streams) run through a [`Debouncer`]. The edge polarity follows
//! the interval: a zero interval fires leading-edge (every input,
//! immediately), a non-zero interval fires trailing-edge (coalesce a burst
//! into one call carrying the latest value after a quiet period).

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;

use capbridge_domain::value::Value;

/// Firing edge of a [`Debouncer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Fire immediately on every input, no coalescing.
    Leading,
    /// Wait for a quiet period, then fire once with the latest input.
    Trailing,
}

struct Shared<T> {
    action: Box<dyn Fn(T) + Send + Sync>,
    latest: Mutex<Option<T>>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

/// Coalesces rapid repeated inputs into fewer action invocations.
///
/// Cloning yields another handle onto the same debounced action. Trailing
/// timers never reorder values: each input replaces the pending latest
/// value, and the single trailing fire carries whatever arrived last.
pub struct Debouncer<T> {
    interval: Duration,
    edge: Edge,
    shared: Arc<Shared<T>>,
}

impl<T> Clone for Debouncer<T> {
    fn clone(&self) -> Self {
        Self {
            interval: self.interval,
            edge: self.edge,
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<T: Send + 'static> Debouncer<T> {
    /// Create a debouncer with an explicit interval and edge.
    pub fn new(interval: Duration, edge: Edge, action: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            interval,
            edge,
            shared: Arc::new(Shared {
                action: Box::new(action),
                latest: Mutex::new(None),
                timer: Mutex::new(None),
            }),
        }
    }

    /// Create a debouncer whose edge follows the interval: zero is
    /// leading/immediate, anything else is trailing.
    ///
    /// This polarity is load-bearing for the bridge: sliders rely on a zero
    /// interval passing every intermediate value through.
    pub fn from_interval(interval: Duration, action: impl Fn(T) + Send + Sync + 'static) -> Self {
        let edge = if interval.is_zero() {
            Edge::Leading
        } else {
            Edge::Trailing
        };
        Self::new(interval, edge, action)
    }

    /// Feed one input through the debouncer.
    ///
    /// Must be called from within a tokio runtime when the edge is
    /// [`Edge::Trailing`] (the quiet-period timer is a spawned task).
    pub fn call(&self, value: T) {
        match self.edge {
            Edge::Leading => (self.shared.action)(value),
            Edge::Trailing => {
                *self.shared.latest.lock().expect("debounce latest lock") = Some(value);
                let mut slot = self.shared.timer.lock().expect("debounce timer lock");
                if let Some(pending) = slot.take() {
                    pending.abort();
                }
                let interval = self.interval;
                let shared = Arc::clone(&self.shared);
                *slot = Some(tokio::spawn(async move {
                    tokio::time::sleep(interval).await;
                    let latest = shared.latest.lock().expect("debounce latest lock").take();
                    if let Some(value) = latest {
                        (shared.action)(value);
                    }
                }));
            }
        }
    }

    /// Cancel a pending trailing timer so no further action fires.
    pub fn cancel(&self) {
        if let Some(pending) = self.shared.timer.lock().expect("debounce timer lock").take() {
            pending.abort();
        }
        self.shared
            .latest
            .lock()
            .expect("debounce latest lock")
            .take();
    }
}

/// An active capability-change subscription.
///
/// Wraps the forwarding task (device stream → callback) and/or the
/// debouncer feeding the callback. [`cancel`](Self::cancel) synchronously
/// stops both; no further callbacks fire afterwards, even if a debounce
/// timer was pending.
pub struct Subscription {
    task: Option<JoinHandle<()>>,
    debouncer: Option<Debouncer<Value>>,
}

impl Subscription {
    /// Subscription backed by a forwarding task and its debouncer.
    #[must_use]
    pub fn new(task: JoinHandle<()>, debouncer: Debouncer<Value>) -> Self {
        Self {
            task: Some(task),
            debouncer: Some(debouncer),
        }
    }

    /// Subscription backed by a debouncer only, no forwarding task.
    #[must_use]
    pub fn from_debouncer(debouncer: Debouncer<Value>) -> Self {
        Self {
            task: None,
            debouncer: Some(debouncer),
        }
    }

    /// Stop all deliveries, cancelling any pending debounce timer.
    pub fn cancel(&self) {
        if let Some(debouncer) = &self.debouncer {
            debouncer.cancel();
        }
        if let Some(task) = &self.task {
            task.abort();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<Value>>>, impl Fn(Value) + Send + Sync) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |value| sink.lock().unwrap().push(value))
    }

    #[tokio::test]
    async fn should_fire_immediately_for_zero_interval() {
        let (seen, sink) = recorder();
        let debouncer = Debouncer::from_interval(Duration::ZERO, sink);

        debouncer.call(Value::Int(1));
        debouncer.call(Value::Int(2));
        debouncer.call(Value::Int(3));

        assert_eq!(
            *seen.lock().unwrap(),
            vec![Value::Int(1), Value::Int(2), Value::Int(3)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn should_coalesce_burst_into_latest_value() {
        let (seen, sink) = recorder();
        let debouncer = Debouncer::from_interval(Duration::from_millis(300), sink);

        debouncer.call(Value::Float(0.2));
        debouncer.call(Value::Float(0.8));

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(*seen.lock().unwrap(), vec![Value::Float(0.8)]);
    }

    #[tokio::test(start_paused = true)]
    async fn should_fire_once_per_quiet_period() {
        let (seen, sink) = recorder();
        let debouncer = Debouncer::from_interval(Duration::from_millis(100), sink);

        debouncer.call(Value::Int(1));
        tokio::time::sleep(Duration::from_millis(200)).await;
        debouncer.call(Value::Int(2));
        tokio::time::sleep(Duration::from_millis(200)).await;

        assert_eq!(*seen.lock().unwrap(), vec![Value::Int(1), Value::Int(2)]);
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_fire_after_cancel() {
        let (seen, sink) = recorder();
        let debouncer = Debouncer::from_interval(Duration::from_millis(100), sink);

        debouncer.call(Value::Int(1));
        debouncer.cancel();

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn should_stop_pending_timer_when_subscription_cancelled() {
        let (seen, sink) = recorder();
        let debouncer = Debouncer::from_interval(Duration::from_millis(100), sink);
        let subscription = Subscription::from_debouncer(debouncer.clone());

        debouncer.call(Value::Bool(true));
        subscription.cancel();

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn should_use_leading_edge_only_for_zero_interval() {
        let zero = Debouncer::<Value>::from_interval(Duration::ZERO, |_| {});
        let nonzero = Debouncer::<Value>::from_interval(Duration::from_millis(1), |_| {});
        assert_eq!(zero.edge, Edge::Leading);
        assert_eq!(nonzero.edge, Edge::Trailing);
    }
}
