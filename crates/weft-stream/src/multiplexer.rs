//! Per-session ordered event queue (§4.6): decouples a producer task from
//! an SSE consumer that may attach only after the producer has begun.

use crate::error::{Result, StreamError};
use crate::event::StreamEvent;
use crate::session::SessionId;
use futures::Stream;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};
use tokio::sync::Notify;

struct Session {
    events: Mutex<Vec<StreamEvent>>,
    notify: Notify,
    subscribed: AtomicBool,
    terminated: AtomicBool,
    last_activity: Mutex<Instant>,
}

impl Session {
    fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
            notify: Notify::new(),
            subscribed: AtomicBool::new(false),
            terminated: AtomicBool::new(false),
            last_activity: Mutex::new(Instant::now()),
        }
    }

    fn touch(&self) {
        *self.last_activity.lock() = Instant::now();
    }
}

/// Process-wide (or per-server) registry of live session streams.
///
/// Sessions are explicitly created before a producer starts publishing,
/// and destroyed once a terminal event has been fully consumed or after
/// an idle window elapses with no subscriber (§3 "Session stream").
#[derive(Clone, Default)]
pub struct StreamMultiplexer {
    sessions: Arc<Mutex<HashMap<SessionId, Arc<Session>>>>,
}

impl StreamMultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create(&self, session_id: SessionId) -> Result<()> {
        let mut sessions = self.sessions.lock();
        if sessions.contains_key(&session_id) {
            return Err(StreamError::DuplicateSession(session_id.to_string()));
        }
        sessions.insert(session_id, Arc::new(Session::new()));
        Ok(())
    }

    /// Appends an event to the session's buffer and wakes any waiting
    /// subscriber. Never blocks (§4.6).
    pub fn publish(&self, session_id: &SessionId, event: StreamEvent) -> Result<()> {
        let session = self.session_for(session_id)?;
        if session.terminated.load(Ordering::SeqCst) {
            return Err(StreamError::NoSuchSession(session_id.to_string()));
        }
        let is_terminal = event.is_terminal();
        {
            let mut events = session.events.lock();
            events.push(event);
        }
        session.touch();
        if is_terminal {
            session.terminated.store(true, Ordering::SeqCst);
        }
        session.notify.notify_waiters();
        Ok(())
    }

    /// Subscribes to a session's event sequence. The returned stream
    /// replays any events already published from the beginning, then
    /// yields new events as they arrive, terminating once a terminal
    /// event has been delivered (§4.6 guarantees, P6).
    pub fn subscribe(&self, session_id: &SessionId) -> Result<SessionSubscription> {
        let session = self.session_for(session_id)?;
        if session
            .subscribed
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(StreamError::AlreadySubscribed(session_id.to_string()));
        }
        Ok(SessionSubscription {
            multiplexer: self.clone(),
            session_id: session_id.clone(),
            session,
            cursor: 0,
            done: false,
        })
    }

    pub fn exists(&self, session_id: &SessionId) -> bool {
        self.sessions.lock().contains_key(session_id)
    }

    fn session_for(&self, session_id: &SessionId) -> Result<Arc<Session>> {
        self.sessions
            .lock()
            .get(session_id)
            .cloned()
            .ok_or_else(|| StreamError::NoSuchSession(session_id.to_string()))
    }

    fn destroy(&self, session_id: &SessionId) {
        self.sessions.lock().remove(session_id);
    }

    /// Removes sessions that have had no publish activity for longer than
    /// `idle` and currently have no live subscriber. Call periodically
    /// from a background sweep; the spec leaves the idle window
    /// implementation-defined (§3).
    pub fn sweep_idle(&self, idle: Duration) {
        let now = Instant::now();
        let mut sessions = self.sessions.lock();
        sessions.retain(|_, session| {
            let stale = now.duration_since(*session.last_activity.lock()) > idle;
            !(stale && !session.subscribed.load(Ordering::SeqCst))
        });
    }
}

/// A live subscription to one session's event sequence.
pub struct SessionSubscription {
    multiplexer: StreamMultiplexer,
    session_id: SessionId,
    session: Arc<Session>,
    cursor: usize,
    done: bool,
}

impl Stream for SessionSubscription {
    type Item = StreamEvent;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        if this.done {
            return Poll::Ready(None);
        }

        loop {
            let next = {
                let events = this.session.events.lock();
                events.get(this.cursor).cloned()
            };
            if let Some(event) = next {
                this.cursor += 1;
                if event.is_terminal() {
                    this.done = true;
                }
                return Poll::Ready(Some(event));
            }

            if this.session.terminated.load(Ordering::SeqCst) {
                this.done = true;
                return Poll::Ready(None);
            }

            let notified = this.session.notify.notified();
            tokio::pin!(notified);
            match notified.poll(cx) {
                Poll::Ready(()) => continue,
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

impl Drop for SessionSubscription {
    fn drop(&mut self) {
        self.session.subscribed.store(false, Ordering::SeqCst);
        if self.done {
            self.multiplexer.destroy(&self.session_id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventTag;
    use futures::StreamExt;

    #[test]
    fn duplicate_create_rejected() {
        let mux = StreamMultiplexer::new();
        let id = SessionId::from("s1");
        mux.create(id.clone()).unwrap();
        let err = mux.create(id).unwrap_err();
        assert_eq!(err.code(), "DUPLICATE_SESSION");
    }

    #[test]
    fn publish_to_unknown_session_fails() {
        let mux = StreamMultiplexer::new();
        let err = mux
            .publish(&SessionId::from("ghost"), StreamEvent::status("x"))
            .unwrap_err();
        assert_eq!(err.code(), "NO_SUCH_SESSION");
    }

    #[tokio::test]
    async fn late_subscriber_receives_full_buffered_sequence() {
        let mux = StreamMultiplexer::new();
        let id = SessionId::from("late");
        mux.create(id.clone()).unwrap();
        mux.publish(&id, StreamEvent::status("one")).unwrap();
        mux.publish(&id, StreamEvent::status("two")).unwrap();
        mux.publish(&id, StreamEvent::status("three")).unwrap();

        let mut sub = mux.subscribe(&id).unwrap();
        assert_eq!(sub.next().await.unwrap().data, "one");
        assert_eq!(sub.next().await.unwrap().data, "two");
        assert_eq!(sub.next().await.unwrap().data, "three");

        mux.publish(&id, StreamEvent::complete()).unwrap();
        let terminal = sub.next().await.unwrap();
        assert_eq!(terminal.event, EventTag::Complete);
        assert!(sub.next().await.is_none());
    }

    #[tokio::test]
    async fn subscriber_blocks_until_event_published() {
        let mux = StreamMultiplexer::new();
        let id = SessionId::from("blocking");
        mux.create(id.clone()).unwrap();
        let mut sub = mux.subscribe(&id).unwrap();

        let mux2 = mux.clone();
        let id2 = id.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            mux2.publish(&id2, StreamEvent::complete()).unwrap();
        });

        let event = sub.next().await.unwrap();
        assert!(event.is_terminal());
    }

    #[tokio::test]
    async fn only_one_live_subscriber_permitted() {
        let mux = StreamMultiplexer::new();
        let id = SessionId::from("exclusive");
        mux.create(id.clone()).unwrap();
        let _sub = mux.subscribe(&id).unwrap();
        let err = mux.subscribe(&id).unwrap_err();
        assert_eq!(err.code(), "ALREADY_SUBSCRIBED");
    }

    #[tokio::test]
    async fn session_destroyed_after_terminal_consumed() {
        let mux = StreamMultiplexer::new();
        let id = SessionId::from("gone");
        mux.create(id.clone()).unwrap();
        mux.publish(&id, StreamEvent::complete()).unwrap();
        {
            let mut sub = mux.subscribe(&id).unwrap();
            sub.next().await.unwrap();
        }
        assert!(!mux.exists(&id));
    }

    #[tokio::test]
    async fn events_delivered_in_publication_order_no_drops() {
        let mux = StreamMultiplexer::new();
        let id = SessionId::from("order");
        mux.create(id.clone()).unwrap();
        for i in 0..20 {
            mux.publish(&id, StreamEvent::status(i.to_string())).unwrap();
        }
        mux.publish(&id, StreamEvent::complete()).unwrap();

        let mut sub = mux.subscribe(&id).unwrap();
        for i in 0..20 {
            assert_eq!(sub.next().await.unwrap().data, i.to_string());
        }
        assert!(sub.next().await.unwrap().is_terminal());
    }
}
