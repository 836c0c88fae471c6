//! Adapter runtime integration.
//!
//! Bridges the synchronous engine with an async presentation task. The engine
//! pushes events into a [`ChannelSink`] and returns immediately; an
//! [`EventPlayer`] drains the channel and hands events out at animation pace.

use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::core::{BoardEvent, PresentationSink};

/// Animation time given to each phase of a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pacing {
    pub swap: Duration,
    pub destroy: Duration,
    pub bomb: Duration,
    pub collapse: Duration,
    pub spawn: Duration,
}

impl Default for Pacing {
    fn default() -> Self {
        Self {
            swap: Duration::from_millis(500),
            destroy: Duration::from_millis(300),
            bomb: Duration::from_millis(400),
            collapse: Duration::from_millis(300),
            spawn: Duration::from_millis(200),
        }
    }
}

impl Pacing {
    /// No delays; events are delivered as fast as they arrive.
    pub fn instant() -> Self {
        Self {
            swap: Duration::ZERO,
            destroy: Duration::ZERO,
            bomb: Duration::ZERO,
            collapse: Duration::ZERO,
            spawn: Duration::ZERO,
        }
    }

    pub fn delay_for(&self, event: &BoardEvent) -> Duration {
        match event {
            BoardEvent::SwapAnimate { .. } | BoardEvent::SwapRejected { .. } => self.swap,
            BoardEvent::PiecesDestroyed(_) => self.destroy,
            BoardEvent::BombSpawned { .. } => self.bomb,
            BoardEvent::PieceCollapsed { .. } => self.collapse,
            BoardEvent::PieceSpawned { .. } => self.spawn,
            BoardEvent::CascadeSettled => Duration::ZERO,
        }
    }
}

/// Collapse and spawn events of one step animate together.
fn plays_in_batch(event: &BoardEvent) -> bool {
    matches!(
        event,
        BoardEvent::PieceCollapsed { .. } | BoardEvent::PieceSpawned { .. }
    )
}

/// Sink that forwards every event into an unbounded channel.
#[derive(Debug)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<BoardEvent>,
    closed: bool,
}

impl ChannelSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<BoardEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, closed: false }, rx)
    }

    /// Connected player with the given pacing.
    pub fn with_player(pacing: Pacing) -> (Self, EventPlayer) {
        let (sink, rx) = Self::new();
        (sink, EventPlayer::new(rx, pacing))
    }

    pub fn is_closed(&self) -> bool {
        self.closed || self.tx.is_closed()
    }
}

impl PresentationSink for ChannelSink {
    fn on_event(&mut self, event: &BoardEvent) {
        if self.tx.send(event.clone()).is_err() && !self.closed {
            // Board state is unaffected; only the presentation stops.
            warn!("presentation receiver dropped, discarding further events");
            self.closed = true;
        }
    }
}

/// Paced consumer of a [`ChannelSink`].
///
/// Before delivering an event the player waits out the previous phase. A run
/// of collapse (or spawn) events is one phase, so a whole column drop costs a
/// single `collapse` delay.
#[derive(Debug)]
pub struct EventPlayer {
    rx: mpsc::UnboundedReceiver<BoardEvent>,
    pacing: Pacing,
    pending: Option<(&'static str, Duration)>,
}

impl EventPlayer {
    pub fn new(rx: mpsc::UnboundedReceiver<BoardEvent>, pacing: Pacing) -> Self {
        Self {
            rx,
            pacing,
            pending: None,
        }
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    /// Next event, or `None` once the sink is gone and the channel is drained.
    pub async fn next(&mut self) -> Option<BoardEvent> {
        let event = self.rx.recv().await?;
        if let Some((phase, delay)) = self.pending.take() {
            let same_batch = plays_in_batch(&event) && phase == event.name();
            if !same_batch && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
        }
        self.pending = Some((event.name(), self.pacing.delay_for(&event)));
        Some(event)
    }

    /// Deliver events to `on_event` until the current move settles.
    ///
    /// Stops after `CascadeSettled` or `SwapRejected`, or when the channel
    /// closes. Returns the number of events delivered.
    pub async fn play_move<F>(&mut self, mut on_event: F) -> usize
    where
        F: FnMut(&BoardEvent),
    {
        let mut played = 0;
        while let Some(event) = self.next().await {
            on_event(&event);
            played += 1;
            if matches!(
                event,
                BoardEvent::CascadeSettled | BoardEvent::SwapRejected { .. }
            ) {
                break;
            }
        }
        debug!(played, "move replayed");
        played
    }

    /// Forward every remaining event to `sink`, then return it.
    pub async fn drain_into<S: PresentationSink>(mut self, mut sink: S) -> S {
        while let Some(event) = self.next().await {
            sink.on_event(&event);
        }
        sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EventLog;
    use crate::types::{PieceId, Pos};

    fn collapse(id: u32) -> BoardEvent {
        BoardEvent::PieceCollapsed {
            id: PieceId(id),
            x: 0,
            from_y: 2,
            to_y: 1,
        }
    }

    #[test]
    fn default_pacing_orders_phases() {
        let pacing = Pacing::default();
        assert_eq!(pacing.swap, Duration::from_millis(500));
        assert!(pacing.bomb > pacing.destroy);
        assert_eq!(pacing.delay_for(&BoardEvent::CascadeSettled), Duration::ZERO);
        assert_eq!(Pacing::instant().delay_for(&collapse(1)), Duration::ZERO);
    }

    #[tokio::test]
    async fn player_stops_at_settle() {
        let (mut sink, mut player) = ChannelSink::with_player(Pacing::instant());
        sink.on_event(&collapse(1));
        sink.on_event(&BoardEvent::CascadeSettled);
        sink.on_event(&collapse(2));

        let mut seen = Vec::new();
        let played = player.play_move(|e| seen.push(e.name())).await;
        assert_eq!(played, 2);
        assert_eq!(seen, ["piece_collapsed", "cascade_settled"]);

        drop(sink);
        let log = player.drain_into(EventLog::default()).await;
        assert_eq!(log.events(), &[collapse(2)]);
    }

    #[tokio::test(start_paused = true)]
    async fn collapse_batch_waits_once() {
        let pacing = Pacing::default();
        let (mut sink, mut player) = ChannelSink::with_player(pacing);
        sink.on_event(&BoardEvent::SwapAnimate {
            first: PieceId(1),
            from: Pos::new(0, 0),
            second: PieceId(2),
            to: Pos::new(1, 0),
        });
        for id in 3..6 {
            sink.on_event(&collapse(id));
        }
        sink.on_event(&BoardEvent::CascadeSettled);

        let start = tokio::time::Instant::now();
        assert_eq!(player.play_move(|_| {}).await, 5);
        assert_eq!(start.elapsed(), pacing.swap + pacing.collapse);
    }

    #[test]
    fn send_after_receiver_dropped_is_harmless() {
        let (mut sink, rx) = ChannelSink::new();
        drop(rx);
        sink.on_event(&BoardEvent::CascadeSettled);
        sink.on_event(&BoardEvent::CascadeSettled);
        assert!(sink.is_closed());
    }
}
