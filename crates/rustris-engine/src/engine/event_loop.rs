use std::{
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender},
    time::{Duration, Instant},
};

use tracing::debug;

use super::game_session::{GameEvent, GameSession, InputEvent, Notice, Notices};

/// Returned by [`EventSender::send`] once the event loop has been dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("game session is no longer receiving input")]
pub struct SessionClosedError;

/// Handle for pushing player input into an [`EventLoop`] from any thread.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: Sender<TimedInput>,
}

impl EventSender {
    /// Queues `input`, stamped with the time it was sent.
    pub fn send(&self, input: InputEvent) -> Result<(), SessionClosedError> {
        self.sender
            .send((Instant::now(), input))
            .map_err(|_| SessionClosedError)
    }
}

type TimedInput = (Instant, InputEvent);

/// Drives a [`GameSession`] in real time.
///
/// Inputs arrive over a channel and gravity ticks are generated from
/// [`GameSession::tick_interval`]. Both are delivered to the session one at
/// a time, in the order they happened: an input sent before a tick's
/// deadline is applied before that tick, even if the loop only wakes up
/// after the deadline.
///
/// # Example
///
/// ```
/// use rustris_engine::{EventLoop, GameConfig, GameSession, InputEvent};
///
/// let session = GameSession::new(GameConfig::default()).unwrap();
/// let (event_loop, sender) = EventLoop::new(session);
///
/// sender.send(InputEvent::HardDrop).unwrap();
/// drop(sender);
///
/// let session = event_loop.run(|_, _, _| {});
/// assert_eq!(session.stats().completed_pieces(), 1);
/// ```
#[derive(Debug)]
pub struct EventLoop {
    session: GameSession,
    receiver: Receiver<TimedInput>,
    /// Input taken off the channel but sent after the tick being delivered.
    pending: Option<TimedInput>,
    last_tick: Instant,
}

impl EventLoop {
    /// Wraps `session` and returns the sender for its input channel.
    #[must_use]
    pub fn new(session: GameSession) -> (Self, EventSender) {
        let (sender, receiver) = mpsc::channel();
        let this = Self {
            session,
            receiver,
            pending: None,
            last_tick: Instant::now(),
        };
        (this, EventSender { sender })
    }

    #[must_use]
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    #[must_use]
    pub fn into_session(self) -> GameSession {
        self.session
    }

    /// Blocks until the next event is due.
    ///
    /// Returns `None` once every [`EventSender`] has been dropped and the
    /// queue is drained.
    pub fn next_event(&mut self) -> Option<GameEvent> {
        loop {
            let now = Instant::now();
            let Some(interval) = self.session.tick_interval() else {
                if let Some((_, input)) = self.pending.take() {
                    return Some(GameEvent::Input(input));
                }
                return self
                    .receiver
                    .recv()
                    .ok()
                    .map(|(_, input)| GameEvent::Input(input));
            };

            let next_tick_at = self.last_tick + interval;
            if now >= next_tick_at {
                if self.pending.is_none() {
                    self.pending = self.receiver.try_recv().ok();
                }
                if let Some((sent_at, input)) = self.pending
                    && sent_at < next_tick_at
                {
                    self.pending = None;
                    return Some(GameEvent::Input(input));
                }
                self.last_tick = now;
                return Some(GameEvent::Tick);
            }

            if let Some((_, input)) = self.pending.take() {
                return Some(GameEvent::Input(input));
            }
            match self.receiver.recv_timeout(next_tick_at - now) {
                Ok((_, input)) => return Some(GameEvent::Input(input)),
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    debug!("all input senders dropped");
                    return None;
                }
            }
        }
    }

    /// Applies `event` to the session.
    pub fn dispatch(&mut self, event: GameEvent) -> Notices {
        let notices = self.session.handle(event);
        if notices.contains(&Notice::Resumed) {
            // Gravity restarts from the moment of resuming.
            self.last_tick = Instant::now();
        }
        notices
    }

    /// Processes events until game over or until input is closed, calling
    /// `on_step` after each one.
    pub fn run<F>(mut self, mut on_step: F) -> GameSession
    where
        F: FnMut(&GameSession, GameEvent, &Notices),
    {
        while !self.session.is_game_over() {
            let Some(event) = self.next_event() else {
                break;
            };
            let notices = self.dispatch(event);
            on_step(&self.session, event, &notices);
        }
        self.session
    }

    /// Time left until the next gravity tick, if one is scheduled.
    #[must_use]
    pub fn time_to_next_tick(&self) -> Option<Duration> {
        let interval = self.session.tick_interval()?;
        Some((self.last_tick + interval).saturating_duration_since(Instant::now()))
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use crate::{GameConfig, GravityPolicy, PieceSeed};

    use super::*;

    fn session(config: GameConfig) -> GameSession {
        GameSession::with_seed(config, PieceSeed::from_bytes([3; 16])).unwrap()
    }

    #[test]
    fn test_inputs_are_processed_in_order() {
        let (event_loop, sender) = EventLoop::new(session(GameConfig::default()));
        let inputs = [
            InputEvent::MoveLeft,
            InputEvent::RotateCw,
            InputEvent::HardDrop,
            InputEvent::MoveRight,
            InputEvent::HardDrop,
        ];
        for input in inputs {
            sender.send(input).unwrap();
        }
        drop(sender);

        let mut events = vec![];
        let session = event_loop.run(|_, event, _| events.push(event));
        let expected: Vec<GameEvent> = inputs.into_iter().map(GameEvent::from).collect();
        assert_eq!(events, expected);
        assert_eq!(session.stats().completed_pieces(), 2);
    }

    #[test]
    fn test_fast_gravity_reaches_game_over() {
        let config = GameConfig {
            gravity: GravityPolicy {
                base_interval_ms: 1,
                step_ms: 0,
                min_interval_ms: 1,
            },
            ..GameConfig::default()
        };
        let (event_loop, sender) = EventLoop::new(session(config));

        let mut ticks = 0;
        let session = event_loop.run(|_, event, _| {
            assert!(event.is_tick());
            ticks += 1;
        });
        drop(sender);

        assert!(session.is_game_over());
        assert!(ticks > 20);
        assert!(session.stats().completed_pieces() > 0);
    }

    #[test]
    fn test_pause_stops_ticks() {
        let (mut event_loop, sender) = EventLoop::new(session(GameConfig::default()));
        assert!(event_loop.time_to_next_tick().is_some());

        sender.send(InputEvent::Pause).unwrap();
        let event = event_loop.next_event().unwrap();
        assert_eq!(event, GameEvent::Input(InputEvent::Pause));
        event_loop.dispatch(event);
        assert_eq!(event_loop.time_to_next_tick(), None);

        sender.send(InputEvent::Pause).unwrap();
        let event = event_loop.next_event().unwrap();
        let notices = event_loop.dispatch(event);
        assert_eq!(notices.as_slice(), &[Notice::Resumed]);
        assert!(event_loop.time_to_next_tick().unwrap() > Duration::from_millis(500));
    }

    #[test]
    fn test_input_sent_before_deadline_precedes_tick() {
        let config = GameConfig {
            gravity: GravityPolicy {
                base_interval_ms: 50,
                step_ms: 0,
                min_interval_ms: 50,
            },
            ..GameConfig::default()
        };
        let (mut event_loop, sender) = EventLoop::new(session(config));

        sender.send(InputEvent::MoveLeft).unwrap();
        thread::sleep(Duration::from_millis(120));
        sender.send(InputEvent::MoveRight).unwrap();

        assert_eq!(
            event_loop.next_event(),
            Some(GameEvent::Input(InputEvent::MoveLeft))
        );
        // MoveRight was sent after the overdue tick's deadline.
        assert_eq!(event_loop.next_event(), Some(GameEvent::Tick));
        assert_eq!(
            event_loop.next_event(),
            Some(GameEvent::Input(InputEvent::MoveRight))
        );
    }

    #[test]
    fn test_send_after_loop_dropped_fails() {
        let (event_loop, sender) = EventLoop::new(session(GameConfig::default()));
        drop(event_loop);
        assert_eq!(sender.send(InputEvent::MoveLeft), Err(SessionClosedError));
    }
}
