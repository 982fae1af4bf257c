//! Tick sources.
//!
//! A tick source tells an animator what time it is and is told when the animator needs frames.
//! It never calls into the animator itself; whoever owns both pumps ticks into
//! [`BoundsAnimator::on_tick`](crate::animator::BoundsAnimator::on_tick).

use crossbeam::channel::{self, Receiver, TryRecvError};
use log::debug;
use std::time::{Duration, Instant};

/// A source of frame ticks.
pub trait TickSource {
    /// The current frame time.
    fn now(&self) -> Instant;

    /// Starts delivering ticks.
    fn subscribe(&mut self);

    /// Stops delivering ticks.
    fn unsubscribe(&mut self);

    /// Whether ticks are currently being delivered.
    fn is_subscribed(&self) -> bool;
}

/// Frame interval of a 60 Hz display.
pub const DEFAULT_FRAME_INTERVAL: Duration = Duration::from_micros(16_667);

/// A wall-clock frame timer.
///
/// While subscribed, a crossbeam ticker channel produces one instant per frame interval; `poll`
/// collapses whatever has accumulated into a single frame.
#[derive(Debug)]
pub struct FrameTimer {
    interval: Duration,
    ticker: Option<Receiver<Instant>>,
}

impl FrameTimer {
    pub fn new(interval: Duration) -> FrameTimer {
        FrameTimer {
            interval,
            ticker: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the current time if at least one frame has elapsed since the last poll.
    ///
    /// The ticker reports when a frame was due, which may lag far behind after a long gap, so
    /// the frame time is taken when polling instead.
    pub fn poll(&mut self) -> Option<Instant> {
        let mut elapsed = false;
        let mut disconnected = false;
        if let Some(ticker) = &self.ticker {
            loop {
                match ticker.try_recv() {
                    Ok(_) => elapsed = true,
                    Err(TryRecvError::Empty) => break,
                    Err(TryRecvError::Disconnected) => {
                        disconnected = true;
                        break;
                    }
                }
            }
        }
        if disconnected {
            self.ticker = None;
        }
        if elapsed {
            Some(self.now())
        } else {
            None
        }
    }

    /// The ticker channel, for use in `select!` loops.
    pub fn receiver(&self) -> Option<&Receiver<Instant>> {
        self.ticker.as_ref()
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        FrameTimer::new(DEFAULT_FRAME_INTERVAL)
    }
}

impl TickSource for FrameTimer {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn subscribe(&mut self) {
        if self.ticker.is_none() {
            debug!("frame timer started ({:?})", self.interval);
            self.ticker = Some(channel::tick(self.interval));
        }
    }

    fn unsubscribe(&mut self) {
        if self.ticker.take().is_some() {
            debug!("frame timer stopped");
        }
    }

    fn is_subscribed(&self) -> bool {
        self.ticker.is_some()
    }
}

/// A tick source driven by hand.
///
/// Time only moves when `advance` or `set_now` is called, which makes animations fully
/// deterministic.
#[derive(Debug, Clone)]
pub struct ManualTicks {
    now: Instant,
    subscribed: bool,
    subscriptions: usize,
}

impl ManualTicks {
    pub fn new() -> ManualTicks {
        ManualTicks {
            now: Instant::now(),
            subscribed: false,
            subscriptions: 0,
        }
    }

    /// Moves time forward and returns the new time.
    pub fn advance(&mut self, by: Duration) -> Instant {
        self.now += by;
        self.now
    }

    pub fn set_now(&mut self, now: Instant) {
        self.now = now;
    }

    /// How many times ticks were started, in total.
    pub fn subscriptions(&self) -> usize {
        self.subscriptions
    }
}

impl Default for ManualTicks {
    fn default() -> Self {
        ManualTicks::new()
    }
}

impl TickSource for ManualTicks {
    fn now(&self) -> Instant {
        self.now
    }

    fn subscribe(&mut self) {
        if !self.subscribed {
            self.subscribed = true;
            self.subscriptions += 1;
        }
    }

    fn unsubscribe(&mut self) {
        self.subscribed = false;
    }

    fn is_subscribed(&self) -> bool {
        self.subscribed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_ticks_advance() {
        let mut ticks = ManualTicks::new();
        let start = ticks.now();
        let later = ticks.advance(Duration::from_millis(40));
        assert_eq!(later - start, Duration::from_millis(40));
        assert_eq!(ticks.now(), later);
    }

    #[test]
    fn manual_ticks_count_subscriptions() {
        let mut ticks = ManualTicks::new();
        ticks.subscribe();
        ticks.subscribe();
        assert!(ticks.is_subscribed());
        assert_eq!(ticks.subscriptions(), 1);
        ticks.unsubscribe();
        ticks.subscribe();
        assert_eq!(ticks.subscriptions(), 2);
    }

    #[test]
    fn frame_timer_polls_only_while_subscribed() {
        let mut timer = FrameTimer::new(Duration::from_millis(1));
        assert_eq!(timer.poll(), None);

        timer.subscribe();
        assert!(timer.is_subscribed());
        std::thread::sleep(Duration::from_millis(5));
        assert!(timer.poll().is_some());

        timer.unsubscribe();
        assert!(!timer.is_subscribed());
        assert_eq!(timer.poll(), None);
    }

    #[test]
    fn frame_timer_reports_poll_time() {
        let mut timer = FrameTimer::new(Duration::from_millis(1));
        timer.subscribe();
        std::thread::sleep(Duration::from_millis(5));
        timer.poll();

        // the next frame was due long before this poll
        std::thread::sleep(Duration::from_millis(30));
        let before = Instant::now();
        let frame = timer.poll().unwrap();
        assert!(frame >= before);
    }
}
