//! Frame driver: an explicit cooperative loop that steps the active session
//! once per frame and owns the cancellation token for it.
//!
//! Each iteration drains input, applies the intent, steps, and presents the
//! frame before the next one starts.  The token is checked at the top of
//! every frame, so once `cancel()` returns no further step or draw happens.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::Event;
use rand::Rng;

use crate::entities::Terminal;
use crate::error::ArcadeError;
use crate::input::{Command, InputListener};
use crate::session::{Session, StepOutcome};

/// Shared stop flag for one session.  Cancelling is idempotent.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Releases the session token on every exit path out of `run`.
struct TokenGuard(CancelToken);

impl Drop for TokenGuard {
    fn drop(&mut self) {
        self.0.cancel();
    }
}

/// Where input comes from between frames.
pub trait InputSource {
    /// Every event that arrived since the last call, without blocking.
    fn drain(&mut self) -> Vec<Event>;
}

impl InputSource for mpsc::Receiver<Event> {
    fn drain(&mut self) -> Vec<Event> {
        self.try_iter().collect()
    }
}

/// Where finished frames go.
pub trait FrameSink {
    fn present(&mut self, session: &Session) -> Result<(), ArcadeError>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverExit {
    /// The session reached a terminal signal.
    Terminal(Terminal),
    /// Stopped by the player or by `cancel()`; the score is not reported.
    Stopped,
    /// The player asked to leave the program.
    Quit,
}

#[derive(Debug)]
pub struct FrameDriver {
    frame_interval: Duration,
    active: Option<CancelToken>,
}

impl FrameDriver {
    pub fn new(frame_interval: Duration) -> Self {
        FrameDriver {
            frame_interval,
            active: None,
        }
    }

    pub fn frame_interval(&self) -> Duration {
        self.frame_interval
    }

    pub fn set_frame_interval(&mut self, frame_interval: Duration) {
        self.frame_interval = frame_interval;
    }

    /// Issue the token for a new session, cancelling the previous one first.
    pub fn start(&mut self) -> CancelToken {
        self.stop();
        let token = CancelToken::new();
        self.active = Some(token.clone());
        token
    }

    /// Cancel the active session, if any.  Safe to call repeatedly.
    pub fn stop(&mut self) {
        if let Some(token) = self.active.take() {
            token.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.active.as_ref().is_some_and(|t| !t.is_cancelled())
    }

    /// Run `session` until it ends, is stopped, or the player quits.
    pub fn run<I, S, R>(
        &mut self,
        token: CancelToken,
        session: &mut Session,
        listener: &mut InputListener,
        input: &mut I,
        sink: &mut S,
        rng: &mut R,
    ) -> Result<DriverExit, ArcadeError>
    where
        I: InputSource + ?Sized,
        S: FrameSink + ?Sized,
        R: Rng,
    {
        let _guard = TokenGuard(token.clone());
        tracing::debug!(game = %session.game(), "frame driver started");

        loop {
            if token.is_cancelled() {
                tracing::debug!(frame = session.frame(), "session stopped");
                return Ok(DriverExit::Stopped);
            }
            let frame_start = Instant::now();

            for event in input.drain() {
                match listener.handle(&event) {
                    Some(Command::Stop) => token.cancel(),
                    Some(Command::Quit) => {
                        token.cancel();
                        return Ok(DriverExit::Quit);
                    }
                    None => {}
                }
            }
            if token.is_cancelled() {
                tracing::debug!(frame = session.frame(), "session stopped");
                return Ok(DriverExit::Stopped);
            }

            session.apply_input(listener.take_intent());
            let outcome = session.step(rng);
            sink.present(session)?;

            match outcome {
                StepOutcome::Terminal(terminal) => return Ok(DriverExit::Terminal(terminal)),
                StepOutcome::Inactive => return Ok(DriverExit::Stopped),
                StepOutcome::Continue => {}
            }

            let elapsed = frame_start.elapsed();
            if elapsed < self.frame_interval {
                thread::sleep(self.frame_interval - elapsed);
            }
        }
    }
}

impl Drop for FrameDriver {
    fn drop(&mut self) {
        self.stop();
    }
}
