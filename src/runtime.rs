use crate::scoring::{score, Score};
use crate::session::Session;
use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyCode, KeyEventKind};

/// Default wall-clock budget for one attempt.
pub const DEFAULT_TIME_BUDGET: Duration = Duration::from_secs(60);

/// A discrete key event as the core sees it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyInput {
    Char(char),
    /// The distinguished abort code (ESC at the terminal).
    Abort,
}

/// Non-blocking key source. `None` is the "no input available" sentinel;
/// the driving loop re-checks its deadline and polls again.
pub trait InputSource {
    fn poll(&mut self) -> Option<KeyInput>;
}

/// Monotonic clock, injected so the core never reads global time.
pub trait Clock {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Production input source over crossterm. Waits at most `poll_interval`
/// per poll so the driving loop keeps observing its deadline.
pub struct CrosstermInput {
    poll_interval: Duration,
}

impl CrosstermInput {
    pub fn new() -> Self {
        Self {
            poll_interval: Duration::from_millis(10),
        }
    }
}

impl Default for CrosstermInput {
    fn default() -> Self {
        Self::new()
    }
}

impl InputSource for CrosstermInput {
    fn poll(&mut self) -> Option<KeyInput> {
        if !event::poll(self.poll_interval).unwrap_or(false) {
            return None;
        }
        match event::read() {
            Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char(c) => Some(KeyInput::Char(c)),
                KeyCode::Esc => Some(KeyInput::Abort),
                _ => None,
            },
            _ => None,
        }
    }
}

/// Rendering hook the driver calls after every accepted keystroke.
pub trait AttemptView {
    fn draw(&mut self, session: &Session) -> io::Result<()>;
}

/// View that draws nothing; used headless.
pub struct NullView;

impl AttemptView for NullView {
    fn draw(&mut self, _session: &Session) -> io::Result<()> {
        Ok(())
    }
}

/// How an attempt stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptEnd {
    /// The whole exercise text was typed.
    Completed,
    /// The wall-clock budget elapsed first.
    TimedOut,
    /// The abort key was received.
    Aborted,
}

#[derive(Debug, Clone)]
pub struct Attempt {
    pub score: Score,
    pub end: AttemptEnd,
}

/// Drives one session to its end: a cooperative busy-poll that feeds
/// keystrokes into the session and re-checks the deadline every
/// iteration. Timeout and abort are observed here, with loop-iteration
/// granularity; the session itself only knows text exhaustion.
pub fn run_attempt<I, C, V>(
    session: &mut Session,
    input: &mut I,
    clock: &C,
    view: &mut V,
    budget: Duration,
) -> io::Result<Attempt>
where
    I: InputSource,
    C: Clock,
    V: AttemptView,
{
    let start = clock.now();
    view.draw(session)?;

    let end = loop {
        if session.is_completed() {
            break AttemptEnd::Completed;
        }

        let now = clock.now();
        if now.duration_since(start) >= budget {
            break AttemptEnd::TimedOut;
        }

        match input.poll() {
            None => continue,
            Some(KeyInput::Abort) => break AttemptEnd::Aborted,
            Some(KeyInput::Char(c)) => {
                session.process_keystroke(c, now);
                view.draw(session)?;
            }
        }
    };

    let elapsed = clock.now().duration_since(start);
    Ok(Attempt {
        score: score(session, elapsed),
        end,
    })
}

/// Scripted input source for tests: yields the queued polls in order,
/// then the no-input sentinel forever.
pub struct ScriptedInput {
    polls: std::collections::VecDeque<Option<KeyInput>>,
}

impl ScriptedInput {
    pub fn new<I: IntoIterator<Item = Option<KeyInput>>>(polls: I) -> Self {
        Self {
            polls: polls.into_iter().collect(),
        }
    }

    pub fn typing(text: &str) -> Self {
        Self::new(text.chars().map(|c| Some(KeyInput::Char(c))))
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> Option<KeyInput> {
        self.polls.pop_front().flatten()
    }
}

/// Deterministic test clock that advances a fixed step per reading.
pub struct SteppingClock {
    start: Instant,
    step: Duration,
    reads: std::cell::Cell<u32>,
}

impl SteppingClock {
    pub fn new(step: Duration) -> Self {
        Self {
            start: Instant::now(),
            step,
            reads: std::cell::Cell::new(0),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> Instant {
        let reads = self.reads.get();
        self.reads.set(reads + 1);
        self.start + self.step * reads
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attempt_completes_when_text_is_typed() {
        let mut session = Session::new("cat");
        let mut input = ScriptedInput::typing("cat");
        let clock = SteppingClock::new(Duration::from_millis(100));

        let attempt = run_attempt(
            &mut session,
            &mut input,
            &clock,
            &mut NullView,
            DEFAULT_TIME_BUDGET,
        )
        .unwrap();

        assert_eq!(attempt.end, AttemptEnd::Completed);
        assert_eq!(attempt.score.correct_keystrokes, 3);
        assert_eq!(attempt.score.accuracy, 100.0);
    }

    #[test]
    fn abort_key_ends_the_attempt_early() {
        let mut session = Session::new("cat");
        let mut input = ScriptedInput::new([
            Some(KeyInput::Char('c')),
            Some(KeyInput::Abort),
            Some(KeyInput::Char('a')),
        ]);
        let clock = SteppingClock::new(Duration::from_millis(100));

        let attempt = run_attempt(
            &mut session,
            &mut input,
            &clock,
            &mut NullView,
            DEFAULT_TIME_BUDGET,
        )
        .unwrap();

        assert_eq!(attempt.end, AttemptEnd::Aborted);
        assert_eq!(attempt.score.chars_typed, 1);
    }

    #[test]
    fn deadline_fires_when_no_input_arrives() {
        let mut session = Session::new("cat");
        // nothing but no-input sentinels; the stepping clock walks the
        // loop past the one-second budget
        let mut input = ScriptedInput::new(std::iter::empty());
        let clock = SteppingClock::new(Duration::from_millis(200));

        let attempt = run_attempt(
            &mut session,
            &mut input,
            &clock,
            &mut NullView,
            Duration::from_secs(1),
        )
        .unwrap();

        assert_eq!(attempt.end, AttemptEnd::TimedOut);
        assert_eq!(attempt.score.chars_typed, 0);
        assert_eq!(attempt.score.accuracy, 0.0);
    }

    #[test]
    fn no_input_polls_do_not_advance_the_session() {
        let mut session = Session::new("ab");
        let mut input = ScriptedInput::new([
            None,
            Some(KeyInput::Char('a')),
            None,
            None,
            Some(KeyInput::Char('b')),
        ]);
        let clock = SteppingClock::new(Duration::from_millis(50));

        let attempt = run_attempt(
            &mut session,
            &mut input,
            &clock,
            &mut NullView,
            DEFAULT_TIME_BUDGET,
        )
        .unwrap();

        assert_eq!(attempt.end, AttemptEnd::Completed);
        assert_eq!(attempt.score.chars_typed, 2);
    }

    #[test]
    fn empty_exercise_completes_without_polling() {
        let mut session = Session::new("");
        let mut input = ScriptedInput::new(std::iter::empty());
        let clock = SteppingClock::new(Duration::from_millis(50));

        let attempt = run_attempt(
            &mut session,
            &mut input,
            &clock,
            &mut NullView,
            DEFAULT_TIME_BUDGET,
        )
        .unwrap();

        assert_eq!(attempt.end, AttemptEnd::Completed);
        assert_eq!(attempt.score.chars_typed, 0);
    }

    #[test]
    fn mistyped_characters_still_count_as_typed() {
        let mut session = Session::new("cat");
        let mut input = ScriptedInput::typing("cxt");
        let clock = SteppingClock::new(Duration::from_millis(100));

        let attempt = run_attempt(
            &mut session,
            &mut input,
            &clock,
            &mut NullView,
            DEFAULT_TIME_BUDGET,
        )
        .unwrap();

        assert_eq!(attempt.end, AttemptEnd::Completed);
        assert_eq!(attempt.score.chars_typed, 3);
        assert_eq!(attempt.score.correct_keystrokes, 2);
    }
}
