use std::time::Instant;

#[derive(Clone, Debug, Copy, PartialEq, Eq)]
pub enum Outcome {
    Correct,
    Incorrect,
}

/// Tracks one attempt at typing a fixed exercise text.
///
/// The session only knows about text-exhaustion completion; wall-clock
/// budgets and abort keys are the driving loop's concern (see
/// [`crate::runtime::run_attempt`]).
#[derive(Debug, Clone)]
pub struct Session {
    text: Vec<char>,
    position: usize,
    correct: usize,
    intervals: Vec<f64>,
    completed: bool,
    last_keystroke_at: Option<Instant>,
}

impl Session {
    /// Starts a session over `text`. An empty exercise produces a session
    /// that is already completed with zero counters.
    pub fn new(text: &str) -> Self {
        let text: Vec<char> = text.chars().collect();
        let completed = text.is_empty();
        Self {
            text,
            position: 0,
            correct: 0,
            intervals: Vec::new(),
            completed,
            last_keystroke_at: None,
        }
    }

    /// Feeds one typed character, stamped with the caller's clock reading.
    ///
    /// Returns `None` once the session is completed: further keystrokes are
    /// ignored and leave every counter untouched.
    pub fn process_keystroke(&mut self, c: char, now: Instant) -> Option<Outcome> {
        if self.completed {
            return None;
        }

        let outcome = if c == self.text[self.position] {
            self.correct += 1;
            Outcome::Correct
        } else {
            Outcome::Incorrect
        };

        // The very first keystroke has no prior timestamp to measure from.
        if let Some(last) = self.last_keystroke_at {
            self.intervals.push(now.duration_since(last).as_secs_f64());
        }
        self.last_keystroke_at = Some(now);

        self.position += 1;
        self.completed = self.position == self.text.len();

        Some(outcome)
    }

    pub fn text(&self) -> &[char] {
        &self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Characters typed so far.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn correct_keystrokes(&self) -> usize {
        self.correct
    }

    /// Wall-clock seconds between consecutive keystrokes, in order.
    pub fn intervals(&self) -> &[f64] {
        &self.intervals
    }

    pub fn is_completed(&self) -> bool {
        self.completed
    }
}
