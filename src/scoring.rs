use crate::session::Session;
use crate::util::mean;
use std::time::Duration;

/// Derived metrics for one finished attempt.
///
/// Produced exactly once per session by [`score`]; the session itself is
/// discarded afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    pub elapsed_secs: f64,
    pub chars_typed: usize,
    pub correct_keystrokes: usize,
    /// Correct keystrokes over typed characters, 0–100.
    pub accuracy: f64,
    /// Words per minute under the fixed 5-chars-per-word heuristic.
    pub wpm: f64,
    /// 100 = perfectly steady inter-keystroke rhythm, 0 = erratic.
    pub uniformity_score: u32,
    /// Mean absolute deviation of intervals from the ideal interval.
    pub avg_deviation: f64,
}

/// Turns a session's raw counters into a [`Score`].
///
/// Every division is guarded: zero typed characters, zero elapsed time and
/// zero recorded intervals all yield zeros rather than errors.
pub fn score(session: &Session, elapsed: Duration) -> Score {
    let elapsed_secs = elapsed.as_secs_f64();
    let chars_typed = session.position();
    let correct_keystrokes = session.correct_keystrokes();

    let accuracy = if chars_typed > 0 {
        correct_keystrokes as f64 / chars_typed as f64 * 100.0
    } else {
        0.0
    };

    let wpm = if elapsed_secs > 0.0 {
        (chars_typed as f64 / 5.0) / (elapsed_secs / 60.0)
    } else {
        0.0
    };

    let ideal_interval = if chars_typed > 0 {
        elapsed_secs / chars_typed as f64
    } else {
        0.0
    };

    let deviations: Vec<f64> = session
        .intervals()
        .iter()
        .map(|interval| (interval - ideal_interval).abs())
        .collect();
    let avg_deviation = mean(&deviations).unwrap_or(0.0);

    let deviation_score = if ideal_interval > 0.0 {
        ((avg_deviation / ideal_interval * 100.0) as u32).min(100)
    } else {
        0
    };

    Score {
        elapsed_secs,
        chars_typed,
        correct_keystrokes,
        accuracy,
        wpm,
        uniformity_score: 100 - deviation_score,
        avg_deviation,
    }
}
