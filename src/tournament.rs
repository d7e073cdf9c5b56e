use crate::bracket::{self, Bracket, CompetitorId};
use crate::exercise::exercise_text;
use crate::scoring::Score;
use crate::settings::Settings;
use rand::Rng;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TournamentError {
    #[error("a tournament needs at least two competitors, got {0}")]
    TooFewCompetitors(usize),
    #[error("odd competitor count {0} needs an explicit bye policy")]
    OddCompetitors(usize),
}

/// What to do with the trailing competitor of an odd bracket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ByePolicy {
    /// Reject odd rosters at setup time.
    #[default]
    Disallow,
    /// The last unpaired competitor advances to the next round unplayed.
    AutoAdvance,
}

#[derive(Debug, Clone)]
pub struct Competitor {
    pub id: CompetitorId,
    pub name: String,
}

/// Runs one competitor's attempt at the given exercise and returns its
/// score. The terminal front end implements this; tests script it.
pub trait AttemptRunner {
    fn run_attempt(&mut self, competitor: &Competitor, exercise: &str, round: u32) -> Score;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Setup,
    RoundInProgress,
    RoundComplete,
    Finished,
}

#[derive(Debug, Clone)]
pub struct Champion {
    pub id: CompetitorId,
    pub name: String,
    pub best: Score,
}

/// Single-elimination orchestrator: one serialized match per surviving
/// pair per round, until one competitor remains.
pub struct Tournament {
    roster: Vec<Competitor>,
    settings: Settings,
    big_text: bool,
    survivors: Vec<CompetitorId>,
    bracket: Bracket,
    best: HashMap<CompetitorId, Score>,
    round: u32,
    phase: Phase,
}

impl Tournament {
    /// Validates the roster and builds the initial pairing table.
    ///
    /// `big_text` pins every round to the long-form exercise; otherwise a
    /// fresh level is drawn after every match.
    pub fn new(
        names: Vec<String>,
        mut settings: Settings,
        big_text: bool,
        bye_policy: ByePolicy,
    ) -> Result<Self, TournamentError> {
        if names.len() < 2 {
            return Err(TournamentError::TooFewCompetitors(names.len()));
        }
        if names.len() % 2 != 0 && bye_policy == ByePolicy::Disallow {
            return Err(TournamentError::OddCompetitors(names.len()));
        }

        if big_text {
            settings.set_big_text();
        }

        let roster: Vec<Competitor> = names
            .into_iter()
            .enumerate()
            .map(|(i, name)| Competitor {
                id: CompetitorId(i),
                name,
            })
            .collect();
        let survivors: Vec<CompetitorId> = roster.iter().map(|c| c.id).collect();
        let bracket = bracket::build(&survivors);

        Ok(Self {
            roster,
            settings,
            big_text,
            survivors,
            bracket,
            best: HashMap::new(),
            round: 0,
            phase: Phase::Setup,
        })
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> u32 {
        self.round
    }

    pub fn survivors(&self) -> &[CompetitorId] {
        &self.survivors
    }

    pub fn bracket(&self) -> &Bracket {
        &self.bracket
    }

    pub fn competitor(&self, id: CompetitorId) -> &Competitor {
        &self.roster[id.0]
    }

    /// Drives the whole tournament and returns the champion with their
    /// best score across all matches played.
    pub fn run<A: AttemptRunner, R: Rng>(&mut self, runner: &mut A, rng: &mut R) -> Champion {
        while self.survivors.len() > 1 {
            self.play_round(runner, rng);
        }
        self.phase = Phase::Finished;

        let id = self.survivors[0];
        let best = self.best.get(&id).cloned().unwrap_or_else(empty_score);
        Champion {
            id,
            name: self.competitor(id).name.clone(),
            best,
        }
    }

    fn play_round<A: AttemptRunner, R: Rng>(&mut self, runner: &mut A, rng: &mut R) {
        self.phase = Phase::RoundInProgress;
        self.round += 1;
        self.rewire_opponents();

        let pairings: Vec<Vec<CompetitorId>> =
            self.survivors.chunks(2).map(|c| c.to_vec()).collect();

        let mut winners = Vec::with_capacity(pairings.len());
        for pair in pairings {
            match pair[..] {
                [first, second] => {
                    winners.push(self.play_match(first, second, runner, rng));
                }
                // odd tail, only reachable under ByePolicy::AutoAdvance
                [bye] => winners.push(bye),
                _ => unreachable!("chunks(2) yields one or two competitors"),
            }
        }

        self.survivors = winners;
        self.phase = Phase::RoundComplete;
    }

    /// Pairs are processed strictly in survivor order and the two attempts
    /// run back to back on the same exercise text, never concurrently.
    fn play_match<A: AttemptRunner, R: Rng>(
        &mut self,
        first: CompetitorId,
        second: CompetitorId,
        runner: &mut A,
        rng: &mut R,
    ) -> CompetitorId {
        let exercise = exercise_text(&self.settings);

        let first_score = runner.run_attempt(self.competitor(first), &exercise, self.round);
        let second_score = runner.run_attempt(self.competitor(second), &exercise, self.round);

        self.record_result(first, first_score.clone());
        self.record_result(second, second_score.clone());

        if !self.big_text {
            self.settings.randomize_level(rng);
        }

        decide_match(first, second, &first_score, &second_score)
    }

    fn record_result(&mut self, id: CompetitorId, score: Score) {
        if let Some(node) = self.bracket.get_mut(&id) {
            node.results.push(score.clone());
        }
        match self.best.get(&id) {
            Some(best) if best.correct_keystrokes >= score.correct_keystrokes => {}
            _ => {
                self.best.insert(id, score);
            }
        }
    }

    /// Rewrites the bracket's opponent links to match the current
    /// survivor pairing. The round tag keeps its build-time value.
    fn rewire_opponents(&mut self) {
        for pair in self.survivors.chunks(2) {
            let first = pair[0];
            let second = pair.get(1).copied();
            if let Some(node) = self.bracket.get_mut(&first) {
                node.opponent = second;
            }
            if let Some(second) = second {
                if let Some(node) = self.bracket.get_mut(&second) {
                    node.opponent = Some(first);
                }
            }
        }
    }
}

/// Match winner rule: more correct keystrokes wins; ties go to the higher
/// uniformity score; a full tie goes to the second listed competitor.
/// The last step is deliberate and fixed, not an accident of ordering.
pub fn decide_match(
    first: CompetitorId,
    second: CompetitorId,
    first_score: &Score,
    second_score: &Score,
) -> CompetitorId {
    if first_score.correct_keystrokes != second_score.correct_keystrokes {
        if first_score.correct_keystrokes > second_score.correct_keystrokes {
            first
        } else {
            second
        }
    } else if first_score.uniformity_score > second_score.uniformity_score {
        first
    } else {
        second
    }
}

fn empty_score() -> Score {
    Score {
        elapsed_secs: 0.0,
        chars_typed: 0,
        correct_keystrokes: 0,
        accuracy: 0.0,
        wpm: 0.0,
        uniformity_score: 100,
        avg_deviation: 0.0,
    }
}
