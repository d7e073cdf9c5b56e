pub mod bracket;
pub mod exercise;
pub mod records;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod settings;
pub mod stats;
pub mod tournament;
pub mod ui;
pub mod util;

use crate::exercise::exercise_text;
use crate::records::{Record, RecordStore};
use crate::runtime::{run_attempt, CrosstermInput, SystemClock, DEFAULT_TIME_BUDGET};
use crate::scoring::Score;
use crate::session::Session;
use crate::settings::{Difficulty, Language, Level, Settings};
use crate::stats::{TournamentStat, TournamentStatStore};
use crate::tournament::{AttemptRunner, ByePolicy, Competitor, Tournament};
use crate::ui::TerminalView;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::error::Error;
use std::io;
use std::time::Duration;

/// terminal typing trainer with a single-elimination tournament mode
#[derive(Parser, Debug, Clone)]
#[clap(version, about)]
pub struct Cli {
    /// exercise language
    #[clap(short, long, value_enum, default_value_t = Language::English)]
    language: Language,

    /// exercise difficulty
    #[clap(short, long, value_enum, default_value_t = Difficulty::Simple)]
    difficulty: Difficulty,

    /// exercise level
    #[clap(long, value_enum, default_value_t = Level::L1)]
    level: Level,

    /// seconds allowed per attempt
    #[clap(short, long, default_value_t = 60)]
    seconds: u64,

    /// run a tournament between the named competitors
    #[clap(short, long, num_args = 2.., value_name = "NAME")]
    tournament: Vec<String>,

    /// use the long-form exercise for every tournament round
    #[clap(long)]
    big_text: bool,

    /// let the last competitor of an odd roster advance unplayed
    #[clap(long)]
    allow_bye: bool,

    /// print recent attempt history and exit
    #[clap(long)]
    history: bool,

    /// print recent tournament winners and exit
    #[clap(long)]
    tournament_history: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if cli.history {
        return print_history();
    }
    if cli.tournament_history {
        return print_tournament_history();
    }

    let settings = Settings::new(cli.language, cli.difficulty, cli.level);
    let budget = if cli.seconds > 0 {
        Duration::from_secs(cli.seconds)
    } else {
        DEFAULT_TIME_BUDGET
    };

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = if cli.tournament.is_empty() {
        run_single(&mut terminal, settings, budget)
    } else {
        run_tournament(&mut terminal, &cli, settings, budget)
    };

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    outcome
}

fn print_history() -> Result<(), Box<dyn Error>> {
    let store = RecordStore::new();
    if store.is_empty() {
        println!("no attempts recorded yet");
        return Ok(());
    }
    for record in store.last(10) {
        println!(
            "{}  {} {} {}  {:.1} wpm  {:.1}%  {}",
            record.timestamp,
            record.language,
            record.difficulty,
            record.level,
            record.wpm,
            record.accuracy,
            if record.completed { "completed" } else { "unfinished" },
        );
    }
    Ok(())
}

fn print_tournament_history() -> Result<(), Box<dyn Error>> {
    let store = TournamentStatStore::new();
    if store.is_empty() {
        println!("no tournaments recorded yet");
        return Ok(());
    }
    for stat in store.last(10) {
        println!(
            "{}  {} {}  {} correct  uniformity {}",
            stat.name, stat.language, stat.difficulty, stat.correct_keystrokes, stat.uniformity_score,
        );
    }
    Ok(())
}

fn run_single<B: Backend>(
    terminal: &mut Terminal<B>,
    settings: Settings,
    budget: Duration,
) -> Result<(), Box<dyn Error>> {
    let mut store = RecordStore::new();
    let previous_best = store
        .best_record(settings.language, settings.difficulty, settings.level)
        .cloned();

    let text = exercise_text(&settings);
    let mut session = Session::new(&text);
    let mut input = CrosstermInput::new();
    let title = format!("{} / {} / {}", settings.language, settings.difficulty, settings.level);
    let mut view = TerminalView::new(terminal, title);

    let attempt = run_attempt(&mut session, &mut input, &SystemClock, &mut view, budget)?;

    let record = Record::from_attempt(&settings, &attempt.score, session.len());
    let is_new_best = previous_best
        .as_ref()
        .map_or(record.wpm > 0.0, |best| record.wpm > best.wpm);
    store.save_record(record)?;

    ui::draw_results(terminal, &attempt.score, previous_best.as_ref(), is_new_best)?;
    wait_for_key()?;
    Ok(())
}

fn run_tournament<B: Backend>(
    terminal: &mut Terminal<B>,
    cli: &Cli,
    settings: Settings,
    budget: Duration,
) -> Result<(), Box<dyn Error>> {
    let bye_policy = if cli.allow_bye {
        ByePolicy::AutoAdvance
    } else {
        ByePolicy::Disallow
    };
    let mut tournament =
        Tournament::new(cli.tournament.clone(), settings, cli.big_text, bye_policy)?;

    let mut runner = TerminalRunner { terminal, budget };
    let champion = tournament.run(&mut runner, &mut rand::thread_rng());

    let mut store = TournamentStatStore::new();
    store.save_stat(TournamentStat::new(
        settings.language,
        settings.difficulty,
        champion.name.clone(),
        &champion.best,
    ))?;

    ui::draw_champion(terminal, &champion)?;
    wait_for_key()?;
    Ok(())
}

/// Runs each tournament attempt at the real terminal: banner, keypress to
/// start, then the timed session.
struct TerminalRunner<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    budget: Duration,
}

impl<B: Backend> AttemptRunner for TerminalRunner<'_, B> {
    fn run_attempt(&mut self, competitor: &Competitor, exercise: &str, round: u32) -> Score {
        let _ = ui::draw_match_banner(self.terminal, round, &competitor.name);
        let _ = wait_for_key();

        let mut session = Session::new(exercise);
        let mut input = CrosstermInput::new();
        let title = format!("Round {} — {}", round, competitor.name);
        let mut view = TerminalView::new(self.terminal, title);

        match run_attempt(&mut session, &mut input, &SystemClock, &mut view, self.budget) {
            Ok(attempt) => attempt.score,
            // a draw failure forfeits the attempt with whatever was typed
            Err(_) => crate::scoring::score(&session, Duration::ZERO),
        }
    }
}

fn wait_for_key() -> io::Result<()> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                return Ok(());
            }
        }
    }
}
