use crate::records::Record;
use crate::runtime::AttemptView;
use crate::scoring::Score;
use crate::session::Session;
use crate::tournament::Champion;
use std::io;

use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Terminal,
};

/// Renders the exercise text with the typed prefix highlighted.
fn exercise_lines<'a>(session: &Session, title: &'a str) -> (Line<'a>, Line<'a>, Line<'a>) {
    let typed: String = session.text()[..session.position()].iter().collect();
    let rest: String = session.text()[session.position()..].iter().collect();

    let header = Line::from(Span::styled(
        title.to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    let body = Line::from(vec![
        Span::styled(typed, Style::default().fg(Color::Green)),
        Span::styled(rest, Style::default().fg(Color::DarkGray)),
    ]);
    let footer = Line::from(Span::raw(format!(
        "{}/{} typed, {} correct — ESC to abort",
        session.position(),
        session.len(),
        session.correct_keystrokes()
    )));
    (header, body, footer)
}

fn frame_layout(area: ratatui::layout::Rect) -> std::rc::Rc<[ratatui::layout::Rect]> {
    Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(area)
}

/// Terminal-backed view for one attempt.
pub struct TerminalView<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
    title: String,
}

impl<'a, B: Backend> TerminalView<'a, B> {
    pub fn new(terminal: &'a mut Terminal<B>, title: String) -> Self {
        Self { terminal, title }
    }
}

impl<B: Backend> AttemptView for TerminalView<'_, B> {
    fn draw(&mut self, session: &Session) -> io::Result<()> {
        let (header, body, footer) = exercise_lines(session, &self.title);
        self.terminal.draw(|f| {
            let chunks = frame_layout(f.area());
            f.render_widget(Paragraph::new(header), chunks[0]);
            f.render_widget(
                Paragraph::new(body)
                    .block(Block::default().borders(Borders::ALL))
                    .wrap(Wrap { trim: false }),
                chunks[1],
            );
            f.render_widget(Paragraph::new(footer), chunks[2]);
        })?;
        Ok(())
    }
}

/// Results screen after a single-player attempt.
pub fn draw_results<B: Backend>(
    terminal: &mut Terminal<B>,
    score: &Score,
    best: Option<&Record>,
    is_new_best: bool,
) -> io::Result<()> {
    let mut lines = vec![
        Line::from(Span::styled(
            "Results",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("wpm        {:.1}", score.wpm)),
        Line::from(format!("accuracy   {:.1}%", score.accuracy)),
        Line::from(format!("correct    {}", score.correct_keystrokes)),
        Line::from(format!("uniformity {}", score.uniformity_score)),
        Line::from(format!("time       {:.1}s", score.elapsed_secs)),
    ];
    if is_new_best {
        lines.push(Line::from(Span::styled(
            "new personal best!",
            Style::default().fg(Color::Green),
        )));
    } else if let Some(best) = best {
        lines.push(Line::from(format!("best wpm   {:.1}", best.wpm)));
    }
    lines.push(Line::from("press any key"));

    draw_lines(terminal, lines)
}

/// Announcement shown before each tournament match.
pub fn draw_match_banner<B: Backend>(
    terminal: &mut Terminal<B>,
    round: u32,
    competitor: &str,
) -> io::Result<()> {
    draw_lines(
        terminal,
        vec![
            Line::from(Span::styled(
                format!("Round {round}"),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("{competitor}, get ready to type")),
            Line::from("press any key to start"),
        ],
    )
}

/// Final screen naming the tournament winner.
pub fn draw_champion<B: Backend>(terminal: &mut Terminal<B>, champion: &Champion) -> io::Result<()> {
    draw_lines(
        terminal,
        vec![
            Line::from(Span::styled(
                format!("{} wins the tournament!", champion.name),
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "best attempt: {} correct, uniformity {}",
                champion.best.correct_keystrokes, champion.best.uniformity_score
            )),
            Line::from("press any key"),
        ],
    )
}

fn draw_lines<B: Backend>(terminal: &mut Terminal<B>, lines: Vec<Line>) -> io::Result<()> {
    terminal.draw(|f| {
        f.render_widget(
            Paragraph::new(lines)
                .block(Block::default().borders(Borders::ALL))
                .wrap(Wrap { trim: false }),
            f.area(),
        );
    })?;
    Ok(())
}
