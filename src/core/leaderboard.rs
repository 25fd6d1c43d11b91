use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::scores::{rank, ScoreRecord};

const MAX_USER_CHARS: usize = 10;

/// Formats milliseconds as `mm:ss`.
pub fn format_time(ms: u64) -> String {
    let secs = ms / 1000;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Long names are cut to ten characters and marked with "...".
pub fn truncate_user(user: &str) -> String {
    if user.chars().count() > MAX_USER_CHARS {
        let head: String = user.chars().take(MAX_USER_CHARS).collect();
        format!("{head}...")
    } else {
        user.to_string()
    }
}

pub struct Leaderboard {
    scores: Vec<ScoreRecord>,
    pub selected: usize,
}

impl Leaderboard {
    pub fn new(mut scores: Vec<ScoreRecord>) -> Self {
        rank(&mut scores);
        Self { scores, selected: 0 }
    }

    pub fn scores(&self) -> &[ScoreRecord] {
        &self.scores
    }

    pub fn run(&mut self, terminal: &mut ratatui::DefaultTerminal) -> Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    match key.code {
                        KeyCode::Up => self.selected = self.selected.saturating_sub(1),
                        KeyCode::Down => {
                            self.selected = (self.selected + 1).min(self.scores.len().saturating_sub(1))
                        }
                        KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                        _ => {}
                    }
                }
            }
        }
    }

    pub fn render(&self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .margin(2)
            .constraints([Constraint::Length(3), Constraint::Min(0), Constraint::Length(3)])
            .split(f.area());

        f.render_widget(
            Paragraph::new(" LEADERBOARD ")
                .block(Block::default().borders(Borders::ALL))
                .alignment(Alignment::Center),
            chunks[0],
        );

        if self.scores.is_empty() {
            f.render_widget(
                Paragraph::new("No scores yet")
                    .alignment(Alignment::Center)
                    .block(Block::default().title(" HIGH SCORES ").borders(Borders::ALL)),
                chunks[1],
            );
        } else {
            let items: Vec<ListItem> = self
                .scores
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let style = if i == self.selected {
                        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
                    } else {
                        Style::default()
                    };
                    ListItem::new(format!(
                        "{:>2}. User: {:<13} Level: {:<4} Words: {:<5} Time: {}",
                        i + 1,
                        truncate_user(&s.user),
                        s.level,
                        s.word_count,
                        format_time(s.time)
                    ))
                    .style(style)
                })
                .collect();

            let list = List::new(items).block(Block::default().title(" HIGH SCORES ").borders(Borders::ALL));
            let mut state = ListState::default().with_selected(Some(self.selected));
            f.render_stateful_widget(list, chunks[1], &mut state);
        }

        f.render_widget(
            Paragraph::new("[↑/↓] Navigate  [Q] Quit").alignment(Alignment::Center),
            chunks[2],
        );
    }
}
