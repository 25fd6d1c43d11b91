use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::core::leaderboard::format_time;
use crate::games::chaos_type::session::{ActiveWord, Phase, Snapshot};

/// Draws one frame of the game: stats bar, play field, input line and the
/// start / game-over overlays.
pub fn render(frame: &mut Frame, snap: &Snapshot, input: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3), Constraint::Length(3)])
        .split(frame.area());

    frame.render_widget(stats(snap), chunks[0]);

    let field = Block::default().title(" CHAOS TYPE ").borders(Borders::ALL);
    let inner = field.inner(chunks[1]);
    frame.render_widget(field, chunks[1]);

    if snap.phase == Phase::Running {
        for word in &snap.words {
            render_word(frame, inner, word, snap.now_ms, input);
        }
    }

    frame.render_widget(
        Paragraph::new(format!("> {input}")).block(Block::default().title(" TYPE ").borders(Borders::ALL)),
        chunks[2],
    );
    if snap.phase == Phase::Running {
        let x = chunks[2].x + 3 + input.chars().count() as u16;
        frame.set_cursor_position((x.min(chunks[2].right().saturating_sub(2)), chunks[2].y + 1));
    }

    match snap.phase {
        Phase::Start => overlay(
            frame,
            chunks[1],
            " START ",
            vec![
                Line::from("Type each word before it disappears."),
                Line::from("You have three lives and the game speeds up as you go."),
                Line::from(""),
                Line::from("[Enter] Start   [Esc] Quit"),
            ],
        ),
        Phase::End => overlay(
            frame,
            chunks[1],
            " GAME OVER ",
            vec![
                Line::from(format!("Words: {}   Level: {}", snap.word_count, snap.level)),
                Line::from(format!("Time: {}", format_time(snap.elapsed_ms))),
                Line::from(""),
                Line::from("[Enter] Play again   [Esc] Quit"),
            ],
        ),
        Phase::Running => {}
    }
}

fn stats(snap: &Snapshot) -> Paragraph<'static> {
    let hearts = "♥".repeat(snap.lives as usize);
    let line = Line::from(vec![
        Span::raw(" Lives: "),
        Span::styled(hearts, Style::default().fg(Color::Red)),
        Span::raw(format!(
            "   Words: {}   Level: {}   Speed: {}ms   Time: {}",
            snap.word_count,
            snap.level,
            snap.spawn_interval_ms,
            format_time(snap.elapsed_ms)
        )),
    ]);
    Paragraph::new(line).block(Block::default().borders(Borders::ALL))
}

fn render_word(frame: &mut Frame, area: Rect, word: &ActiveWord, now_ms: u64, input: &str) {
    let len = word.text.chars().count() as u16;
    if area.width == 0 || area.height == 0 || len == 0 {
        return;
    }
    let width = len.min(area.width);
    let free_cols = area.width - width;
    let x = area.x + ((word.x / 100.0) * free_cols as f32) as u16;
    let y = area.y + ((word.y / 100.0) * (area.height - 1) as f32) as u16;

    let total = word.expires_at_ms.saturating_sub(word.spawned_at_ms).max(1);
    let left = word.expires_at_ms.saturating_sub(now_ms);
    let color = match left * 4 / total {
        0 => Color::Red,
        1 => Color::Yellow,
        _ => Color::White,
    };
    let mut style = Style::default().fg(color);
    if !input.is_empty() && word.text.starts_with(input) {
        style = style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
    }

    frame.render_widget(Paragraph::new(word.text.as_str()).style(style), Rect::new(x, y, width, 1));
}

fn overlay(frame: &mut Frame, area: Rect, title: &'static str, lines: Vec<Line<'static>>) {
    let width = 60.min(area.width);
    let height = (lines.len() as u16 + 2).min(area.height);
    let rect = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );
    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::default().title(title).borders(Borders::ALL)),
        rect,
    );
}
