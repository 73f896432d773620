use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph, Widget, Wrap},
};

use crate::{
    app::App,
    burst::Burst,
    clock::Clock,
    machine::State,
    rating::Rating,
    util::{format_ms, format_opt_ms},
};

const HORIZONTAL_MARGIN: u16 = 5;
const VERTICAL_MARGIN: u16 = 1;

const INSTRUCTIONS: [&str; 4] = [
    "Press SPACE or click to start a round.",
    "Wait for the box to turn green, then react as fast as you can.",
    "Reacting before the cue is a false start.",
    "(s)tart / (r)eset stats / (esc)ape",
];

pub fn rating_color(rating: Rating) -> Color {
    match rating {
        Rating::Amazing => Color::Magenta,
        Rating::VeryGood => Color::Cyan,
        Rating::Good => Color::Green,
        Rating::Average => Color::Yellow,
        Rating::BelowAverage => Color::Red,
    }
}

fn box_style(state: State) -> Style {
    match state {
        State::Idle | State::Complete => Style::default().fg(Color::Gray),
        State::Waiting => Style::default().fg(Color::White).bg(Color::Red),
        State::Ready => Style::default().fg(Color::Black).bg(Color::Green),
        State::FalseStart => Style::default().fg(Color::Black).bg(Color::Yellow),
    }
}

impl<C: Clock> Widget for &App<C> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let bold_style = Style::default().add_modifier(Modifier::BOLD);
        let italic_style = Style::default().add_modifier(Modifier::ITALIC);
        let dim_style = Style::default().add_modifier(Modifier::DIM);

        let stats = self.machine.stats();
        let history_rows = stats.count().min(self.history_len) as u16;
        let history_height = if history_rows > 0 { history_rows + 2 } else { 0 };

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .vertical_margin(VERTICAL_MARGIN)
            .constraints([
                Constraint::Length(1),              // title
                Constraint::Min(5),                 // game box
                Constraint::Length(1),              // last score
                Constraint::Length(1),              // stats
                Constraint::Length(history_height), // recent attempts
                Constraint::Length(1),              // legend
            ])
            .split(area);

        Paragraph::new(Span::styled("⚡ reaction timer", bold_style))
            .alignment(Alignment::Center)
            .render(chunks[0], buf);

        render_game_box(self, chunks[1], buf);

        if let Some(ms) = self.last_score {
            let rating = Rating::from_ms(ms);
            Paragraph::new(Line::from(vec![
                Span::styled(format!("{}   ", format_ms(ms)), bold_style),
                Span::styled(
                    rating.label(),
                    Style::default().patch(bold_style).fg(rating_color(rating)),
                ),
            ]))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);
        }

        let mut summary = vec![
            format!("Attempts: {}", stats.count()),
            format!("Best: {}", format_opt_ms(stats.best())),
            format!("Average: {}", format_opt_ms(stats.average())),
        ];
        if stats.count() > 1 {
            summary.push(format!("Spread: ±{}", format_opt_ms(stats.std_dev())));
        }
        Paragraph::new(Span::styled(summary.iter().join("   "), bold_style))
            .alignment(Alignment::Center)
            .render(chunks[3], buf);

        if history_rows > 0 {
            let total = stats.count();
            let lines: Vec<Line> = stats
                .attempts()
                .iter()
                .enumerate()
                .rev()
                .take(self.history_len)
                .map(|(idx, attempt)| {
                    let rating = Rating::from_ms(attempt.ms);
                    Line::from(vec![
                        Span::styled(format!("#{:<4}", idx + 1), dim_style),
                        Span::raw(format!("{}  ", attempt.recorded_at.format("%H:%M:%S"))),
                        Span::styled(format!("{:>7}  ", format_ms(attempt.ms)), bold_style),
                        Span::styled(
                            rating.to_string(),
                            Style::default().fg(rating_color(rating)),
                        ),
                    ])
                })
                .collect();

            Paragraph::new(lines)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!("Recent ({} of {})", history_rows, total)),
                )
                .render(chunks[4], buf);
        }

        Paragraph::new(Span::styled(
            "(space/click) react / (s)tart / (r)eset stats / (esc)ape",
            italic_style,
        ))
        .alignment(Alignment::Center)
        .render(chunks[5], buf);

        if self.burst.is_active {
            render_burst(&self.burst, area, buf);
        }
    }
}

fn render_game_box<C: Clock>(app: &App<C>, area: Rect, buf: &mut Buffer) {
    let state = app.state();
    let style = box_style(state);
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .style(style);
    let inner = block.inner(area);
    block.render(area, buf);

    let lines: Vec<Line> = match state {
        State::Idle if !app.has_played() => INSTRUCTIONS
            .iter()
            .map(|l| Line::from(Span::raw(*l)))
            .collect(),
        State::Idle => vec![Line::from(Span::styled(
            "Press SPACE or click to start",
            bold,
        ))],
        State::Waiting => vec![Line::from(Span::styled("Wait for green...", bold))],
        State::Ready => vec![Line::from(Span::styled(
            "NOW! Press SPACE or click!",
            bold,
        ))],
        State::FalseStart => vec![
            Line::from(Span::styled("Too soon!", bold)),
            Line::from("Wait for the box to turn green."),
        ],
        State::Complete => match app.last_score {
            Some(ms) => {
                let rating = Rating::from_ms(ms);
                vec![
                    Line::from(Span::styled(format_ms(ms), bold)),
                    Line::from(Span::styled(
                        rating.label(),
                        Style::default().patch(bold).fg(rating_color(rating)),
                    )),
                ]
            }
            None => vec![Line::from("Round complete")],
        },
    };

    // vertically center the message inside the box
    let top_padding = inner.height.saturating_sub(lines.len() as u16) / 2;
    let padded = Rect {
        y: inner.y + top_padding,
        height: inner.height - top_padding,
        ..inner
    };

    Paragraph::new(lines)
        .style(style)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(padded, buf);
}

/// Draw burst particles on top of everything else
fn render_burst(burst: &Burst, area: Rect, buf: &mut Buffer) {
    for particle in &burst.particles {
        let x = particle.x as u16;
        let y = particle.y as u16;

        if x < area.width && y < area.height {
            let style = if particle.life > 0.6 {
                Style::default()
                    .fg(Color::LightGreen)
                    .add_modifier(Modifier::BOLD)
            } else if particle.life > 0.3 {
                Style::default().fg(Color::Green)
            } else {
                Style::default().fg(Color::Green).add_modifier(Modifier::DIM)
            };

            if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
                cell.set_symbol(&particle.symbol.to_string());
                cell.set_style(style);
            }
        }
    }
}
