use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

use super::theme::Theme;
use crate::state::model::{SessionPhase, SessionView};

pub fn header<'a>(view: &'a SessionView) -> Paragraph<'a> {
    let (phase, phase_style) = match view.phase {
        SessionPhase::Training => ("TRAINING", Theme::ok()),
        SessionPhase::Stopping => ("STOPPING", Theme::warn()),
        SessionPhase::Finished => ("FINISHED", Theme::accent_cyan()),
        SessionPhase::Error => ("ERROR", Theme::error()),
    };

    let avg_loss = view
        .avg_loss
        .map(|l| format!("{l:.6}"))
        .unwrap_or_else(|| "-".into());

    let line1 = Line::from(vec![
        Span::styled(
            "Damped Envelope Trainer",
            Style::default().add_modifier(Modifier::BOLD),
        ),
        Span::raw("  |  "),
        Span::styled(phase, phase_style),
        Span::raw(format!(
            "  |  Elapsed: {:02}:{:02}",
            view.elapsed.as_secs() / 60,
            view.elapsed.as_secs() % 60,
        )),
    ]);

    let line2 = Line::from(vec![Span::raw(format!(
        "Epoch: {} / {}  |  Avg Loss: {avg_loss}  |  LR: {:.6}  |  Rollbacks: {}  |  Decays: {}",
        view.epoch, view.max_epochs, view.learning_rate, view.rollbacks, view.decays
    ))]);

    Paragraph::new(vec![line1, line2])
        .style(Theme::base())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border())
                .title(Span::styled("Overview", Theme::title())),
        )
        .wrap(Wrap { trim: true })
}

pub fn logs<'a>(view: &'a SessionView) -> Paragraph<'a> {
    let tail = view.logs.iter().rev().take(6).rev();

    let lines = tail
        .map(|l| {
            let style = match l.level {
                "WARN" => Theme::warn(),
                "ERROR" => Theme::error(),
                _ => Theme::info(),
            };

            Line::from(vec![
                Span::styled(format!("[{}] ", l.level), style),
                Span::raw(l.message.as_str()),
            ])
        })
        .collect::<Vec<_>>();

    Paragraph::new(lines)
        .style(Theme::base())
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Theme::border())
                .title(Span::styled(
                    "Events  [Up/Down] learning rate  [q/Esc] quit",
                    Theme::title(),
                )),
        )
        .wrap(Wrap { trim: true })
}
