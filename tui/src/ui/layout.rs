use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Computes the main layout regions.
///
/// # Returns
/// (header, body, logs)
pub fn vertical(area: Rect) -> (Rect, Rect, Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(10),
            Constraint::Length(8),
        ])
        .split(area);

    (chunks[0], chunks[1], chunks[2])
}

/// Splits body into (heatmap, samples).
pub fn body(area: Rect) -> (Rect, Rect) {
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    (cols[0], cols[1])
}

/// Splits the samples column into `n` stacked panels.
pub fn samples(area: Rect, n: usize) -> Vec<Rect> {
    let constraints = (0..n).map(|_| Constraint::Ratio(1, n as u32)).collect::<Vec<_>>();

    Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area)
        .to_vec()
}
