use machine_learning::arch::Network;
use ratatui::{widgets::Block, Frame};

use super::{
    layout,
    plots::{self, PlotSource, SAMPLE_PANELS},
    theme::Theme,
    widgets,
};
use crate::state::model::SessionView;

/// Draws the entire UI.
pub fn draw(f: &mut Frame, view: &SessionView, network: &Network, source: &PlotSource) {
    let area = f.size();
    f.render_widget(Block::default().style(Theme::base()), area);

    let (header_area, body_area, logs_area) = layout::vertical(area);
    let (heatmap_area, samples_area) = layout::body(body_area);

    f.render_widget(widgets::header(view), header_area);
    plots::heatmap(f, heatmap_area, network, source);

    let panels = layout::samples(samples_area, SAMPLE_PANELS.len());
    for (panel, index) in panels.into_iter().zip(SAMPLE_PANELS) {
        plots::sample(f, panel, network, source, index);
    }

    f.render_widget(widgets::logs(view), logs_area);
}
