use std::sync::Arc;

use datagen::{GeneratorConfig, envelope_signal, generator::grid_point};
use machine_learning::{arch::Network, dataset::Dataset, inference::Normalization};
use ndarray::ArrayView1;
use ratatui::{
    layout::Rect,
    style::Style,
    symbols::Marker,
    text::Span,
    widgets::{
        self,
        canvas::{Canvas, Points},
        Axis, Block, Borders, Chart, GraphType,
    },
    Frame,
};

use super::theme::Theme;

/// Cells per side of the heatmap grid.
const HEATMAP_RES: usize = 40;

/// Distinct colours of the heatmap ramp.
const HEAT_LEVELS: usize = 16;

/// The amplitude pairs plotted on the sample panels.
pub const SAMPLE_PANELS: [usize; 3] = [1, 2, 3];

/// What the plots are drawn from besides the network.
pub struct PlotSource {
    dataset: Arc<Dataset>,
    config: GeneratorConfig,
}

impl PlotSource {
    pub fn new(dataset: Arc<Dataset>, config: GeneratorConfig) -> Self {
        Self { dataset, config }
    }
}

fn panel(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Theme::border())
        .title(Span::styled(title, Theme::title()))
}

/// Draws the predicted horizon over the normalized `(A, B)` plane.
pub fn heatmap(f: &mut Frame, area: Rect, network: &Network, source: &PlotSource) {
    let horizon = source.config.horizon_scale();
    let x_max = source.config.x_max;

    let mut buckets = vec![Vec::new(); HEAT_LEVELS];
    for i in 0..HEATMAP_RES {
        for j in 0..HEATMAP_RES {
            let a = -1. + 2. * i as f32 / (HEATMAP_RES - 1) as f32;
            let b = -1. + 2. * j as f32 / (HEATMAP_RES - 1) as f32;

            let input = grid_point(a, b);
            let Ok(forward) = network.forward(ArrayView1::from(&input[..])) else {
                continue;
            };

            let t = horizon.denormalize(forward.output[0]) / x_max;
            let level = (t.clamp(0., 1.) * (HEAT_LEVELS - 1) as f32).round() as usize;
            buckets[level.min(HEAT_LEVELS - 1)].push((a as f64, b as f64));
        }
    }

    let canvas = Canvas::default()
        .block(panel(format!("Predicted horizon over A, B  [0, {x_max:.2}]")))
        .background_color(Theme::BG)
        .marker(Marker::Block)
        .x_bounds([-1., 1.])
        .y_bounds([-1., 1.])
        .paint(|ctx| {
            for (level, coords) in buckets.iter().enumerate() {
                if coords.is_empty() {
                    continue;
                }

                ctx.draw(&Points {
                    coords: coords.as_slice(),
                    color: Theme::heat(level as f32 / (HEAT_LEVELS - 1) as f32),
                });
            }
        });

    f.render_widget(canvas, area);
}

/// Draws the `index`-th oscillation of the training set with its target and predicted
/// horizons on the zero line.
pub fn sample(f: &mut Frame, area: Rect, network: &Network, source: &PlotSource, index: usize) {
    let config = &source.config;
    let block = config.samples_per_pair();
    let start = (index * block).min(source.dataset.len());
    let end = (start + block).min(source.dataset.len());

    if start == end {
        f.render_widget(panel(format!("Sample {index}: empty")), area);
        return;
    }

    let (x, y) = source.dataset.slice(start..end);
    let horizon = config.horizon_scale();
    let amplitude = config.amplitude_scale();

    let signal = x
        .rows()
        .into_iter()
        .enumerate()
        .map(|(i, row)| (i as f64 * config.step as f64, envelope_signal(row) as f64))
        .collect::<Vec<_>>();

    let predicted = x
        .rows()
        .into_iter()
        .filter_map(|row| network.forward(row).ok())
        .map(|forward| (horizon.denormalize(forward.output[0]) as f64, 0.))
        .collect::<Vec<_>>();

    let target = [(horizon.denormalize(y[0]) as f64, 0.)];

    let datasets = vec![
        widgets::Dataset::default()
            .name("signal")
            .marker(Marker::Braille)
            .graph_type(GraphType::Line)
            .style(Style::default().fg(Theme::FG_NEON))
            .data(&signal),
        widgets::Dataset::default()
            .name("predicted")
            .marker(Marker::Dot)
            .style(Style::default().fg(Theme::ACCENT_CYAN))
            .data(&predicted),
        widgets::Dataset::default()
            .name("target")
            .marker(Marker::Block)
            .style(Style::default().fg(Theme::ACCENT_RED))
            .data(&target),
    ];

    let x_max = config.x_max as f64;
    let title = format!(
        "Sample {index}: A={:.0} B={:.0} horizon={:.2}",
        amplitude.denormalize(x[[0, 0]]),
        amplitude.denormalize(x[[0, 2]]),
        target[0].0,
    );

    let chart = Chart::new(datasets)
        .block(panel(title))
        .style(Theme::base())
        .x_axis(
            Axis::default()
                .style(Theme::dim())
                .bounds([0., x_max])
                .labels(vec![
                    Span::raw("0"),
                    Span::raw(format!("{:.2}", x_max / 2.)),
                    Span::raw(format!("{x_max:.2}")),
                ]),
        )
        .y_axis(
            Axis::default()
                .style(Theme::dim())
                .bounds([-1.5, 1.5])
                .labels(vec![Span::raw("-1.5"), Span::raw("0"), Span::raw("1.5")]),
        );

    f.render_widget(chart, area);
}
