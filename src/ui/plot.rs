use eframe::egui::{RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Plot, Points};

use crate::artifact::{BinnedHistogramSpec, HistogramSpec, Rendered, ScatterSpec};
use crate::color::SpeciesPalette;
use crate::data::model::Species;

fn warning_label<T>(ui: &mut Ui, rendered: &Rendered<T>) {
    if let Some(warning) = &rendered.warning {
        ui.label(RichText::new(warning.to_string()).weak());
    }
}

// ---------------------------------------------------------------------------
// Species histogram
// ---------------------------------------------------------------------------

/// One bar per species, labelled on the x axis.
pub fn species_histogram(ui: &mut Ui, hist: &Rendered<HistogramSpec>) {
    warning_label(ui, hist);
    let spec = &hist.artifact;
    let labels: Vec<String> = spec.bars.iter().map(|b| b.species.to_string()).collect();

    Plot::new("species_histogram")
        .legend(Legend::default())
        .x_axis_label(spec.x_field)
        .y_axis_label("count")
        .x_axis_formatter(move |mark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() > f64::EPSILON || idx < 0.0 {
                return String::new();
            }
            labels.get(idx as usize).cloned().unwrap_or_default()
        })
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, bar) in spec.bars.iter().enumerate() {
                let chart = BarChart::new(vec![Bar::new(i as f64, bar.count as f64)
                    .width(0.7)
                    .name(bar.species.name())])
                .name(bar.species.name())
                .color(bar.color);
                plot_ui.bar_chart(chart);
            }
        });
}

// ---------------------------------------------------------------------------
// Scatterplot
// ---------------------------------------------------------------------------

/// Body mass vs bill length, one point series per species.
pub fn scatter_plot(ui: &mut Ui, scatter: &Rendered<ScatterSpec>) {
    warning_label(ui, scatter);
    let spec = &scatter.artifact;
    if spec.skipped > 0 {
        ui.label(
            RichText::new(format!(
                "{} points, {} records without measurements omitted",
                spec.point_count(),
                spec.skipped
            ))
            .weak(),
        );
    }

    Plot::new("scatter_plot")
        .legend(Legend::default())
        .x_axis_label(spec.x_field.column())
        .y_axis_label(spec.y_field.column())
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &spec.series {
                let points = Points::new(series.points.clone())
                    .name(series.species.name())
                    .color(series.color)
                    .shape(series.marker)
                    .filled(true)
                    .radius(3.5);
                plot_ui.points(points);
            }
        });
}

// ---------------------------------------------------------------------------
// Binned attribute histogram
// ---------------------------------------------------------------------------

/// Stacked per-species bars over equal-width bins.
pub fn attribute_histogram(
    ui: &mut Ui,
    id: &str,
    hist: &Rendered<BinnedHistogramSpec>,
    palette: &SpeciesPalette,
) {
    warning_label(ui, hist);
    let spec = &hist.artifact;
    if spec.missing > 0 {
        ui.label(
            RichText::new(format!("{} records with {} = NA omitted", spec.missing, spec.attribute))
                .weak(),
        );
    }

    let charts: Vec<BarChart> = Species::ALL
        .into_iter()
        .map(|species| {
            let bars = spec
                .bins
                .iter()
                .map(|bin| {
                    Bar::new(bin.center(), bin.count(species) as f64)
                        .width(bin.width())
                        .name(format!("{:.1}..{:.1} ({} total)", bin.start, bin.end, bin.total()))
                })
                .collect();
            BarChart::new(bars)
                .name(species.name())
                .color(palette.color_for(species))
        })
        .collect();

    // Stack each species on top of the ones before it.
    let mut stacked: Vec<BarChart> = Vec::with_capacity(charts.len());
    for chart in charts {
        let below: Vec<&BarChart> = stacked.iter().collect();
        let chart = chart.stack_on(&below);
        stacked.push(chart);
    }

    Plot::new(id)
        .legend(Legend::default())
        .x_axis_label(spec.attribute.column())
        .y_axis_label("count")
        .show(ui, |plot_ui| {
            for chart in stacked {
                plot_ui.bar_chart(chart);
            }
        });
}
