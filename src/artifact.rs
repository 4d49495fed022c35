use eframe::egui::Color32;
use egui_plot::MarkerShape;

use crate::color::SpeciesPalette;
use crate::data::filter::FilteredView;
use crate::data::model::{Attribute, Record, Species};
use crate::error::{ArtifactKind, EmptyViewWarning};

// ---------------------------------------------------------------------------
// Rendered<T> – an artifact plus an optional non-fatal warning
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Rendered<T> {
    pub artifact: T,
    pub warning: Option<EmptyViewWarning>,
}

fn rendered<T>(kind: ArtifactKind, view: &FilteredView, artifact: T) -> Rendered<T> {
    let warning = view.is_empty().then(|| {
        let w = EmptyViewWarning { artifact: kind };
        log::warn!("{w}");
        w
    });
    Rendered { artifact, warning }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// Column headers plus one row of display strings per record.
#[derive(Debug, Clone, PartialEq)]
pub struct TableArtifact {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Dataset position of each row.
    pub row_ids: Vec<usize>,
}

fn cell(value: Option<f64>) -> String {
    value.map_or_else(|| "NA".to_string(), |v| v.to_string())
}

fn table_row(r: &Record) -> Vec<String> {
    vec![
        r.species.to_string(),
        r.island.clone(),
        cell(r.bill_length_mm),
        cell(r.bill_depth_mm),
        cell(r.flipper_length_mm),
        cell(r.body_mass_g),
        r.sex.clone().unwrap_or_else(|| "NA".to_string()),
        r.year.map_or_else(|| "NA".to_string(), |y| y.to_string()),
    ]
}

fn table_artifact(view: &FilteredView) -> TableArtifact {
    TableArtifact {
        columns: Record::COLUMNS.iter().map(|c| c.to_string()).collect(),
        rows: view.records().map(table_row).collect(),
        row_ids: view.indices().to_vec(),
    }
}

/// Row-for-row projection of the view, in dataset order.
pub fn table_view(view: &FilteredView) -> Rendered<TableArtifact> {
    rendered(ArtifactKind::Table, view, table_artifact(view))
}

/// Same contract as [`table_view`]; rendered as a plain grid.
pub fn grid_view(view: &FilteredView) -> Rendered<TableArtifact> {
    rendered(ArtifactKind::Grid, view, table_artifact(view))
}

// ---------------------------------------------------------------------------
// Species histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct CategoryBar {
    pub species: Species,
    pub count: usize,
    pub color: Color32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSpec {
    pub x_field: &'static str,
    /// One bar per species present, in order of first appearance.
    pub bars: Vec<CategoryBar>,
}

impl HistogramSpec {
    pub fn count(&self, species: Species) -> usize {
        self.bars
            .iter()
            .find(|b| b.species == species)
            .map_or(0, |b| b.count)
    }
}

/// Record count per species.
pub fn species_histogram(view: &FilteredView, palette: &SpeciesPalette) -> Rendered<HistogramSpec> {
    let mut bars: Vec<CategoryBar> = Vec::new();
    for r in view.records() {
        match bars.iter_mut().find(|b| b.species == r.species) {
            Some(bar) => bar.count += 1,
            None => bars.push(CategoryBar {
                species: r.species,
                count: 1,
                color: palette.color_for(r.species),
            }),
        }
    }
    rendered(
        ArtifactKind::SpeciesHistogram,
        view,
        HistogramSpec {
            x_field: "species",
            bars,
        },
    )
}

// ---------------------------------------------------------------------------
// Scatterplot
// ---------------------------------------------------------------------------

/// Marker shape for a species.
pub fn marker_for(species: Species) -> MarkerShape {
    match species {
        Species::Adelie => MarkerShape::Circle,
        Species::Gentoo => MarkerShape::Diamond,
        Species::Chinstrap => MarkerShape::Square,
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSeries {
    pub species: Species,
    pub color: Color32,
    pub marker: MarkerShape,
    /// `[body_mass_g, bill_length_mm]`
    pub points: Vec<[f64; 2]>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ScatterSpec {
    pub title: &'static str,
    pub x_field: Attribute,
    pub y_field: Attribute,
    /// One series per species present, in order of first appearance.
    pub series: Vec<ScatterSeries>,
    /// Records left out because a coordinate is `NA`.
    pub skipped: usize,
}

impl ScatterSpec {
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}

/// Body mass against bill length, coloured and shaped by species.
pub fn scatter(view: &FilteredView, palette: &SpeciesPalette) -> Rendered<ScatterSpec> {
    let x_field = Attribute::BodyMass;
    let y_field = Attribute::BillLength;

    let mut series: Vec<ScatterSeries> = Vec::new();
    let mut skipped = 0;

    for r in view.records() {
        let (Some(x), Some(y)) = (x_field.value(r), y_field.value(r)) else {
            skipped += 1;
            continue;
        };
        match series.iter_mut().find(|s| s.species == r.species) {
            Some(s) => s.points.push([x, y]),
            None => series.push(ScatterSeries {
                species: r.species,
                color: palette.color_for(r.species),
                marker: marker_for(r.species),
                points: vec![[x, y]],
            }),
        }
    }

    rendered(
        ArtifactKind::Scatter,
        view,
        ScatterSpec {
            title: "All Species ScatterPlot",
            x_field,
            y_field,
            series,
            skipped,
        },
    )
}

// ---------------------------------------------------------------------------
// Binned attribute histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    /// Count per species, indexed by [`Species::index`].
    pub counts: [usize; 3],
}

impl HistogramBin {
    pub fn count(&self, species: Species) -> usize {
        self.counts[species.index()]
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }

    pub fn center(&self) -> f64 {
        (self.start + self.end) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.end - self.start
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinnedHistogramSpec {
    pub attribute: Attribute,
    pub bin_count: usize,
    pub bins: Vec<HistogramBin>,
    /// Records whose attribute is `NA`.
    pub missing: usize,
}

/// Equal-width bins over the observed range of `attribute`, counted per
/// species. The last bin is closed on the right; a zero bin count counts as
/// one. Non-finite values are counted as missing.
pub fn attribute_histogram(
    view: &FilteredView,
    attribute: Attribute,
    bin_count: u32,
) -> Rendered<BinnedHistogramSpec> {
    let bin_count = bin_count.max(1) as usize;

    let mut values: Vec<(f64, Species)> = Vec::with_capacity(view.len());
    let mut missing = 0;
    for r in view.records() {
        match attribute.value(r) {
            Some(v) if v.is_finite() => values.push((v, r.species)),
            _ => missing += 1,
        }
    }

    let mut bins = Vec::new();
    if !values.is_empty() {
        let min = values.iter().map(|(v, _)| *v).fold(f64::INFINITY, f64::min);
        let max = values.iter().map(|(v, _)| *v).fold(f64::NEG_INFINITY, f64::max);
        let width = if max > min { (max - min) / bin_count as f64 } else { 1.0 };

        bins = (0..bin_count)
            .map(|i| HistogramBin {
                start: min + i as f64 * width,
                end: min + (i + 1) as f64 * width,
                counts: [0; 3],
            })
            .collect();

        for (v, species) in values {
            let idx = (((v - min) / width) as usize).min(bin_count - 1);
            bins[idx].counts[species.index()] += 1;
        }
    }

    rendered(
        ArtifactKind::AttributeHistogram,
        view,
        BinnedHistogramSpec {
            attribute,
            bin_count,
            bins,
            missing,
        },
    )
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::data::filter::{FilterMode, FilterState, filtered_data};
    use crate::data::model::tests::record;
    use crate::data::model::Dataset;

    fn view_of(records: Vec<Record>) -> FilteredView {
        FilteredView::all(Arc::new(Dataset::new(records)))
    }

    #[test]
    fn histogram_counts_by_species() {
        let view = view_of(vec![
            record(Species::Adelie, 3750.0, 39.1),
            record(Species::Gentoo, 4500.0, 46.1),
            record(Species::Adelie, 3800.0, 39.5),
        ]);
        let hist = species_histogram(&view, &SpeciesPalette::default());
        assert!(hist.warning.is_none());
        let spec = hist.artifact;
        assert_eq!(spec.x_field, "species");
        assert_eq!(spec.count(Species::Adelie), 2);
        assert_eq!(spec.count(Species::Gentoo), 1);
        assert_eq!(spec.count(Species::Chinstrap), 0);
        let order: Vec<_> = spec.bars.iter().map(|b| b.species).collect();
        assert_eq!(order, vec![Species::Adelie, Species::Gentoo]);
    }

    #[test]
    fn empty_view_gives_empty_table_and_warning() {
        let view = view_of(Vec::new());
        let table = table_view(&view);
        assert!(table.artifact.rows.is_empty());
        assert_eq!(table.artifact.columns.len(), 8);
        assert_eq!(
            table.warning,
            Some(EmptyViewWarning { artifact: ArtifactKind::Table })
        );

        let palette = SpeciesPalette::default();
        assert!(species_histogram(&view, &palette).artifact.bars.is_empty());
        assert_eq!(scatter(&view, &palette).artifact.point_count(), 0);
        let binned = attribute_histogram(&view, Attribute::BodyMass, 10);
        assert!(binned.artifact.bins.is_empty());
        assert!(binned.warning.is_some());
    }

    #[test]
    fn scatter_maps_mass_and_bill_length() {
        let view = view_of(vec![record(Species::Adelie, 3750.0, 39.1)]);
        let palette = SpeciesPalette::default();
        let spec = scatter(&view, &palette).artifact;

        assert_eq!(spec.title, "All Species ScatterPlot");
        assert_eq!(spec.x_field, Attribute::BodyMass);
        assert_eq!(spec.y_field, Attribute::BillLength);
        assert_eq!(spec.series.len(), 1);
        let series = &spec.series[0];
        assert_eq!(series.species, Species::Adelie);
        assert_eq!(series.points, vec![[3750.0, 39.1]]);
        assert_eq!(series.color, palette.color_for(Species::Adelie));
        assert_eq!(series.marker, marker_for(Species::Adelie));
    }

    #[test]
    fn scatter_skips_missing_coordinates() {
        let mut gap = record(Species::Gentoo, 5000.0, 47.0);
        gap.body_mass_g = None;
        let view = view_of(vec![gap, record(Species::Chinstrap, 3500.0, 46.5)]);
        let spec = scatter(&view, &SpeciesPalette::default()).artifact;
        assert_eq!(spec.skipped, 1);
        assert_eq!(spec.point_count(), 1);
        assert_eq!(spec.series[0].marker, MarkerShape::Square);
    }

    #[test]
    fn table_rows_follow_dataset_order_and_render_na() {
        let mut second = record(Species::Gentoo, 4500.0, 46.1);
        second.sex = None;
        second.bill_depth_mm = None;
        let view = view_of(vec![record(Species::Adelie, 3750.0, 39.1), second]);

        let first = table_view(&view);
        assert_eq!(first, table_view(&view));

        let rows = first.artifact.rows;
        assert_eq!(
            rows[0],
            vec!["Adelie", "Torgersen", "39.1", "18", "190", "3750", "female", "2007"]
        );
        assert_eq!(rows[1][0], "Gentoo");
        assert_eq!(rows[1][3], "NA");
        assert_eq!(rows[1][6], "NA");
        assert_eq!(grid_view(&view).artifact.rows, rows);
        assert_eq!(first.artifact.row_ids, vec![0, 1]);
    }

    #[test]
    fn table_rows_keep_their_dataset_position() {
        let ds = Arc::new(Dataset::new(vec![
            record(Species::Adelie, 3750.0, 39.1),
            record(Species::Gentoo, 4500.0, 46.1),
            record(Species::Chinstrap, 3500.0, 46.5),
            record(Species::Gentoo, 5000.0, 47.0),
        ]));
        let filters = FilterState {
            selected_species_list: [Species::Gentoo].into(),
            ..FilterState::default()
        };
        let view = filtered_data(&ds, &filters, FilterMode::BySpecies);
        let grid = grid_view(&view).artifact;
        assert_eq!(grid.row_ids, vec![1, 3]);
        assert_eq!(grid.rows.len(), grid.row_ids.len());
        assert_eq!(grid.rows[1][5], "5000");
    }

    #[test]
    fn binned_histogram_spreads_values_and_closes_last_bin() {
        let view = view_of(vec![
            record(Species::Adelie, 3000.0, 39.1),
            record(Species::Adelie, 3500.0, 39.1),
            record(Species::Gentoo, 4000.0, 46.1),
            record(Species::Gentoo, 5000.0, 46.1),
        ]);
        let spec = attribute_histogram(&view, Attribute::BodyMass, 4).artifact;
        assert_eq!(spec.bins.len(), 4);
        assert_eq!(spec.bins[0].start, 3000.0);
        assert_eq!(spec.bins[3].end, 5000.0);
        assert_eq!(spec.bins[0].count(Species::Adelie), 1);
        assert_eq!(spec.bins[1].count(Species::Adelie), 1);
        assert_eq!(spec.bins[2].count(Species::Gentoo), 1);
        assert_eq!(spec.bins[3].count(Species::Gentoo), 1);
        let total: usize = spec.bins.iter().map(HistogramBin::total).sum();
        assert_eq!(total, 4);
        assert_eq!(spec.missing, 0);
    }

    #[test]
    fn binned_histogram_degenerate_range_and_zero_bins() {
        let mut na = record(Species::Chinstrap, 3500.0, 46.5);
        na.flipper_length_mm = None;
        let view = view_of(vec![
            record(Species::Adelie, 3000.0, 39.1),
            record(Species::Gentoo, 4000.0, 46.1),
            na,
        ]);
        // Every flipper length is 190.0 in the helper record.
        let spec = attribute_histogram(&view, Attribute::FlipperLength, 0).artifact;
        assert_eq!(spec.bin_count, 1);
        assert_eq!(spec.bins.len(), 1);
        assert_eq!(spec.bins[0].total(), 2);
        assert_eq!(spec.missing, 1);
    }

    #[test]
    fn binned_histogram_counts_infinite_values_as_missing() {
        let mut huge = record(Species::Gentoo, f64::INFINITY, 46.1);
        huge.bill_depth_mm = Some(f64::NEG_INFINITY);
        let view = view_of(vec![
            record(Species::Adelie, 3000.0, 39.1),
            record(Species::Adelie, 4000.0, 39.1),
            huge,
        ]);
        let spec = attribute_histogram(&view, Attribute::BodyMass, 2).artifact;
        assert_eq!(spec.missing, 1);
        assert_eq!(spec.bins[0].start, 3000.0);
        assert_eq!(spec.bins[1].end, 4000.0);
        assert_eq!(spec.bins[0].count(Species::Adelie), 1);
        assert_eq!(spec.bins[1].count(Species::Adelie), 1);
        assert!(spec.bins.iter().all(|b| b.count(Species::Gentoo) == 0));
    }

    #[test]
    fn pass_through_view_with_no_species_still_charts_everything() {
        let ds = Arc::new(Dataset::new(vec![
            record(Species::Adelie, 3750.0, 39.1),
            record(Species::Chinstrap, 3500.0, 46.5),
        ]));
        let filters = FilterState {
            selected_species_list: Default::default(),
            ..FilterState::default()
        };
        let view = filtered_data(&ds, &filters, FilterMode::PassThrough);
        let hist = species_histogram(&view, &SpeciesPalette::default()).artifact;
        assert_eq!(hist.count(Species::Adelie), 1);
        assert_eq!(hist.count(Species::Chinstrap), 1);
    }
}
