use std::collections::BTreeSet;
use std::sync::Arc;

use crate::artifact::{
    self, BinnedHistogramSpec, HistogramSpec, Rendered, ScatterSpec, TableArtifact,
};
use crate::color::SpeciesPalette;
use crate::data::filter::{Control, FilterMode, FilterState, FilteredView, filtered_data};
use crate::data::model::{Attribute, Dataset, Species};
use crate::reactive::{Dep, DependencyGraph, Memo, Node, Source};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The application context: the loaded dataset, the control values and the
/// memoized pipeline derived from them. Created once at startup, lives until
/// the process exits.
pub struct DashboardState {
    dataset: Arc<Dataset>,
    filters: FilterState,
    mode: FilterMode,
    palette: SpeciesPalette,

    graph: DependencyGraph,
    filtered: Memo<Arc<FilteredView>>,
    table: Memo<Arc<Rendered<TableArtifact>>>,
    grid: Memo<Arc<Rendered<TableArtifact>>>,
    species_hist: Memo<Arc<Rendered<HistogramSpec>>>,
    scatter: Memo<Arc<Rendered<ScatterSpec>>>,
    plotly_hist: Memo<Arc<Rendered<BinnedHistogramSpec>>>,
    seaborn_hist: Memo<Arc<Rendered<BinnedHistogramSpec>>>,
}

impl DashboardState {
    pub fn new(dataset: Dataset, filters: FilterState, mode: FilterMode) -> Self {
        let mut graph = DependencyGraph::new();
        let view = Dep::Node(Node::FilteredData);
        graph.register(Node::FilteredData, filter_reads(mode));
        graph.register(Node::Table, [view]);
        graph.register(Node::Grid, [view]);
        graph.register(Node::SpeciesHistogram, [view]);
        graph.register(Node::Scatter, [view]);
        graph.register(
            Node::PlotlyHistogram,
            [
                view,
                Dep::Source(Source::SelectedAttribute),
                Dep::Source(Source::PlotlyBinCount),
            ],
        );
        graph.register(
            Node::SeabornHistogram,
            [
                view,
                Dep::Source(Source::SelectedAttribute),
                Dep::Source(Source::SeabornBinCount),
            ],
        );

        Self {
            dataset: Arc::new(dataset),
            filters,
            mode,
            palette: SpeciesPalette::default(),
            graph,
            filtered: Memo::default(),
            table: Memo::default(),
            grid: Memo::default(),
            species_hist: Memo::default(),
            scatter: Memo::default(),
            plotly_hist: Memo::default(),
            seaborn_hist: Memo::default(),
        }
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn palette(&self) -> &SpeciesPalette {
        &self.palette
    }

    /// Which species-filter policy is active.
    pub fn filter_mode(&self) -> FilterMode {
        self.mode
    }

    /// How many times `node` has been computed.
    pub fn computations(&self, node: Node) -> usize {
        match node {
            Node::FilteredData => self.filtered.computations(),
            Node::Table => self.table.computations(),
            Node::Grid => self.grid.computations(),
            Node::SpeciesHistogram => self.species_hist.computations(),
            Node::Scatter => self.scatter.computations(),
            Node::PlotlyHistogram => self.plotly_hist.computations(),
            Node::SeabornHistogram => self.seaborn_hist.computations(),
        }
    }

    /// Whether `node` will recompute the next time it is read.
    pub fn is_stale(&self, node: Node) -> bool {
        self.graph.is_dirty(node)
    }

    /// The current read-set of `node`.
    pub fn node_reads(&self, node: Node) -> Vec<Dep> {
        self.graph.reads(node).collect()
    }

    /// Whether the species checkboxes currently subset the view.
    pub fn species_selection_filters(&self) -> bool {
        self.graph
            .depends_on(Node::FilteredData, Dep::Source(Source::SelectedSpecies))
    }

    // -- Setters (UI events) --

    pub fn set_filter_mode(&mut self, mode: FilterMode) {
        if self.mode == mode {
            return;
        }
        log::info!("Filter mode: {mode}");
        self.mode = mode;
        self.graph.register(Node::FilteredData, filter_reads(mode));
    }

    pub fn set_selected_attribute(&mut self, attribute: Attribute) {
        if self.filters.selected_attribute != attribute {
            self.filters.selected_attribute = attribute;
            self.control_changed(Control::SelectedAttribute);
        }
    }

    pub fn set_plotly_bin_count(&mut self, bins: u32) {
        if self.filters.plotly_bin_count != bins {
            self.filters.plotly_bin_count = bins;
            self.control_changed(Control::PlotlyBinCount);
        }
    }

    pub fn set_seaborn_bin_slider(&mut self, bins: u32) {
        if self.filters.seaborn_bin_slider != bins {
            self.filters.seaborn_bin_slider = bins;
            self.control_changed(Control::SeabornBinSlider);
        }
    }

    pub fn set_selected_species(&mut self, species: BTreeSet<Species>) {
        if self.filters.selected_species_list != species {
            self.filters.selected_species_list = species;
            self.control_changed(Control::SelectedSpeciesList);
        }
    }

    /// Toggle a single species checkbox.
    pub fn toggle_species(&mut self, species: Species) {
        let mut selected = self.filters.selected_species_list.clone();
        if !selected.remove(&species) {
            selected.insert(species);
        }
        self.set_selected_species(selected);
    }

    pub fn select_all_species(&mut self) {
        self.set_selected_species(Species::ALL.into_iter().collect());
    }

    pub fn select_no_species(&mut self) {
        self.set_selected_species(BTreeSet::new());
    }

    fn control_changed(&mut self, control: Control) {
        log::debug!("{} = {}", control.name(), self.filters.value_of(control));
        self.graph.notify(source_for(control));
    }

    // -- Memoized pipeline --

    /// The current view, recomputed only when something it reads changed.
    pub fn filtered_data(&mut self) -> Arc<FilteredView> {
        let (dataset, filters, mode) = (&self.dataset, &self.filters, self.mode);
        self.filtered
            .get_or_compute(&mut self.graph, Node::FilteredData, || {
                Arc::new(filtered_data(dataset, filters, mode))
            })
    }

    pub fn table_view(&mut self) -> Arc<Rendered<TableArtifact>> {
        let view = self.filtered_data();
        self.table
            .get_or_compute(&mut self.graph, Node::Table, || Arc::new(artifact::table_view(&view)))
    }

    pub fn grid_view(&mut self) -> Arc<Rendered<TableArtifact>> {
        let view = self.filtered_data();
        self.grid
            .get_or_compute(&mut self.graph, Node::Grid, || Arc::new(artifact::grid_view(&view)))
    }

    pub fn species_histogram(&mut self) -> Arc<Rendered<HistogramSpec>> {
        let view = self.filtered_data();
        let palette = &self.palette;
        self.species_hist
            .get_or_compute(&mut self.graph, Node::SpeciesHistogram, || {
                Arc::new(artifact::species_histogram(&view, palette))
            })
    }

    pub fn scatter(&mut self) -> Arc<Rendered<ScatterSpec>> {
        let view = self.filtered_data();
        let palette = &self.palette;
        self.scatter
            .get_or_compute(&mut self.graph, Node::Scatter, || {
                Arc::new(artifact::scatter(&view, palette))
            })
    }

    /// Histogram of the selected attribute using the numeric bin input.
    pub fn plotly_histogram(&mut self) -> Arc<Rendered<BinnedHistogramSpec>> {
        let view = self.filtered_data();
        let (attribute, bins) = (self.filters.selected_attribute, self.filters.plotly_bin_count);
        self.plotly_hist
            .get_or_compute(&mut self.graph, Node::PlotlyHistogram, || {
                Arc::new(artifact::attribute_histogram(&view, attribute, bins))
            })
    }

    /// Histogram of the selected attribute using the bin slider.
    pub fn seaborn_histogram(&mut self) -> Arc<Rendered<BinnedHistogramSpec>> {
        let view = self.filtered_data();
        let (attribute, bins) = (self.filters.selected_attribute, self.filters.seaborn_bin_slider);
        self.seaborn_hist
            .get_or_compute(&mut self.graph, Node::SeabornHistogram, || {
                Arc::new(artifact::attribute_histogram(&view, attribute, bins))
            })
    }
}

fn source_for(control: Control) -> Source {
    match control {
        Control::SelectedAttribute => Source::SelectedAttribute,
        Control::PlotlyBinCount => Source::PlotlyBinCount,
        Control::SeabornBinSlider => Source::SeabornBinCount,
        Control::SelectedSpeciesList => Source::SelectedSpecies,
    }
}

/// Read-set of the filter node under a given policy.
fn filter_reads(mode: FilterMode) -> Vec<Dep> {
    match mode {
        FilterMode::PassThrough => vec![Dep::Source(Source::Dataset)],
        FilterMode::BySpecies => vec![
            Dep::Source(Source::Dataset),
            Dep::Source(Source::SelectedSpecies),
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    fn state(mode: FilterMode) -> DashboardState {
        let ds = Dataset::new(vec![
            record(Species::Adelie, 3750.0, 39.1),
            record(Species::Gentoo, 4500.0, 46.1),
            record(Species::Adelie, 3800.0, 39.5),
        ]);
        DashboardState::new(ds, FilterState::default(), mode)
    }

    #[test]
    fn filtered_data_is_memoized() {
        let mut s = state(FilterMode::PassThrough);
        let a = s.filtered_data();
        let b = s.filtered_data();
        assert_eq!(s.computations(Node::FilteredData), 1);
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn table_view_is_idempotent_and_cached() {
        let mut s = state(FilterMode::PassThrough);
        let first = s.table_view();
        let second = s.table_view();
        assert_eq!(first, second);
        assert_eq!(first.artifact.rows.len(), 3);
        assert_eq!(s.computations(Node::Table), 1);
    }

    #[test]
    fn pass_through_ignores_empty_species_selection() {
        let mut s = state(FilterMode::PassThrough);
        s.filtered_data();
        s.select_no_species();

        assert!(s.filters().selected_species_list.is_empty());
        assert!(!s.is_stale(Node::FilteredData));
        assert_eq!(s.filtered_data().len(), 3);
        assert_eq!(s.computations(Node::FilteredData), 1);
        assert_eq!(s.species_histogram().artifact.count(Species::Adelie), 2);
    }

    #[test]
    fn by_species_recomputes_on_selection_change() {
        let mut s = state(FilterMode::BySpecies);
        // Default selection is Adelie only.
        assert_eq!(s.filtered_data().len(), 2);

        s.toggle_species(Species::Gentoo);
        assert!(s.is_stale(Node::FilteredData));
        assert!(s.is_stale(Node::Scatter));
        assert_eq!(s.filtered_data().len(), 3);
        assert_eq!(s.computations(Node::FilteredData), 2);

        s.select_no_species();
        let table = s.table_view();
        assert!(table.artifact.rows.is_empty());
        assert!(table.warning.is_some());
    }

    #[test]
    fn unchanged_value_does_not_invalidate() {
        let mut s = state(FilterMode::BySpecies);
        s.filtered_data();
        s.set_selected_species(BTreeSet::from([Species::Adelie]));
        assert!(!s.is_stale(Node::FilteredData));
    }

    #[test]
    fn bin_controls_only_touch_their_histogram() {
        let mut s = state(FilterMode::PassThrough);
        s.table_view();
        s.plotly_histogram();
        s.seaborn_histogram();

        s.set_plotly_bin_count(5);
        assert!(s.is_stale(Node::PlotlyHistogram));
        assert!(!s.is_stale(Node::SeabornHistogram));
        assert!(!s.is_stale(Node::Table));
        assert_eq!(s.plotly_histogram().artifact.bins.len(), 5);

        s.set_seaborn_bin_slider(3);
        assert_eq!(s.seaborn_histogram().artifact.bins.len(), 3);

        s.set_selected_attribute(Attribute::BodyMass);
        assert!(s.is_stale(Node::PlotlyHistogram));
        assert!(s.is_stale(Node::SeabornHistogram));
        assert_eq!(s.plotly_histogram().artifact.attribute, Attribute::BodyMass);

        assert_eq!(s.computations(Node::Table), 1);
        assert_eq!(s.computations(Node::FilteredData), 1);
    }

    #[test]
    fn switching_mode_rewires_filter_node() {
        let mut s = state(FilterMode::PassThrough);
        assert_eq!(s.filtered_data().len(), 3);

        s.set_filter_mode(FilterMode::BySpecies);
        assert_eq!(s.filter_mode(), FilterMode::BySpecies);
        assert!(s.is_stale(Node::Table));
        assert_eq!(s.filtered_data().len(), 2);

        s.set_filter_mode(FilterMode::PassThrough);
        assert_eq!(s.filtered_data().len(), 3);
        s.select_all_species();
        assert!(!s.is_stale(Node::FilteredData));
    }

    #[test]
    fn read_sets_follow_the_filter_mode() {
        let mut s = state(FilterMode::PassThrough);
        assert!(!s.species_selection_filters());
        assert_eq!(s.node_reads(Node::FilteredData), vec![Dep::Source(Source::Dataset)]);
        assert_eq!(
            s.node_reads(Node::PlotlyHistogram),
            vec![
                Dep::Source(Source::SelectedAttribute),
                Dep::Source(Source::PlotlyBinCount),
                Dep::Node(Node::FilteredData),
            ]
        );

        s.set_filter_mode(FilterMode::BySpecies);
        assert!(s.species_selection_filters());
        assert!(s
            .node_reads(Node::FilteredData)
            .contains(&Dep::Source(Source::SelectedSpecies)));
    }

    #[test]
    fn every_node_starts_stale_and_counts_its_computations() {
        let mut s = state(FilterMode::BySpecies);
        assert!(Node::ALL.into_iter().all(|n| s.is_stale(n)));
        assert!(Node::ALL.into_iter().all(|n| s.computations(n) == 0));

        s.table_view();
        s.scatter();
        assert_eq!(s.computations(Node::FilteredData), 1);
        assert_eq!(s.computations(Node::Table), 1);
        assert_eq!(s.computations(Node::Scatter), 1);
        assert!(s.is_stale(Node::Grid));

        s.toggle_species(Species::Gentoo);
        s.table_view();
        s.scatter();
        assert_eq!(s.computations(Node::FilteredData), 2);
        assert_eq!(s.computations(Node::Table), 2);
        assert_eq!(s.computations(Node::Grid), 0);
    }
}
