use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::model::{Attribute, Dataset, Record, Species};

// ---------------------------------------------------------------------------
// Filter state: the current value of every sidebar control
// ---------------------------------------------------------------------------

/// Names of the sidebar controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Control {
    SelectedAttribute,
    PlotlyBinCount,
    SeabornBinSlider,
    SelectedSpeciesList,
}

impl Control {
    pub fn name(self) -> &'static str {
        match self {
            Control::SelectedAttribute => "selected_attribute",
            Control::PlotlyBinCount => "plotly_bin_count",
            Control::SeabornBinSlider => "seaborn_bin_slider",
            Control::SelectedSpeciesList => "selected_species_list",
        }
    }
}

/// Current control values. Range checks belong to the widgets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterState {
    pub selected_attribute: Attribute,
    pub plotly_bin_count: u32,
    pub seaborn_bin_slider: u32,
    pub selected_species_list: BTreeSet<Species>,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            selected_attribute: Attribute::BillLength,
            plotly_bin_count: 30,
            seaborn_bin_slider: 10,
            selected_species_list: BTreeSet::from([Species::Adelie]),
        }
    }
}

impl FilterState {
    /// Display form of a control's current value.
    pub fn value_of(&self, control: Control) -> String {
        match control {
            Control::SelectedAttribute => self.selected_attribute.to_string(),
            Control::PlotlyBinCount => self.plotly_bin_count.to_string(),
            Control::SeabornBinSlider => self.seaborn_bin_slider.to_string(),
            Control::SelectedSpeciesList => self
                .selected_species_list
                .iter()
                .map(|sp| sp.name())
                .collect::<Vec<_>>()
                .join(", "),
        }
    }
}

// ---------------------------------------------------------------------------
// Filter mode: whether the species checkboxes subset the view
// ---------------------------------------------------------------------------

/// How `filtered_data` treats the species selection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMode {
    /// Identity view; the species checkboxes are display-only.
    #[default]
    PassThrough,
    /// Keep only records whose species is selected. No selection shows nothing.
    BySpecies,
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterMode::PassThrough => f.write_str("all records"),
            FilterMode::BySpecies => f.write_str("filter by species"),
        }
    }
}

// ---------------------------------------------------------------------------
// Filtered view
// ---------------------------------------------------------------------------

/// Read-only projection of the dataset: the visible record indices, in
/// dataset order.
#[derive(Debug, Clone, PartialEq)]
pub struct FilteredView {
    dataset: Arc<Dataset>,
    indices: Vec<usize>,
}

impl FilteredView {
    /// View over every record.
    pub fn all(dataset: Arc<Dataset>) -> Self {
        let indices = (0..dataset.len()).collect();
        FilteredView { dataset, indices }
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Visible records in dataset order.
    pub fn records(&self) -> impl Iterator<Item = &Record> + '_ {
        self.indices.iter().map(|&i| &self.dataset.records[i])
    }
}

/// Derive the visible view from the dataset and the current controls.
///
/// Pure: the result depends only on the arguments. In
/// [`FilterMode::PassThrough`] the filters are not consulted at all.
pub fn filtered_data(dataset: &Arc<Dataset>, filters: &FilterState, mode: FilterMode) -> FilteredView {
    match mode {
        FilterMode::PassThrough => FilteredView::all(Arc::clone(dataset)),
        FilterMode::BySpecies => {
            let selected = &filters.selected_species_list;
            let indices = dataset
                .records
                .iter()
                .enumerate()
                .filter(|(_, r)| selected.contains(&r.species))
                .map(|(i, _)| i)
                .collect();
            FilteredView {
                dataset: Arc::clone(dataset),
                indices,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::record;

    fn sample() -> Arc<Dataset> {
        Arc::new(Dataset::new(vec![
            record(Species::Adelie, 3750.0, 39.1),
            record(Species::Gentoo, 4500.0, 46.1),
            record(Species::Chinstrap, 3500.0, 46.5),
            record(Species::Adelie, 3800.0, 39.5),
        ]))
    }

    #[test]
    fn pass_through_ignores_species_selection() {
        let ds = sample();
        let mut filters = FilterState::default();
        filters.selected_species_list.clear();

        let view = filtered_data(&ds, &filters, FilterMode::PassThrough);
        assert_eq!(view.len(), ds.len());
        assert_eq!(view.indices(), &[0, 1, 2, 3]);
    }

    #[test]
    fn same_inputs_give_equal_views() {
        let ds = sample();
        let filters = FilterState::default();
        for mode in [FilterMode::PassThrough, FilterMode::BySpecies] {
            assert_eq!(
                filtered_data(&ds, &filters, mode),
                filtered_data(&ds, &filters, mode)
            );
        }
    }

    #[test]
    fn by_species_keeps_selected_in_dataset_order() {
        let ds = sample();
        let filters = FilterState {
            selected_species_list: BTreeSet::from([Species::Chinstrap, Species::Adelie]),
            ..FilterState::default()
        };

        let view = filtered_data(&ds, &filters, FilterMode::BySpecies);
        assert_eq!(view.indices(), &[0, 2, 3]);
        let species: Vec<_> = view.records().map(|r| r.species).collect();
        assert_eq!(species, vec![Species::Adelie, Species::Chinstrap, Species::Adelie]);
    }

    #[test]
    fn by_species_with_empty_selection_shows_nothing() {
        let ds = sample();
        let filters = FilterState {
            selected_species_list: BTreeSet::new(),
            ..FilterState::default()
        };
        let view = filtered_data(&ds, &filters, FilterMode::BySpecies);
        assert!(view.is_empty());
        assert_eq!(view.records().count(), 0);
    }

    #[test]
    fn empty_dataset_is_not_an_error() {
        let ds = Arc::new(Dataset::default());
        for mode in [FilterMode::PassThrough, FilterMode::BySpecies] {
            assert!(filtered_data(&ds, &FilterState::default(), mode).is_empty());
        }
    }

    #[test]
    fn defaults_match_sidebar() {
        let f = FilterState::default();
        assert_eq!(f.value_of(Control::SelectedAttribute), "bill_length_mm");
        assert_eq!(f.value_of(Control::PlotlyBinCount), "30");
        assert_eq!(f.value_of(Control::SeabornBinSlider), "10");
        assert_eq!(f.value_of(Control::SelectedSpeciesList), "Adelie");
    }
}
