use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::config::DashboardConfig;
use crate::data::filter::FilterMode;
use crate::data::model::{Attribute, Species};
use crate::reactive::{Dep, Node};
use crate::state::DashboardState;

// ---------------------------------------------------------------------------
// Left side panel – control widgets
// ---------------------------------------------------------------------------

/// Render the sidebar. Widgets edit local copies; changes are pushed through
/// the state setters so dependent nodes are notified.
pub fn side_panel(ui: &mut Ui, state: &mut DashboardState, config: &DashboardConfig) {
    ui.heading("Sidebar");
    ui.separator();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Attribute selector ----
            ui.strong("Select Plotly Attribute");
            let mut attribute = state.filters().selected_attribute;
            egui::ComboBox::from_id_salt("selected_attribute")
                .selected_text(attribute.column())
                .show_ui(ui, |ui: &mut Ui| {
                    for candidate in Attribute::ALL {
                        ui.selectable_value(&mut attribute, candidate, candidate.column());
                    }
                });
            state.set_selected_attribute(attribute);
            ui.add_space(6.0);

            // ---- Numeric bin input ----
            ui.strong("Number of plotly bins");
            let [lo, hi] = config.plotly_bin_range;
            let mut plotly_bins = state.filters().plotly_bin_count;
            if ui
                .add(egui::DragValue::new(&mut plotly_bins).range(lo..=hi))
                .changed()
            {
                state.set_plotly_bin_count(plotly_bins);
            }
            ui.add_space(6.0);

            // ---- Bin slider ----
            ui.strong("Number of Bins");
            let [lo, hi] = config.seaborn_bin_range;
            let mut seaborn_bins = state.filters().seaborn_bin_slider;
            if ui
                .add(egui::Slider::new(&mut seaborn_bins, lo..=hi))
                .changed()
            {
                state.set_seaborn_bin_slider(seaborn_bins);
            }
            ui.add_space(6.0);

            // ---- Species checkboxes ----
            let n_selected = state.filters().selected_species_list.len();
            ui.strong(format!(
                "Species in Scatterplot  ({n_selected}/{})",
                Species::ALL.len()
            ));
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    state.select_all_species();
                }
                if ui.small_button("None").clicked() {
                    state.select_no_species();
                }
            });
            ui.horizontal_wrapped(|ui: &mut Ui| {
                for species in Species::ALL {
                    let mut checked = state.filters().selected_species_list.contains(&species);
                    let text = RichText::new(species.name()).color(state.palette().color_for(species));
                    if ui.checkbox(&mut checked, text).changed() {
                        state.toggle_species(species);
                    }
                }
            });
            if !state.species_selection_filters() {
                ui.label(
                    RichText::new("Display only: the table and charts show every species.")
                        .small()
                        .weak(),
                );
            }

            ui.separator();

            ui.collapsing("Pipeline", |ui: &mut Ui| pipeline_status(ui, state));

            ui.separator();

            if let Some(link) = &config.footer_link {
                ui.hyperlink_to(&link.label, &link.url);
            }
        });
}

/// Recompute count, staleness and read-set of every pipeline node.
fn pipeline_status(ui: &mut Ui, state: &DashboardState) {
    egui::Grid::new("pipeline_status")
        .striped(true)
        .show(ui, |ui: &mut Ui| {
            ui.strong("node");
            ui.strong("runs");
            ui.end_row();
            for node in Node::ALL {
                let reads = state
                    .node_reads(node)
                    .iter()
                    .map(|dep| match dep {
                        Dep::Source(source) => format!("{source:?}"),
                        Dep::Node(node) => format!("{node:?}"),
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                ui.label(format!("{node:?}"))
                    .on_hover_text(format!("reads {reads}"));
                let runs = state.computations(node).to_string();
                if state.is_stale(node) {
                    ui.label(RichText::new(runs).weak()).on_hover_text("stale");
                } else {
                    ui.label(runs);
                }
                ui.end_row();
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the title bar with record counts and the filter-mode switch.
pub fn top_bar(ui: &mut Ui, state: &mut DashboardState, config: &DashboardConfig) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.strong(&config.title);
        ui.separator();

        let visible = state.filtered_data().len();
        let shown = state.species_histogram();
        let per_species = state
            .dataset()
            .species_counts()
            .map(|(sp, n)| format!("{sp}: {n} loaded, {} visible", shown.artifact.count(sp)))
            .join("\n");
        ui.label(format!(
            "{} penguins loaded, {visible} visible",
            state.dataset().len()
        ))
        .on_hover_text(per_species);

        ui.separator();

        let by_species = state.filter_mode() == FilterMode::BySpecies;
        if ui
            .selectable_label(by_species, "Filter by species")
            .on_hover_text("When off, the species checkboxes do not subset the data.")
            .clicked()
        {
            state.set_filter_mode(if by_species {
                FilterMode::PassThrough
            } else {
                FilterMode::BySpecies
            });
        }

        if visible == 0 {
            ui.label(RichText::new("No records match the current selection").color(Color32::YELLOW));
        }
    });
}

// ---------------------------------------------------------------------------
// Card container
// ---------------------------------------------------------------------------

fn expanded_id(title: &str) -> egui::Id {
    egui::Id::new(("card_expanded", title))
}

/// A framed region with a heading and a full-screen toggle. While expanded
/// the contents are drawn in a window covering the screen instead of the
/// card.
pub fn card(ui: &mut Ui, title: &str, add_contents: impl FnOnce(&mut Ui)) {
    let id = expanded_id(title);
    let mut expanded = ui.data_mut(|d| d.get_temp::<bool>(id)).unwrap_or(false);
    let mut contents = Some(add_contents);

    egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
        ui.set_min_size(ui.available_size());
        ui.horizontal(|ui: &mut Ui| {
            ui.heading(title);
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui: &mut Ui| {
                let label = if expanded { "Restore" } else { "Full screen" };
                if ui.small_button(label).clicked() {
                    expanded = !expanded;
                }
            });
        });
        ui.separator();
        if expanded {
            ui.label(RichText::new("Shown full screen").weak());
        } else if let Some(add_contents) = contents.take() {
            add_contents(ui);
        }
    });

    if let Some(add_contents) = contents.take().filter(|_| expanded) {
        let ctx = ui.ctx().clone();
        egui::Window::new(title)
            .id(id.with("window"))
            .open(&mut expanded)
            .collapsible(false)
            .fixed_rect(ctx.screen_rect().shrink(16.0))
            .show(&ctx, |ui: &mut Ui| add_contents(ui));
    }
    ui.data_mut(|d| d.insert_temp(id, expanded));
}
