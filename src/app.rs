use eframe::egui;
use egui_extras::{Size, StripBuilder};

use crate::config::DashboardConfig;
use crate::state::DashboardState;
use crate::ui::{panels, plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct PenguinDashboardApp {
    pub state: DashboardState,
    pub config: DashboardConfig,
}

impl PenguinDashboardApp {
    pub fn new(state: DashboardState, config: DashboardConfig) -> Self {
        Self { state, config }
    }
}

impl eframe::App for PenguinDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: title and status ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state, &self.config);
        });

        // ---- Left side panel: controls ----
        egui::SidePanel::left("sidebar")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state, &self.config);
            });

        // ---- Central panel: tables and charts ----
        let state = &mut self.state;
        egui::CentralPanel::default().show(ctx, |ui| {
            StripBuilder::new(ui)
                .size(Size::relative(0.4))
                .size(Size::relative(0.3))
                .size(Size::remainder())
                .vertical(|mut strip| {
                    strip.strip(|builder| {
                        builder
                            .size(Size::relative(1.0 / 3.0))
                            .size(Size::remainder())
                            .horizontal(|mut strip| {
                                strip.cell(|ui| {
                                    panels::card(ui, "Penguins Data Table", |ui| {
                                        table::data_table(ui, &state.table_view());
                                    });
                                });
                                strip.cell(|ui| {
                                    panels::card(ui, "Penguins Data Grid", |ui| {
                                        table::data_grid(ui, &state.grid_view());
                                    });
                                });
                            });
                    });
                    strip.strip(|builder| {
                        builder.sizes(Size::remainder(), 2).horizontal(|mut strip| {
                            strip.cell(|ui| {
                                panels::card(ui, "All Species Histogram", |ui| {
                                    plot::species_histogram(ui, &state.species_histogram());
                                });
                            });
                            strip.cell(|ui| {
                                let scatter = state.scatter();
                                panels::card(ui, scatter.artifact.title, |ui| {
                                    plot::scatter_plot(ui, &scatter);
                                });
                            });
                        });
                    });
                    strip.strip(|builder| {
                        builder.sizes(Size::remainder(), 2).horizontal(|mut strip| {
                            strip.cell(|ui| {
                                panels::card(ui, "Attribute Histogram (numeric bins)", |ui| {
                                    plot::attribute_histogram(
                                        ui,
                                        "plotly_histogram",
                                        &state.plotly_histogram(),
                                        state.palette(),
                                    );
                                });
                            });
                            strip.cell(|ui| {
                                panels::card(ui, "Attribute Histogram (slider bins)", |ui| {
                                    plot::attribute_histogram(
                                        ui,
                                        "seaborn_histogram",
                                        &state.seaborn_histogram(),
                                        state.palette(),
                                    );
                                });
                            });
                        });
                    });
                });
        });
    }
}
