use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::artifact::{Rendered, TableArtifact};

const ROW_HEIGHT: f32 = 18.0;

/// Scrollable, resizable data table.
pub fn data_table(ui: &mut Ui, table: &Rendered<TableArtifact>) {
    if let Some(warning) = &table.warning {
        ui.label(RichText::new(warning.to_string()).weak());
    }
    let artifact = &table.artifact;

    ui.push_id("penguins_table", |ui: &mut Ui| {
        let height = ui.available_height();
        let mut builder = TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .max_scroll_height(height)
            .column(Column::auto().at_least(32.0));
        for _ in &artifact.columns {
            builder = builder.column(Column::auto().at_least(40.0));
        }

        builder
            .header(20.0, |mut header| {
                header.col(|ui: &mut Ui| {
                    ui.strong("#");
                });
                for name in &artifact.columns {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name);
                    });
                }
            })
            .body(|body| {
                body.rows(ROW_HEIGHT, artifact.rows.len(), |mut row| {
                    let i = row.index();
                    let cells = &artifact.rows[i];
                    let id = artifact.row_ids[i];
                    row.col(|ui: &mut Ui| {
                        ui.label(RichText::new((id + 1).to_string()).weak());
                    });
                    for value in cells {
                        row.col(|ui: &mut Ui| {
                            ui.label(value);
                        });
                    }
                });
            });
    });
}

/// The same rows laid out as a plain striped grid.
pub fn data_grid(ui: &mut Ui, grid: &Rendered<TableArtifact>) {
    if let Some(warning) = &grid.warning {
        ui.label(RichText::new(warning.to_string()).weak());
    }
    let artifact = &grid.artifact;

    egui::ScrollArea::both()
        .id_salt("penguins_grid_scroll")
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            egui::Grid::new("penguins_grid")
                .striped(true)
                .min_col_width(60.0)
                .show(ui, |ui: &mut Ui| {
                    ui.strong("#");
                    for name in &artifact.columns {
                        ui.strong(name);
                    }
                    ui.end_row();
                    for (cells, id) in artifact.rows.iter().zip(&artifact.row_ids) {
                        ui.label(RichText::new((id + 1).to_string()).weak());
                        for value in cells {
                            ui.label(value);
                        }
                        ui.end_row();
                    }
                });
        });
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::artifact::{grid_view, table_view};
    use crate::data::filter::FilteredView;
    use crate::data::model::tests::record;
    use crate::data::model::{Dataset, Species};

    fn draw(add_contents: impl Fn(&mut Ui)) {
        let ctx = egui::Context::default();
        for _ in 0..2 {
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                egui::CentralPanel::default().show(ctx, |ui: &mut Ui| add_contents(ui));
            });
        }
    }

    #[test]
    fn table_and_grid_render_rows_and_empty_views() {
        let view = FilteredView::all(Arc::new(Dataset::new(vec![
            record(Species::Adelie, 3750.0, 39.1),
            record(Species::Chinstrap, 3500.0, 46.5),
        ])));
        let table = table_view(&view);
        let grid = grid_view(&view);
        draw(|ui| data_table(ui, &table));
        draw(|ui| data_grid(ui, &grid));

        let empty = FilteredView::all(Arc::new(Dataset::default()));
        let table = table_view(&empty);
        assert!(table.warning.is_some());
        draw(|ui| data_table(ui, &table));
    }
}
