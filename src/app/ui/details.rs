use eframe::egui::{self, Align, Layout, RichText, Ui};

use crate::chat::{MAIN_USER_COLOR, distance, sidebar_metrics};

use super::super::ViewModel;
use super::super::render_utils::{CHIP_FILL, MUTED_TEXT, parse_hex_color};

impl ViewModel {
    pub(in crate::app) fn draw_details(&mut self, ui: &mut Ui) {
        let Some(selected_id) = self.selection.selected().map(str::to_owned) else {
            return;
        };

        let Some(point) = self.graph.point(&selected_id) else {
            ui.label("Selected user is no longer part of this graph.");
            if ui.button("Close").clicked() {
                self.selection.close_panel();
            }
            return;
        };

        let mut close = false;
        let mut pending_selection = None;

        ui.horizontal(|ui| {
            ui.heading(point.name.as_str());
            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                if ui.button("✕").on_hover_text("Close").clicked() {
                    close = true;
                }
            });
        });
        if self.graph.is_main_user(&point.id) {
            let color = parse_hex_color(MAIN_USER_COLOR).unwrap_or(MUTED_TEXT);
            ui.label(RichText::new("That's you").color(color).small());
        }
        ui.add_space(8.0);

        section_title(ui, "Favorite Topic");
        if point.favorite_topic.trim().is_empty() {
            ui.label(RichText::new("Unknown").color(MUTED_TEXT));
        } else {
            ui.label(point.favorite_topic.as_str());
        }
        ui.add_space(8.0);

        section_title(ui, "Top Keywords");
        if point.keywords.is_empty() {
            ui.label(RichText::new("No keywords yet").color(MUTED_TEXT));
        } else {
            ui.horizontal_wrapped(|ui| {
                for keyword in &point.keywords {
                    egui::Frame::new()
                        .fill(CHIP_FILL)
                        .corner_radius(8.0)
                        .inner_margin(egui::vec2(8.0, 3.0))
                        .show(ui, |ui| {
                            ui.label(RichText::new(keyword.keyword.as_str()).small());
                        })
                        .response
                        .on_hover_text(format!("score {:.3}", keyword.score));
                }
            });
        }
        ui.add_space(8.0);

        section_title(ui, "Stats");
        egui::Grid::new("sidebar_stats")
            .num_columns(2)
            .striped(true)
            .show(ui, |ui| {
                for metric in sidebar_metrics(&point.stats) {
                    ui.label(RichText::new(metric.name).color(MUTED_TEXT));
                    ui.label(metric.value);
                    ui.end_row();
                }
            });
        ui.add_space(8.0);

        section_title(ui, "Connections");
        let connections = self.graph.connections_of(&point.id);
        if connections.is_empty() {
            ui.label(RichText::new("No nearby connections").color(MUTED_TEXT));
        } else {
            for neighbor_id in &connections {
                let label = match self.graph.point(neighbor_id) {
                    Some(neighbor) => format!(
                        "{neighbor_id}  ({:.2})",
                        distance(point.position, neighbor.position)
                    ),
                    None => neighbor_id.clone(),
                };
                if ui.link(label).clicked() {
                    pending_selection = Some(neighbor_id.clone());
                }
            }
        }

        if close {
            self.selection.close_panel();
        } else if let Some(id) = pending_selection {
            self.selection.select(id);
        }
    }
}

fn section_title(ui: &mut Ui, title: &str) {
    ui.label(RichText::new(title).color(MUTED_TEXT).strong());
}
