use eframe::egui::{self, Align, Layout, Ui};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;

use crate::chat::GraphKind;

use super::super::{Route, ViewModel};

fn fuzzy_match_score(matcher: &SkimMatcherV2, text: &str, query: &str) -> Option<i64> {
    matcher
        .fuzzy_match(text, query)
        .or_else(|| matcher.fuzzy_match(&text.to_ascii_lowercase(), &query.to_ascii_lowercase()))
}

/// Usernames matching `query`, best match first. A blank query keeps the
/// original order.
pub(in crate::app) fn filter_usernames<'a>(usernames: &'a [String], query: &str) -> Vec<&'a str> {
    let query = query.trim();
    if query.is_empty() {
        return usernames.iter().map(String::as_str).collect();
    }

    let matcher = SkimMatcherV2::default();
    let mut scored = usernames
        .iter()
        .filter_map(|name| {
            fuzzy_match_score(&matcher, name, query).map(|score| (score, name.as_str()))
        })
        .collect::<Vec<_>>();
    scored.sort_by(|a, b| b.0.cmp(&a.0).then_with(|| a.1.cmp(b.1)));
    scored.into_iter().map(|(_score, name)| name).collect()
}

impl ViewModel {
    pub(in crate::app) fn draw_top_bar(&mut self, ui: &mut Ui, navigation: &mut Option<Route>) {
        let kind = self.graph.kind;

        ui.horizontal(|ui| {
            ui.heading(kind.label());
            ui.separator();

            if ui.button("Home").clicked() {
                *navigation = Some(Route::Home);
            }
            let other = kind.other();
            if ui
                .button(format!("Switch to {}", other.label()))
                .clicked()
            {
                *navigation = Some(Route::Graph(other));
            }
            if ui.button("View Metrics").clicked() {
                *navigation = Some(Route::Metrics);
            }

            ui.separator();
            if kind == GraphKind::Global {
                self.draw_user_picker(ui);
                ui.separator();
            }

            if ui
                .button("Reset view")
                .on_hover_text("Return the camera to its starting position.")
                .clicked()
            {
                self.reset_camera();
            }
            if ui
                .button("Fit")
                .on_hover_text("Frame every user in view.")
                .clicked()
            {
                self.fit_camera();
            }
            if ui
                .button("Reload")
                .on_hover_text("Fetch the graph again from the backend.")
                .clicked()
            {
                *navigation = Some(Route::Graph(kind));
            }
            if ui.button("?").on_hover_text("Graph information").clicked() {
                self.show_info = true;
            }

            ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                ui.label(self.status_text());
            });
        });
    }

    fn draw_user_picker(&mut self, ui: &mut Ui) {
        let selected_text = self
            .selection
            .selected()
            .unwrap_or("Select a user")
            .to_owned();
        let mut picked = None;

        egui::ComboBox::from_id_salt("user_picker")
            .selected_text(selected_text)
            .width(200.0)
            .show_ui(ui, |ui| {
                ui.add(egui::TextEdit::singleline(&mut self.user_filter).hint_text("Search users"));
                ui.separator();

                egui::ScrollArea::vertical()
                    .max_height(280.0)
                    .show(ui, |ui| {
                        let matches = filter_usernames(&self.graph.usernames, &self.user_filter);
                        if matches.is_empty() {
                            ui.label("No matching users");
                        }
                        for name in matches {
                            let is_selected = self.selection.selected() == Some(name);
                            if ui.selectable_label(is_selected, name).clicked() {
                                picked = Some(name.to_owned());
                            }
                        }
                    });
            });

        if let Some(name) = picked
            && !self.selection.pick_user(&self.graph, &name)
        {
            log::debug!("{name} has no rendered point; selection unchanged");
        }
    }

    fn status_text(&self) -> String {
        let mut text = format!(
            "users: {}  |  connections: {}  |  in view: {} users, {} edges",
            self.graph.point_count(),
            self.graph.connection_count,
            self.visible_node_count,
            self.visible_edge_count
        );
        if !self.graph.skipped.is_empty() {
            text.push_str(&format!("  |  without position: {}", self.graph.skipped.len()));
        }
        text
    }
}
