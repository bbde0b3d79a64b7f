use std::collections::HashMap;

use eframe::egui::{self, Context, RichText, Ui};

use crate::backend::{BackendClient, CommentaryRequest, ConversationHistory};
use crate::chat::{Carousel, GraphKind, MetricCard, MetricSet, metric_cards};

use super::super::render_utils::{ACCENT, CHIP_FILL, ERROR_TEXT, MUTED_TEXT, PANEL_FILL};
use super::super::{LoadState, MetricsPage, Route, Task};
use super::draw_loading;

/// Basic cards are introduced by their own one-liner, interesting ones by
/// the user's favourite topic when the backend knows it.
pub(in crate::app) fn carousel_header(
    set: MetricSet,
    card: Option<&MetricCard>,
    favorite_topic: Option<&str>,
) -> String {
    match set {
        MetricSet::Basic => card
            .map(|card| card.description.to_owned())
            .unwrap_or_else(|| "Your Basic Metrics".to_owned()),
        MetricSet::Interesting => match favorite_topic.map(str::trim) {
            Some(topic) if !topic.is_empty() => format!("Your favorite topic is {topic}"),
            _ => "Your Interesting Metrics".to_owned(),
        },
    }
}

pub(in crate::app) fn commentary_request(card: &MetricCard) -> CommentaryRequest {
    CommentaryRequest {
        name: card.name.to_owned(),
        metric: card.value.clone(),
        description: card.description.to_owned(),
    }
}

impl MetricsPage {
    pub(in crate::app) fn load(client: &BackendClient) -> Self {
        let client = client.clone();
        let task = Task::spawn("conversation history load", move || {
            client.conversation_history()
        });

        Self {
            history: LoadState::Loading(task),
            carousel: Carousel::default(),
            commentary: HashMap::new(),
        }
    }

    pub(in crate::app) fn show(
        &mut self,
        ctx: &Context,
        client: &BackendClient,
        navigation: &mut Option<Route>,
    ) -> bool {
        let mut pending = self.history.poll();
        for state in self.commentary.values_mut() {
            pending |= state.poll();
        }

        egui::TopBottomPanel::top("metrics_nav")
            .resizable(false)
            .show(ctx, |ui| {
                ui.horizontal(|ui| {
                    ui.heading("Your Metrics");
                    ui.separator();
                    if ui.button("Home").clicked() {
                        *navigation = Some(Route::Home);
                    }
                    if ui.button("View Network Graph").clicked() {
                        *navigation = Some(Route::Graph(GraphKind::Global));
                    }
                    if ui.button(GraphKind::Local.label()).clicked() {
                        *navigation = Some(Route::Graph(GraphKind::Local));
                    }
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| match &self.history {
            LoadState::Loading(_) => draw_loading(ui, "Loading your metrics..."),
            LoadState::Error(error) => {
                ui.heading("Failed to load your metrics");
                ui.add_space(6.0);
                ui.label(error.as_str());
                ui.add_space(10.0);
                if ui.button("Retry").clicked() {
                    *navigation = Some(Route::Metrics);
                }
            }
            LoadState::Ready(history) => {
                let history = history.clone();
                ui.vertical_centered(|ui| {
                    ui.add_space(40.0);
                    egui::Frame::new()
                        .fill(PANEL_FILL)
                        .corner_radius(8.0)
                        .inner_margin(24.0)
                        .show(ui, |ui| {
                            ui.set_max_width(480.0);
                            self.draw_carousel(ui, client, &history);
                        });
                });
            }
        });

        pending
    }

    fn draw_carousel(&mut self, ui: &mut Ui, client: &BackendClient, history: &ConversationHistory) {
        let cards = metric_cards(&history.stats, self.carousel.set);
        let card = cards.get(self.carousel.index);

        ui.heading(
            RichText::new(carousel_header(
                self.carousel.set,
                card,
                history.favorite_topic.as_deref(),
            ))
            .strong(),
        );
        ui.add_space(12.0);

        if let Some(card) = card {
            egui::Frame::new()
                .fill(CHIP_FILL)
                .corner_radius(8.0)
                .inner_margin(20.0)
                .show(ui, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.label(RichText::new(card.value.as_str()).size(34.0).strong());
                    ui.label(RichText::new(card.name).size(20.0).color(MUTED_TEXT));
                });
            ui.add_space(8.0);
            self.draw_commentary(ui, client, card);
        }

        ui.add_space(12.0);
        ui.horizontal(|ui| {
            if ui.button("◀").on_hover_text("Previous metric").clicked() {
                self.carousel.prev();
            }
            ui.label(RichText::new(self.carousel.counter_text()).color(MUTED_TEXT));
            if ui.button("▶").on_hover_text("Next metric").clicked() {
                self.carousel.next();
            }
        });

        ui.add_space(8.0);
        let toggle_label = format!("Switch to {} Metrics", self.carousel.set.toggled().label());
        if ui
            .add(egui::Button::new(RichText::new(toggle_label).strong()).fill(ACCENT))
            .clicked()
        {
            self.carousel.toggle_set();
        }
    }

    fn draw_commentary(&mut self, ui: &mut Ui, client: &BackendClient, card: &MetricCard) {
        match self.commentary.get(card.name) {
            None => {
                if ui.button("Generate commentary").clicked() {
                    let request = commentary_request(card);
                    let client = client.clone();
                    let task = Task::spawn("commentary", move || {
                        client.generate_commentary(&request)
                    });
                    self.commentary.insert(card.name, LoadState::Loading(task));
                }
            }
            Some(LoadState::Loading(_)) => {
                ui.horizontal(|ui| {
                    ui.spinner();
                    ui.label(RichText::new("Thinking of something to say...").color(MUTED_TEXT));
                });
            }
            Some(LoadState::Ready(commentary)) => {
                ui.label(RichText::new(commentary.commentary.as_str()).italics());
            }
            Some(LoadState::Error(error)) => {
                ui.label(RichText::new(format!("Could not generate commentary: {error}")).color(ERROR_TEXT));
                if ui.button("Try again").clicked() {
                    self.commentary.remove(card.name);
                }
            }
        }
    }
}
