use eframe::egui::{self, Align2, Context, RichText, Ui, Vec2};

use crate::chat::{ChatGraph, GraphKind};

use super::super::camera::OrbitCamera;
use super::super::render_utils::{MUTED_TEXT, PANEL_FILL};
use super::super::selection::Selection;
use super::super::{RenderGraph, Route, ViewModel};

const LOADING_MESSAGES: [&str; 10] = [
    "Processing Your Data...",
    "Sit Tight...",
    "Hold on...",
    "Almost there...",
    "Crunching numbers...",
    "Just a sec...",
    "Your data is important...",
    "Easter Egg: Discord loves cats! 🐱...",
    "Almost done...",
    "Stay tuned...",
];

const LOADING_MESSAGE_SECS: f64 = 4.0;

pub(in crate::app) fn loading_message(elapsed_secs: f64) -> &'static str {
    let step = (elapsed_secs.max(0.0) / LOADING_MESSAGE_SECS) as usize;
    LOADING_MESSAGES[step % LOADING_MESSAGES.len()]
}

pub(in crate::app) fn draw_loading(ui: &mut Ui, heading: &str) {
    let elapsed = ui.input(|input| input.time);

    ui.vertical_centered(|ui| {
        ui.add_space(120.0);
        ui.heading(heading);
        ui.add_space(8.0);
        ui.spinner();
        ui.add_space(8.0);
        ui.label(RichText::new(loading_message(elapsed)).color(MUTED_TEXT));
    });
}

fn graph_information(kind: GraphKind) -> &'static str {
    match kind {
        GraphKind::Global => {
            "This graph shows the connection between chat users in a particular chat group. \
             Each node represents a user. Global connections (for every unique pair within the \
             threshold) are drawn in white at lower opacity. When you click on a node, the \
             connections from that node are highlighted in full white, and the sidebar displays \
             the names of the connected users."
        }
        GraphKind::Local => {
            "This graph shows the users closest to you in a particular chat group. Each node \
             represents a user. Connections for every unique pair within the threshold are drawn \
             at lower opacity. When you click on a node, its nearby users are worked out on the \
             spot, the connections are drawn at full opacity and the sidebar lists them."
        }
    }
}

impl ViewModel {
    pub(in crate::app) fn new(graph: ChatGraph) -> Self {
        let render_graph = RenderGraph::from_graph(&graph);

        Self {
            graph,
            selection: Selection::default(),
            camera: OrbitCamera::default(),
            user_filter: String::new(),
            show_info: false,
            render_graph,
            visible_node_count: 0,
            visible_edge_count: 0,
        }
    }

    pub(in crate::app) fn show(&mut self, ctx: &Context, navigation: &mut Option<Route>) {
        egui::TopBottomPanel::top("top_bar")
            .resizable(false)
            .show(ctx, |ui| self.draw_top_bar(ui, navigation));

        if self.selection.selected().is_some() {
            egui::SidePanel::right("details")
                .resizable(true)
                .default_width(320.0)
                .frame(egui::Frame::side_top_panel(&ctx.style()).fill(PANEL_FILL))
                .show(ctx, |ui| {
                    egui::ScrollArea::vertical()
                        .auto_shrink([false, false])
                        .show(ui, |ui| self.draw_details(ui));
                });
        }

        self.draw_info_window(ctx);

        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.draw_graph(ui));
    }

    fn draw_info_window(&mut self, ctx: &Context) {
        if !self.show_info {
            return;
        }

        let mut open = true;
        let mut dismissed = false;
        egui::Window::new("Graph Information")
            .open(&mut open)
            .collapsible(false)
            .resizable(false)
            .default_width(420.0)
            .anchor(Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(graph_information(self.graph.kind));
                ui.add_space(8.0);
                ui.label(
                    RichText::new(
                        "Left drag orbits, right or middle drag pans, scrolling zooms. \
                         Your own node is drawn in orange.",
                    )
                    .color(MUTED_TEXT),
                );
                ui.add_space(8.0);
                if ui.button("Close").clicked() {
                    dismissed = true;
                }
            });

        self.show_info = open && !dismissed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::sample_graph;

    #[test]
    fn loading_messages_rotate_every_four_seconds() {
        assert_eq!(loading_message(0.0), "Processing Your Data...");
        assert_eq!(loading_message(3.9), "Processing Your Data...");
        assert_eq!(loading_message(4.0), "Sit Tight...");
        assert_eq!(loading_message(40.0), "Processing Your Data...");
        assert_eq!(loading_message(-1.0), "Processing Your Data...");
    }

    #[test]
    fn new_view_starts_unselected_at_default_camera() {
        let model = ViewModel::new(sample_graph());
        assert_eq!(model.render_graph.nodes.len(), model.graph.point_count());
        assert_eq!(model.selection, Selection::default());
        assert_eq!(model.camera, OrbitCamera::default());
        assert!(!model.show_info);
    }
}
