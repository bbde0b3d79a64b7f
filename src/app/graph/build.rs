use eframe::egui::Color32;

use crate::chat::{ChatGraph, DEFAULT_POINT_COLOR, MAIN_USER_COLOR};

use super::super::render_utils::parse_hex_color;
use super::super::{RenderGraph, RenderNode, ViewScratch};

fn point_color(hex: &str) -> Color32 {
    parse_hex_color(hex)
        .or_else(|| parse_hex_color(DEFAULT_POINT_COLOR))
        .unwrap_or(Color32::LIGHT_BLUE)
}

impl RenderGraph {
    pub(in crate::app) fn from_graph(graph: &ChatGraph) -> Self {
        let nodes = graph
            .points
            .iter()
            .map(|point| {
                let color = if graph.is_main_user(&point.id) {
                    point_color(MAIN_USER_COLOR)
                } else {
                    point_color(&point.color)
                };

                RenderNode {
                    id: point.id.clone(),
                    world_pos: point.position.map(|coord| coord as f32),
                    color,
                }
            })
            .collect::<Vec<_>>();

        let mut edges = graph.edges();
        edges.sort_unstable();

        Self {
            nodes,
            edges,
            view_scratch: ViewScratch::default(),
        }
    }
}
