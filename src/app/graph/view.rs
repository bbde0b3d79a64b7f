use eframe::egui::{self, Align2, Color32, FontId, Rect, Sense, Stroke, Ui, vec2};

use crate::chat::CONNECTION_THRESHOLD;

use super::super::camera::OrbitCamera;
use super::super::highlight::build_highlight_state_for_selected_id;
use super::super::render_utils::{
    BACKGROUND, EDGE_DIM, EDGE_HIGHLIGHT, MUTED_TEXT, PANEL_FILL, blend_color, circle_visible,
    draw_background, edge_visible, outline, with_alpha,
};
use super::super::{RenderGraph, ViewModel};
use super::interaction::pick_point;

/// Sphere radius in world units.
const POINT_RADIUS: f32 = 0.2;

impl ViewModel {
    fn update_screen_space(rect: Rect, camera: &OrbitCamera, cache: &mut RenderGraph) {
        let scratch = &mut cache.view_scratch;
        scratch.projected.clear();
        scratch.screen_radii.clear();

        for node in &cache.nodes {
            let projected = camera.project(rect, node.world_pos);
            scratch.screen_radii.push(
                projected.map_or(0.0, |projected| (POINT_RADIUS * projected.scale).clamp(2.0, 90.0)),
            );
            scratch.projected.push(projected);
        }
    }

    // Far to near, so closer spheres paint over farther ones.
    fn update_draw_order(cache: &mut RenderGraph) {
        let scratch = &mut cache.view_scratch;
        scratch.draw_order.clear();
        scratch.draw_order.extend(
            scratch
                .projected
                .iter()
                .enumerate()
                .filter_map(|(index, projected)| projected.map(|_| index)),
        );

        let projected = &scratch.projected;
        let depth = |index: usize| projected[index].map_or(0.0, |projected| projected.depth);
        scratch
            .draw_order
            .sort_by(|a, b| depth(*b).total_cmp(&depth(*a)));
    }

    pub(in crate::app) fn draw_graph(&mut self, ui: &mut Ui) {
        let (rect, response) = ui.allocate_exact_size(ui.available_size(), Sense::click_and_drag());
        let painter = ui.painter_at(rect);

        draw_background(&painter, rect);

        self.handle_camera_zoom(ui, &response);
        self.handle_camera_drag(rect, &response);

        if self.render_graph.nodes.is_empty() {
            self.visible_node_count = 0;
            self.visible_edge_count = 0;
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                "No users with a 3D embedding yet.",
                FontId::proportional(16.0),
                MUTED_TEXT,
            );
            return;
        }

        let highlight = self.selection.selected().and_then(|id| {
            build_highlight_state_for_selected_id(&self.graph, &self.render_graph, id)
        });

        let camera = self.camera;
        let cache = &mut self.render_graph;
        Self::update_screen_space(rect, &camera, cache);
        Self::update_draw_order(cache);

        let pointer = ui
            .input(|input| input.pointer.hover_pos())
            .filter(|pointer| rect.contains(*pointer));
        let hovered = pointer.and_then(|pointer| {
            pick_point(
                &cache.view_scratch.projected,
                &cache.view_scratch.screen_radii,
                pointer,
            )
        });
        self.selection
            .set_hovered(hovered.map(|index| cache.nodes[index].id.clone()));
        if hovered.is_some() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::PointingHand);
        }

        let projected = &cache.view_scratch.projected;
        let mut visible_edge_count = 0usize;
        for &(source, target) in &cache.edges {
            let (Some(start), Some(end)) = (projected[source], projected[target]) else {
                continue;
            };
            if !edge_visible(rect, start.pos, end.pos, 2.0) {
                continue;
            }

            let is_related = highlight
                .as_ref()
                .is_some_and(|state| state.related_edges.contains(&(source, target)));
            let stroke = if is_related {
                Stroke::new(2.0, EDGE_HIGHLIGHT)
            } else {
                Stroke::new(1.0, EDGE_DIM)
            };

            painter.line_segment([start.pos, end.pos], stroke);
            visible_edge_count += 1;
        }
        self.visible_edge_count = visible_edge_count;

        // Everything within the connection threshold of the selected point
        // lies inside this sphere.
        if let Some(state) = &highlight
            && let Some(center) = projected[state.selected]
        {
            let color = cache.nodes[state.selected].color;
            let radius = CONNECTION_THRESHOLD as f32 * center.scale;
            painter.circle_filled(center.pos, radius, with_alpha(color, 22));
            painter.circle_stroke(center.pos, radius, Stroke::new(1.0, with_alpha(color, 70)));
        }

        let mut visible_node_count = 0usize;
        for &index in &cache.view_scratch.draw_order {
            let Some(projection) = projected[index] else {
                continue;
            };
            let radius = cache.view_scratch.screen_radii[index];
            if !circle_visible(rect, projection.pos, radius) {
                continue;
            }
            visible_node_count += 1;

            let render_node = &cache.nodes[index];
            let is_hovered = hovered == Some(index);
            let is_selected = highlight
                .as_ref()
                .is_some_and(|state| state.selected == index);
            let is_dimmed = highlight
                .as_ref()
                .is_some_and(|state| state.is_dimmed(index));

            let color = if is_hovered {
                blend_color(render_node.color, Color32::WHITE, 0.2)
            } else if is_dimmed {
                blend_color(render_node.color, BACKGROUND, 0.6)
            } else {
                render_node.color
            };

            painter.circle_filled(projection.pos, radius, color);
            painter.circle_filled(
                projection.pos - vec2(radius * 0.35, radius * 0.35),
                radius * 0.35,
                with_alpha(Color32::WHITE, 55),
            );

            if is_selected {
                painter.circle_stroke(projection.pos, radius + 3.0, Stroke::new(2.0, Color32::WHITE));
            } else if radius > 4.0 {
                painter.circle_stroke(projection.pos, radius, outline(1.0));
            }
        }
        self.visible_node_count = visible_node_count;

        if let Some(name) = self.selection.hovered()
            && let Some(pointer) = pointer
        {
            let galley = painter.layout_no_wrap(
                name.to_owned(),
                FontId::proportional(14.0),
                Color32::WHITE,
            );
            let anchor = pointer + vec2(14.0, -10.0 - galley.size().y);
            let background = Rect::from_min_size(anchor, galley.size()).expand(5.0);
            painter.rect_filled(background, 4.0, PANEL_FILL);
            painter.galley(anchor, galley, Color32::WHITE);
        }

        if response.clicked_by(egui::PointerButton::Primary)
            && let Some(index) = hovered
        {
            let id = cache.nodes[index].id.clone();
            log::debug!("selected {id}");
            self.selection.select(id);
        }
    }
}
