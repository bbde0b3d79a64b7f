use eframe::egui::{self, Pos2, Rect, Ui};

use super::super::ViewModel;
use super::super::camera::Projected;

const MIN_PICK_RADIUS: f32 = 6.0;

/// Front-most point whose disc contains `pointer`.
pub(in crate::app) fn pick_point(
    projected: &[Option<Projected>],
    screen_radii: &[f32],
    pointer: Pos2,
) -> Option<usize> {
    projected
        .iter()
        .zip(screen_radii)
        .enumerate()
        .filter_map(|(index, (projection, &radius))| {
            let projection = projection.as_ref()?;
            (projection.pos.distance(pointer) <= radius.max(MIN_PICK_RADIUS))
                .then_some((index, projection.depth))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(index, _depth)| index)
}

impl ViewModel {
    pub(in crate::app) fn handle_camera_zoom(&mut self, ui: &Ui, response: &egui::Response) {
        if !response.hovered() {
            return;
        }

        let scroll = ui.input(|input| input.raw_scroll_delta.y);
        if scroll.abs() <= f32::EPSILON {
            return;
        }

        self.camera.zoom(scroll);
    }

    pub(in crate::app) fn handle_camera_drag(&mut self, rect: Rect, response: &egui::Response) {
        if response.dragged_by(egui::PointerButton::Primary) {
            self.camera.orbit(response.drag_delta());
        } else if response.dragged_by(egui::PointerButton::Secondary)
            || response.dragged_by(egui::PointerButton::Middle)
        {
            self.camera.pan(rect, response.drag_delta());
        }
    }

    pub(in crate::app) fn reset_camera(&mut self) {
        self.camera = Default::default();
    }

    pub(in crate::app) fn fit_camera(&mut self) {
        if let Some((min, max)) = self.graph.bounds() {
            self.camera
                .fit(min.map(|coord| coord as f32), max.map(|coord| coord as f32));
        }
    }
}

#[cfg(test)]
mod tests {
    use eframe::egui::pos2;

    use super::*;

    fn projected(x: f32, depth: f32) -> Option<Projected> {
        Some(Projected {
            pos: pos2(x, 0.0),
            depth,
            scale: 10.0,
        })
    }

    #[test]
    fn nearest_depth_wins_when_points_overlap() {
        let points = [projected(0.0, 20.0), projected(2.0, 5.0), None];
        let radii = [10.0, 10.0, 10.0];
        assert_eq!(pick_point(&points, &radii, pos2(1.0, 0.0)), Some(1));
    }

    #[test]
    fn misses_and_culled_points_pick_nothing() {
        let points = [projected(0.0, 20.0), None];
        let radii = [8.0, 100.0];
        assert_eq!(pick_point(&points, &radii, pos2(50.0, 0.0)), None);
    }

    #[test]
    fn tiny_points_still_have_a_usable_target() {
        let points = [projected(0.0, 20.0)];
        let radii = [1.0];
        assert_eq!(pick_point(&points, &radii, pos2(4.0, 0.0)), Some(0));
    }
}
