use crate::chat::ChatGraph;

/// Hover and click selection over the loaded points. Both are ids, both
/// are optional and independent; the last write wins.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(in crate::app) struct Selection {
    hovered: Option<String>,
    selected: Option<String>,
}

impl Selection {
    pub(in crate::app) fn hovered(&self) -> Option<&str> {
        self.hovered.as_deref()
    }

    pub(in crate::app) fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub(in crate::app) fn set_hovered(&mut self, hovered: Option<String>) {
        self.hovered = hovered;
    }

    pub(in crate::app) fn select(&mut self, id: String) {
        self.selected = Some(id);
    }

    pub(in crate::app) fn close_panel(&mut self) {
        self.selected = None;
    }

    /// Selects a user picked by name. Names without a rendered point are
    /// ignored.
    pub(in crate::app) fn pick_user(&mut self, graph: &ChatGraph, username: &str) -> bool {
        if graph.point(username).is_none() {
            return false;
        }
        self.selected = Some(username.to_owned());
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::tests::sample_graph;

    #[test]
    fn hover_and_select_are_independent() {
        let mut selection = Selection::default();
        selection.set_hovered(Some("bob".to_owned()));
        selection.select("alice".to_owned());
        assert_eq!(selection.hovered(), Some("bob"));
        assert_eq!(selection.selected(), Some("alice"));

        selection.set_hovered(None);
        assert_eq!(selection.hovered(), None);
        assert_eq!(selection.selected(), Some("alice"));
    }

    #[test]
    fn closing_the_panel_clears_selection_only() {
        let graph = sample_graph();
        let before = graph.points.clone();

        let mut selection = Selection::default();
        assert!(selection.pick_user(&graph, "bob"));
        selection.set_hovered(Some("carol".to_owned()));
        selection.close_panel();

        assert_eq!(selection.selected(), None);
        assert_eq!(selection.hovered(), Some("carol"));
        assert_eq!(graph.points, before);
    }

    #[test]
    fn unknown_users_are_not_picked() {
        let graph = sample_graph();
        let mut selection = Selection::default();
        selection.select("alice".to_owned());

        assert!(!selection.pick_user(&graph, "ghost"));
        assert_eq!(selection.selected(), Some("alice"));
    }

    #[test]
    fn last_selection_wins() {
        let mut selection = Selection::default();
        selection.select("alice".to_owned());
        selection.select("bob".to_owned());
        assert_eq!(selection.selected(), Some("bob"));
    }
}
