use std::collections::HashSet;

use crate::chat::ChatGraph;

use super::{HighlightState, RenderGraph};

/// Related nodes are the selected point's connections as the current view
/// defines them; related edges are those touching the selected point.
pub(super) fn build_highlight_state_for_selected_id(
    graph: &ChatGraph,
    cache: &RenderGraph,
    selected_id: &str,
) -> Option<HighlightState> {
    let &selected = graph.index_by_id.get(selected_id)?;

    let mut related_nodes = HashSet::new();
    related_nodes.insert(selected);
    for neighbor in graph.connections_of(selected_id) {
        if let Some(&index) = graph.index_by_id.get(&neighbor) {
            related_nodes.insert(index);
        }
    }

    let related_edges = cache
        .edges
        .iter()
        .copied()
        .filter(|&(source, target)| source == selected || target == selected)
        .collect::<HashSet<_>>();

    Some(HighlightState {
        selected,
        related_nodes,
        related_edges,
    })
}

impl HighlightState {
    /// Points outside the selection's neighbourhood are drawn faded.
    pub(super) fn is_dimmed(&self, index: usize) -> bool {
        !self.related_nodes.contains(&index)
    }
}
