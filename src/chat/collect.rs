use anyhow::Result;

use crate::backend::BackendClient;

use super::graph::{ChatGraph, GraphKind};

/// Fetches the main user and the graph payload for `kind`, then builds the
/// point set with its connections.
pub fn collect_chat_graph(client: &BackendClient, kind: GraphKind) -> Result<ChatGraph> {
    // The main user only colors one node, so losing it is not fatal.
    let main_user = match client.main_user() {
        Ok(user) => user,
        Err(error) => {
            log::warn!("could not resolve main user: {error:#}");
            None
        }
    };

    let raw = client.graph_payload(kind)?;
    let graph = ChatGraph::from_payload(kind, main_user, &raw)?;
    log::info!(
        "loaded {}: {} points, {} connections",
        kind.label().to_lowercase(),
        graph.point_count(),
        graph.connection_count
    );

    Ok(graph)
}
