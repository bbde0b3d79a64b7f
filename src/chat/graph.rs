use std::collections::HashMap;

use anyhow::{Context, Result};

use super::connect::{CONNECTION_THRESHOLD, assign_connections, neighbors_within};
use super::parse::{UserRecord, parse_graph_payload};
use super::point::{DEFAULT_POINT_COLOR, Point, finite_position};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GraphKind {
    Global,
    Local,
}

impl GraphKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Global => "Global Graph",
            Self::Local => "Local Graph",
        }
    }

    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Global => "/api/global_graph",
            Self::Local => "/api/local_graph",
        }
    }

    pub fn other(self) -> Self {
        match self {
            Self::Global => Self::Local,
            Self::Local => Self::Global,
        }
    }
}

#[derive(Clone, Debug)]
pub struct ChatGraph {
    pub kind: GraphKind,
    pub main_user: Option<String>,
    pub points: Vec<Point>,
    pub index_by_id: HashMap<String, usize>,
    pub usernames: Vec<String>,
    pub skipped: Vec<String>,
    pub connection_count: usize,
}

impl ChatGraph {
    /// Builds the graph from a raw `username -> record` document.
    pub fn from_payload(kind: GraphKind, main_user: Option<String>, raw: &str) -> Result<Self> {
        let records = parse_graph_payload(raw)
            .with_context(|| format!("failed to parse {} payload", kind.label().to_lowercase()))?;
        Ok(Self::from_records(kind, main_user, records))
    }

    fn from_records(
        kind: GraphKind,
        main_user: Option<String>,
        records: Vec<UserRecord>,
    ) -> Self {
        let usernames = records
            .iter()
            .map(|record| record.username.clone())
            .collect::<Vec<_>>();

        let mut skipped = Vec::new();
        let mut points = Vec::with_capacity(records.len());
        for record in records {
            let Some(position) = finite_position(&record.embedding) else {
                skipped.push(record.username);
                continue;
            };

            // The local view paints every user the same; only the global
            // payload carries per-user colors.
            let color = match kind {
                GraphKind::Global => record.color,
                GraphKind::Local => None,
            }
            .unwrap_or_else(|| DEFAULT_POINT_COLOR.to_owned());

            points.push(Point {
                id: record.username.clone(),
                name: record.username,
                position,
                connections: Vec::new(),
                favorite_topic: record.favorite_topic,
                keywords: record.keywords,
                stats: record.stats,
                color,
            });
        }

        if !skipped.is_empty() {
            log::warn!(
                "skipped {} users without a finite 3D embedding: {}",
                skipped.len(),
                skipped.join(", ")
            );
        }

        let connection_count = assign_connections(&mut points, CONNECTION_THRESHOLD);
        let index_by_id = points
            .iter()
            .enumerate()
            .map(|(index, point)| (point.id.clone(), index))
            .collect();

        Self {
            kind,
            main_user,
            points,
            index_by_id,
            usernames,
            skipped,
            connection_count,
        }
    }

    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    pub fn point(&self, id: &str) -> Option<&Point> {
        self.index_by_id
            .get(id)
            .and_then(|&index| self.points.get(index))
    }

    pub fn is_main_user(&self, id: &str) -> bool {
        self.main_user.as_deref() == Some(id)
    }

    /// Neighbours shown for a point. The global view uses the stored lists,
    /// the local view recomputes them around the point on demand.
    pub fn connections_of(&self, id: &str) -> Vec<String> {
        let Some(point) = self.point(id) else {
            return Vec::new();
        };

        match self.kind {
            GraphKind::Global => point.connections.clone(),
            GraphKind::Local => neighbors_within(&self.points, point, CONNECTION_THRESHOLD),
        }
    }

    /// Axis-aligned bounds of all points, `None` for an empty graph.
    pub fn bounds(&self) -> Option<([f64; 3], [f64; 3])> {
        let first = self.points.first()?.position;
        Some(self.points.iter().fold((first, first), |(mut min, mut max), point| {
            for axis in 0..3 {
                min[axis] = min[axis].min(point.position[axis]);
                max[axis] = max[axis].max(point.position[axis]);
            }
            (min, max)
        }))
    }

    /// Unordered index pairs of every connection, each pair once.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges = Vec::with_capacity(self.connection_count);
        for (source, point) in self.points.iter().enumerate() {
            for neighbor in &point.connections {
                if let Some(&target) = self.index_by_id.get(neighbor)
                    && source < target
                {
                    edges.push((source, target));
                }
            }
        }
        edges
    }
}
