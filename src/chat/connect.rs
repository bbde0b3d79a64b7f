use std::collections::BTreeMap;

use super::point::Point;

/// Embedding distance below which two users are drawn as connected.
pub const CONNECTION_THRESHOLD: f64 = 14.0;

pub fn distance(a: [f64; 3], b: [f64; 3]) -> f64 {
    let dx = a[0] - b[0];
    let dy = a[1] - b[1];
    let dz = a[2] - b[2];
    (dx * dx + dy * dy + dz * dz).sqrt()
}

/// Strict threshold test; a pair exactly at `threshold` is not connected.
pub fn is_connected(a: [f64; 3], b: [f64; 3], threshold: f64) -> bool {
    distance(a, b) < threshold
}

/// Every point appears as a key, neighbour lists are sorted by id.
pub fn derive_connections(points: &[Point], threshold: f64) -> BTreeMap<String, Vec<String>> {
    let mut connections = points
        .iter()
        .map(|point| (point.id.clone(), Vec::new()))
        .collect::<BTreeMap<_, _>>();

    for (index, point) in points.iter().enumerate() {
        for other in &points[index + 1..] {
            if point.id == other.id || !is_connected(point.position, other.position, threshold) {
                continue;
            }

            if let Some(neighbors) = connections.get_mut(&point.id) {
                neighbors.push(other.id.clone());
            }
            if let Some(neighbors) = connections.get_mut(&other.id) {
                neighbors.push(point.id.clone());
            }
        }
    }

    for neighbors in connections.values_mut() {
        neighbors.sort();
        neighbors.dedup();
    }

    connections
}

/// Stores the derived neighbour lists on the points themselves and returns
/// the number of unordered pairs.
pub fn assign_connections(points: &mut [Point], threshold: f64) -> usize {
    let mut connections = derive_connections(points, threshold);
    let mut pair_ends = 0usize;

    for point in points.iter_mut() {
        point.connections = connections.remove(&point.id).unwrap_or_default();
        pair_ends += point.connections.len();
    }

    pair_ends / 2
}

/// Ids of all points within `threshold` of `center`, excluding `center` itself.
pub fn neighbors_within(points: &[Point], center: &Point, threshold: f64) -> Vec<String> {
    let mut neighbors = points
        .iter()
        .filter(|point| {
            point.id != center.id && is_connected(center.position, point.position, threshold)
        })
        .map(|point| point.id.clone())
        .collect::<Vec<_>>();
    neighbors.sort();
    neighbors
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use super::*;

    fn point(id: &str, position: [f64; 3]) -> Point {
        Point {
            id: id.to_owned(),
            name: id.to_owned(),
            position,
            connections: Vec::new(),
            favorite_topic: String::new(),
            keywords: Vec::new(),
            stats: Value::Null,
            color: String::new(),
        }
    }

    #[test]
    fn distance_is_symmetric_and_zero_on_self() {
        let a = [1.0, -4.0, 2.5];
        let b = [-3.0, 7.0, 0.0];
        assert_eq!(distance(a, b), distance(b, a));
        assert_eq!(distance(a, a), 0.0);
        assert!((distance([0.0, 0.0, 0.0], [3.0, 4.0, 12.0]) - 13.0).abs() < 1e-12);
    }

    #[test]
    fn threshold_is_strict() {
        let origin = [0.0, 0.0, 0.0];
        assert!(is_connected(origin, [0.0, 0.0, 10.0], CONNECTION_THRESHOLD));
        assert!(!is_connected(origin, [0.0, 0.0, 20.0], CONNECTION_THRESHOLD));
        assert!(!is_connected(origin, [0.0, 0.0, 14.0], CONNECTION_THRESHOLD));
    }

    #[test]
    fn connections_are_symmetric() {
        let points = vec![
            point("alice", [0.0, 0.0, 0.0]),
            point("bob", [0.0, 0.0, 10.0]),
            point("carol", [0.0, 0.0, 20.0]),
            point("dave", [100.0, 0.0, 0.0]),
        ];

        let connections = derive_connections(&points, CONNECTION_THRESHOLD);

        assert_eq!(connections["alice"], vec!["bob".to_owned()]);
        assert_eq!(connections["bob"], vec!["alice".to_owned(), "carol".to_owned()]);
        assert_eq!(connections["carol"], vec!["bob".to_owned()]);
        assert!(connections["dave"].is_empty());

        for (id, neighbors) in &connections {
            for neighbor in neighbors {
                assert!(connections[neighbor].contains(id), "{id} <-> {neighbor}");
            }
        }
    }

    #[test]
    fn derivation_is_idempotent() {
        let mut points = vec![
            point("a", [1.0, 2.0, 3.0]),
            point("b", [4.0, 5.0, 6.0]),
            point("c", [30.0, 5.0, 6.0]),
        ];

        let first = assign_connections(&mut points, CONNECTION_THRESHOLD);
        let snapshot = points.clone();
        let second = assign_connections(&mut points, CONNECTION_THRESHOLD);

        assert_eq!(first, 1);
        assert_eq!(first, second);
        assert_eq!(snapshot, points);
    }

    #[test]
    fn coincident_points_connect_but_never_to_themselves() {
        let points = vec![point("a", [2.0, 2.0, 2.0]), point("b", [2.0, 2.0, 2.0])];
        let connections = derive_connections(&points, CONNECTION_THRESHOLD);
        assert_eq!(connections["a"], vec!["b".to_owned()]);
        assert_eq!(connections["b"], vec!["a".to_owned()]);
    }

    #[test]
    fn neighbors_within_excludes_center() {
        let points = vec![
            point("center", [0.0, 0.0, 0.0]),
            point("near", [5.0, 5.0, 5.0]),
            point("far", [50.0, 0.0, 0.0]),
        ];

        assert_eq!(
            neighbors_within(&points, &points[0], CONNECTION_THRESHOLD),
            vec!["near".to_owned()]
        );
    }
}
