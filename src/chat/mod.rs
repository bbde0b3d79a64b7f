mod collect;
mod connect;
mod graph;
mod parse;
mod point;
mod stats;

pub use collect::collect_chat_graph;
pub use connect::{CONNECTION_THRESHOLD, distance};
pub use graph::{ChatGraph, GraphKind};
pub use parse::{parse_json as parse_backend_json, unnest as unnest_json};
pub use point::{DEFAULT_POINT_COLOR, MAIN_USER_COLOR};
pub use stats::{Carousel, MetricCard, MetricSet, metric_cards, sidebar_metrics};
