use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Color used for every point when the payload carries none.
pub const DEFAULT_POINT_COLOR: &str = "#6366f1";

/// Color reserved for the uploading user.
pub const MAIN_USER_COLOR: &str = "#FAA619";

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Keyword {
    pub keyword: String,
    pub score: f64,
}

// The topic model stores keywords as `[word, score]` pairs while older
// payloads use objects, so both shapes are accepted. A `null` score (also
// what a sanitised `NaN` becomes) reads as zero.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawKeyword {
    Object {
        keyword: String,
        #[serde(default)]
        score: Option<f64>,
    },
    Pair(String, Option<f64>),
    Bare(String),
}

impl<'de> Deserialize<'de> for Keyword {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match RawKeyword::deserialize(deserializer)? {
            RawKeyword::Object { keyword, score } | RawKeyword::Pair(keyword, score) => {
                Self {
                    keyword,
                    score: score.unwrap_or(0.0),
                }
            }
            RawKeyword::Bare(keyword) => Self {
                keyword,
                score: 0.0,
            },
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Point {
    pub id: String,
    pub name: String,
    pub position: [f64; 3],
    pub connections: Vec<String>,
    pub favorite_topic: String,
    pub keywords: Vec<Keyword>,
    pub stats: Value,
    pub color: String,
}

/// Reads an embedding as a position. Anything but exactly three finite
/// numbers yields `None`.
pub fn finite_position(embedding: &Value) -> Option<[f64; 3]> {
    let values = embedding.as_array()?;
    let [x, y, z] = values.as_slice() else {
        return None;
    };

    let position = [x.as_f64()?, y.as_f64()?, z.as_f64()?];
    position
        .iter()
        .all(|coord| coord.is_finite())
        .then_some(position)
}
