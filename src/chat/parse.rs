use std::borrow::Cow;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde_json::Value;

use super::point::Keyword;

#[derive(Clone, Debug, Default, Deserialize)]
struct RawUserRecord {
    #[serde(default)]
    favorite_topic: Option<String>,
    #[serde(default)]
    keywords: Value,
    #[serde(default)]
    stats: Value,
    #[serde(default)]
    three_d_embedding: Value,
    #[serde(default)]
    color: Option<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub(super) struct UserRecord {
    pub(super) username: String,
    pub(super) favorite_topic: String,
    pub(super) keywords: Vec<Keyword>,
    pub(super) stats: Value,
    pub(super) embedding: Value,
    pub(super) color: Option<String>,
}

/// Replaces the bare `NaN`, `Infinity` and `-Infinity` tokens Python's
/// encoder emits with `null`, leaving string contents untouched.
pub fn sanitize_non_finite(raw: &str) -> Cow<'_, str> {
    if !raw.contains("NaN") && !raw.contains("Infinity") {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = raw;

    while let Some(ch) = rest.chars().next() {
        if in_string {
            out.push(ch);
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            rest = &rest[ch.len_utf8()..];
            continue;
        }

        if ch == '"' {
            in_string = true;
            out.push(ch);
            rest = &rest[1..];
            continue;
        }

        if let Some(token) = ["-Infinity", "Infinity", "NaN"]
            .into_iter()
            .find(|token| rest.starts_with(token))
        {
            out.push_str("null");
            rest = &rest[token.len()..];
            continue;
        }

        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }

    Cow::Owned(out)
}

pub fn parse_json(raw: &str) -> Result<Value> {
    serde_json::from_str(&sanitize_non_finite(raw)).context("invalid JSON from backend")
}

/// Fields the backend keeps in text columns may arrive JSON-encoded.
/// Empty strings mean the column was never filled.
pub fn unnest(value: Value) -> Result<Value> {
    match value {
        Value::String(text) if text.trim().is_empty() => Ok(Value::Null),
        Value::String(text) => parse_json(&text),
        other => Ok(other),
    }
}

fn parse_keywords(value: Value) -> Result<Vec<Keyword>> {
    match unnest(value)? {
        Value::Null => Ok(Vec::new()),
        value => serde_json::from_value(value).context("keywords are not a keyword list"),
    }
}

/// Parses a `username -> record` graph payload. Records come back sorted
/// by username.
pub(super) fn parse_graph_payload(raw: &str) -> Result<Vec<UserRecord>> {
    let parsed = parse_json(raw)?;
    let object = match parsed {
        Value::Object(object) => object,
        _ => return Err(anyhow!("unexpected JSON type for graph payload")),
    };

    let mut records = Vec::with_capacity(object.len());
    for (username, value) in object {
        let raw = RawUserRecord::deserialize(value)
            .with_context(|| format!("invalid record for user {username}"))?;

        let stats =
            unnest(raw.stats).with_context(|| format!("invalid stats for user {username}"))?;
        let keywords = parse_keywords(raw.keywords)
            .with_context(|| format!("invalid keywords for user {username}"))?;
        // A malformed embedding only drops the point, it never fails the payload.
        let embedding = unnest(raw.three_d_embedding).unwrap_or(Value::Null);

        records.push(UserRecord {
            username,
            favorite_topic: raw.favorite_topic.unwrap_or_default(),
            keywords,
            stats,
            embedding,
            color: raw.color.filter(|color| !color.trim().is_empty()),
        });
    }

    records.sort_by(|a, b| a.username.cmp(&b.username));
    Ok(records)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn sanitizer_replaces_bare_tokens_only() {
        let raw = r#"{"a": [NaN, -Infinity, Infinity], "b": "NaN stays", "c": "q\"NaN"}"#;
        let value: Value = serde_json::from_str(&sanitize_non_finite(raw)).unwrap();
        assert_eq!(
            value,
            json!({"a": [null, null, null], "b": "NaN stays", "c": "q\"NaN"})
        );
    }

    #[test]
    fn sanitizer_borrows_clean_input() {
        assert!(matches!(sanitize_non_finite("[1, 2]"), Cow::Borrowed(_)));
    }

    #[test]
    fn stats_are_unnested_from_strings() {
        let raw = r##"{
            "bob": {
                "favorite_topic": "games",
                "keywords": [["halo", 60.0]],
                "stats": "{\"Dryness Score\": 4.2}",
                "three_d_embedding": [1, 2, 3],
                "color": "#ff0000"
            },
            "alice": {
                "favorite_topic": "music",
                "keywords": [{"keyword": "jazz", "score": 10}],
                "stats": {"Dryness Score": 1.0},
                "three_d_embedding": "[4, 5, 6]"
            }
        }"##;

        let records = parse_graph_payload(raw).unwrap();
        assert_eq!(records.len(), 2);

        assert_eq!(records[0].username, "alice");
        assert_eq!(records[0].stats, json!({"Dryness Score": 1.0}));
        assert_eq!(records[0].embedding, json!([4, 5, 6]));
        assert_eq!(records[0].color, None);

        assert_eq!(records[1].username, "bob");
        assert_eq!(records[1].stats, json!({"Dryness Score": 4.2}));
        assert_eq!(records[1].keywords[0].keyword, "halo");
        assert_eq!(records[1].color.as_deref(), Some("#ff0000"));
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let records = parse_graph_payload(r#"{"carol": {}}"#).unwrap();
        assert_eq!(records[0].favorite_topic, "");
        assert!(records[0].keywords.is_empty());
        assert_eq!(records[0].stats, Value::Null);
        assert_eq!(records[0].embedding, Value::Null);
    }

    #[test]
    fn empty_embedding_column_is_null() {
        let records = parse_graph_payload(r#"{"dan": {"three_d_embedding": ""}}"#).unwrap();
        assert_eq!(records[0].embedding, Value::Null);
    }

    #[test]
    fn broken_stats_string_fails_the_payload() {
        let error = parse_graph_payload(r#"{"eve": {"stats": "{not json"}}"#).unwrap_err();
        assert!(format!("{error:#}").contains("invalid stats for user eve"));
    }

    #[test]
    fn nan_keyword_score_keeps_the_payload() {
        let raw = r#"{
            "alice": {"keywords": [["rust", NaN]], "three_d_embedding": [0, 0, 0]},
            "bob": {"keywords": [{"keyword": "go", "score": null}], "three_d_embedding": [1, 1, 1]}
        }"#;

        let records = parse_graph_payload(raw).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].keywords[0].keyword, "rust");
        assert_eq!(records[0].keywords[0].score, 0.0);
        assert_eq!(records[1].keywords[0].keyword, "go");
    }

    #[test]
    fn non_object_payload_is_rejected() {
        assert!(parse_graph_payload("[1, 2, 3]").is_err());
        assert!(parse_graph_payload("not json").is_err());
    }
}
