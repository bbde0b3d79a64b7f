mod client;
mod types;

use std::path::Path;

pub use client::BackendClient;
pub use types::{Commentary, CommentaryRequest, ConversationHistory, ProcessOutcome, UploadOutcome};

/// Chat exports are JSON documents; anything else is refused before upload.
pub fn is_json_export(path: &Path) -> bool {
    path.extension()
        .and_then(|extension| extension.to_str())
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_json_extensions_are_uploadable() {
        assert!(is_json_export(Path::new("/tmp/chat.json")));
        assert!(is_json_export(Path::new("Export.JSON")));
        assert!(!is_json_export(Path::new("chat.txt")));
        assert!(!is_json_export(Path::new("json")));
        assert!(!is_json_export(Path::new("")));
    }
}
