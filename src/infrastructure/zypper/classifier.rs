//! Classification of failed `zypper refresh` output.
//!
//! zypper has no structured error protocol; all we get is `--xmlout` message
//! elements wrapping human-readable prose. The heuristics below (markers,
//! regexes and their order of precedence) are load-bearing compatibility:
//! keep them in sync with what zypper actually prints.

use crate::domain::entities::RefreshError;
use regex::Regex;
use roxmltree::Document;
use std::sync::LazyLock;

const UNTRUSTED_KEY_MARKER: &str = "New repository or package signing key received";
const LOCK_MARKER: &str = "is blocking";
const INVALID_MARKER: &str = " is invalid.";
const SKIPPED_MARKER: &str = "Skipping repository";

static BRACKET_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[(.+?)\|.*?\]").unwrap());
static REASON_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)Error message: (.*?)$").unwrap());
static QUOTED_NAME: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"'(.*?)'").unwrap());

/// Map raw refresh diagnostic text onto a [`RefreshError`]. Pure; the same
/// input always yields the same classification. The checks are not mutually
/// exclusive substrings, so their order matters: invalid metadata first, then
/// untrusted keys, then lock contention.
pub fn classify(diagnostic: &str) -> RefreshError {
    // Unparsable input degrades to an empty document; the raw-text markers
    // below still apply.
    let doc = Document::parse(diagnostic).ok();

    let error_text = doc
        .as_ref()
        .and_then(|d| message_texts(d, "error").into_iter().next())
        .unwrap_or_default();

    // zypper escapes the newline before the reason line; restore the first
    // occurrence so the bracket scan sees the real line structure.
    let lines = error_text.replacen("\\n", "\n", 1);
    let repos: Vec<String> = BRACKET_TOKEN
        .captures_iter(&lines)
        .map(|c| c[1].to_string())
        .collect();

    if error_text.contains(INVALID_MARKER) {
        if let Some(reason) = REASON_LINE.captures(&error_text) {
            return RefreshError::Invalid {
                reason: reason[1].to_string(),
                repos,
            };
        }
    }

    if diagnostic.contains(UNTRUSTED_KEY_MARKER) {
        let repos = doc
            .as_ref()
            .map(|d| {
                message_texts(d, "error")
                    .into_iter()
                    .filter(|text| text.contains(SKIPPED_MARKER))
                    .filter_map(|text| QUOTED_NAME.captures(&text).map(|c| c[1].to_string()))
                    .collect()
            })
            .unwrap_or_default();

        return RefreshError::Untrusted { repos };
    }

    if diagnostic.contains(LOCK_MARKER) {
        let message = doc
            .as_ref()
            .and_then(|d| message_texts(d, "info").into_iter().next())
            .unwrap_or_default();

        return RefreshError::Locked { message };
    }

    RefreshError::Unknown
}

/// Texts of all `<message>` elements whose `type` attribute contains `kind`,
/// in document order.
fn message_texts(doc: &Document, kind: &str) -> Vec<String> {
    doc.descendants()
        .filter(|node| {
            node.has_tag_name("message")
                && node.attribute("type").is_some_and(|t| t.contains(kind))
        })
        .map(|node| node.text().unwrap_or_default().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream(messages: &str) -> String {
        format!(r#"<?xml version='1.0'?><stream>{}</stream>"#, messages)
    }

    #[test]
    fn classifies_invalid_metadata_with_repos_and_reason() {
        let text = stream(
            "<message type=\"error\">Repository 'Main' is invalid.\\n\
             [Main|http://example.org/main] Valid metadata not found at specified URL\n\
             Error message: Download (curl) error for 'http://example.org/main/repodata/repomd.xml'</message>",
        );

        let result = classify(&text);
        assert_eq!(
            result,
            RefreshError::Invalid {
                reason: "Download (curl) error for 'http://example.org/main/repodata/repomd.xml'"
                    .to_string(),
                repos: vec!["Main".to_string()],
            }
        );
    }

    #[test]
    fn invalid_collects_every_bracket_token_in_order() {
        let text = stream(
            "<message type=\"error\">Repository 'alpha' is invalid.\\n\
             [alpha|http://a.example] broken\n\
             [beta|http://b.example] broken\n\
             Error message: Valid metadata not found</message>",
        );

        match classify(&text) {
            RefreshError::Invalid { repos, reason } => {
                assert_eq!(repos, vec!["alpha".to_string(), "beta".to_string()]);
                assert_eq!(reason, "Valid metadata not found");
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn invalid_without_reason_line_is_not_invalid() {
        let text = stream("<message type=\"error\">Repository 'Main' is invalid.</message>");
        assert_eq!(classify(&text), RefreshError::Unknown);
    }

    #[test]
    fn classifies_untrusted_keys_with_skipped_repos() {
        let text = stream(
            "<message type=\"info\">New repository or package signing key received:</message>\
             <message type=\"error\">Skipping repository 'repoA' because of the above error.</message>\
             <message type=\"error\">Skipping repository 'repoB' because of the above error.</message>",
        );

        assert_eq!(
            classify(&text),
            RefreshError::Untrusted {
                repos: vec!["repoA".to_string(), "repoB".to_string()],
            }
        );
    }

    #[test]
    fn untrusted_with_no_extractable_names_still_classifies() {
        let text = stream(
            "<message type=\"info\">New repository or package signing key received:</message>\
             <message type=\"error\">Some repositories could not be refreshed.</message>",
        );

        assert_eq!(classify(&text), RefreshError::Untrusted { repos: vec![] });
    }

    #[test]
    fn classifies_lock_contention_with_info_message() {
        let text = stream(
            "<message type=\"info\">Zypper is locked.</message>\
             <message type=\"error\">A process with pid 4211 is blocking zypper.</message>",
        );

        assert_eq!(
            classify(&text),
            RefreshError::Locked {
                message: "Zypper is locked.".to_string(),
            }
        );
    }

    #[test]
    fn lock_without_info_message_yields_empty_detail() {
        let text =
            stream("<message type=\"error\">A process with pid 4211 is blocking zypper.</message>");

        assert_eq!(
            classify(&text),
            RefreshError::Locked {
                message: String::new(),
            }
        );
    }

    #[test]
    fn unrelated_text_is_unknown() {
        assert_eq!(classify("connection refused"), RefreshError::Unknown);
    }

    #[test]
    fn non_xml_input_with_untrusted_marker_still_matches() {
        let result = classify("New repository or package signing key received");
        assert_eq!(result, RefreshError::Untrusted { repos: vec![] });
    }

    #[test]
    fn invalid_takes_precedence_over_untrusted_marker() {
        let text = stream(
            "<message type=\"error\">Repository 'Main' is invalid.\\n\
             [Main|http://example.org/main] bad\n\
             Error message: New repository or package signing key received</message>",
        );

        assert!(matches!(classify(&text), RefreshError::Invalid { .. }));
    }

    #[test]
    fn classification_is_idempotent() {
        let text = stream(
            "<message type=\"info\">Zypper is locked.</message>\
             <message type=\"error\">pid 99 is blocking zypper.</message>",
        );

        assert_eq!(classify(&text), classify(&text));
    }

    #[test]
    fn duplicate_repo_names_are_kept() {
        let text = stream(
            "<message type=\"error\">Repository 'Main' is invalid.\\n\
             [Main|http://a.example] bad\n\
             [Main|http://b.example] bad\n\
             Error message: unreachable</message>",
        );

        match classify(&text) {
            RefreshError::Invalid { repos, .. } => {
                assert_eq!(repos, vec!["Main".to_string(), "Main".to_string()]);
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
    }
}
