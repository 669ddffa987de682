use serde::{Deserialize, Serialize};

/// Message returned to the caller when the assistant's reply is not the JSON
/// it was instructed to produce.
pub const INVALID_RESPONSE: &str = "Invalid response format from assistant";

/// A structured reference to one source article used in the summary.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub intext_citation: String,
    pub article_name: String,
    pub link: String,
}

/// The summary contract the assistant is instructed to emit.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Summary {
    pub summary: String,
    pub citations: Vec<Citation>,
}

/// What one orchestration cycle hands back to the boundary: either the
/// decoded summary, or the error marker for a reply that was not valid JSON.
/// Both serialize to the exact object the HTTP caller receives.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SummaryOutcome {
    Report(Summary),
    Invalid { error: String },
}

impl SummaryOutcome {
    /// Strictly decode the assistant's final message text. Malformed output
    /// is recovered into the error marker; the raw text is kept in the log
    /// for diagnostics.
    pub fn from_reply(text: &str) -> Self {
        match serde_json::from_str::<Summary>(text.trim()) {
            Ok(summary) => SummaryOutcome::Report(summary),
            Err(err) => {
                tracing::warn!(raw = %text, "assistant reply is not valid summary JSON: {}", err);
                SummaryOutcome::Invalid {
                    error: INVALID_RESPONSE.to_string(),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_citation_uses_camel_case_keys() {
        let citation = Citation {
            intext_citation: "BBC".to_string(),
            article_name: "Title of article".to_string(),
            link: "https://example.com/article".to_string(),
        };

        let value = serde_json::to_value(&citation).unwrap();
        assert_eq!(
            value,
            json!({
                "intextCitation": "BBC",
                "articleName": "Title of article",
                "link": "https://example.com/article"
            })
        );
    }

    #[test]
    fn test_no_news_fallback_round_trips() {
        let outcome =
            SummaryOutcome::from_reply(r#"{"summary":"No relevant news found.","citations":[]}"#);
        assert_eq!(
            outcome,
            SummaryOutcome::Report(Summary {
                summary: "No relevant news found.".to_string(),
                citations: vec![],
            })
        );
    }

    #[test]
    fn test_malformed_reply_becomes_error_marker() {
        let outcome = SummaryOutcome::from_reply("not json");
        assert_eq!(
            outcome,
            SummaryOutcome::Invalid {
                error: INVALID_RESPONSE.to_string(),
            }
        );
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"error": "Invalid response format from assistant"})
        );
    }

    #[test]
    fn test_reply_with_surrounding_whitespace_decodes() {
        let outcome = SummaryOutcome::from_reply(
            "\n  {\"summary\":\"s\",\"citations\":[{\"intextCitation\":\"BBC\",\"articleName\":\"a\",\"link\":\"l\"}]}  ",
        );
        match outcome {
            SummaryOutcome::Report(summary) => {
                assert_eq!(summary.citations.len(), 1);
                assert_eq!(summary.citations[0].intext_citation, "BBC");
            }
            other => panic!("expected report, got {:?}", other),
        }
    }
}
