//! Context assembly from retrieved articles

use crate::models::RetrievedPoint;

/// Sentinel context used when retrieval returns nothing. It is fed into the
/// prompt as-is, not treated as an error.
pub const NO_RESULTS_CONTEXT: &str = "No relevant articles found.";

const SECTION_DELIMITER: &str = "\n\n---\n\n";

/// Assemble the grounding context: one `### title` section per point, in
/// provider order
pub fn build_context(points: &[RetrievedPoint]) -> String {
    if points.is_empty() {
        return NO_RESULTS_CONTEXT.to_string();
    }

    points
        .iter()
        .enumerate()
        .map(|(idx, point)| {
            let payload = &point.payload;
            let title = field(payload, "title")
                .or_else(|| field(payload, "headline"))
                .unwrap_or_else(|| format!("Article {}", idx + 1));
            let text = field(payload, "text")
                .or_else(|| field(payload, "content"))
                .or_else(|| field(payload, "body"))
                .unwrap_or_else(|| {
                    serde_json::to_string_pretty(payload).unwrap_or_default()
                });
            format!("### {title}\n{text}")
        })
        .collect::<Vec<_>>()
        .join(SECTION_DELIMITER)
}

fn field(payload: &serde_json::Value, key: &str) -> Option<String> {
    payload.get(key)?.as_str().map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn point(payload: serde_json::Value) -> RetrievedPoint {
        RetrievedPoint {
            id: json!(1),
            score: 0.9,
            payload,
        }
    }

    #[test]
    fn empty_retrieval_yields_sentinel() {
        assert_eq!(build_context(&[]), NO_RESULTS_CONTEXT);
    }

    #[test]
    fn sections_joined_with_delimiter_in_order() {
        let points = vec![
            point(json!({"title": "First", "text": "one"})),
            point(json!({"title": "Second", "text": "two"})),
        ];
        assert_eq!(
            build_context(&points),
            "### First\none\n\n---\n\n### Second\ntwo"
        );
    }

    #[test]
    fn title_falls_back_to_headline_then_index() {
        let points = vec![
            point(json!({"headline": "Breaking", "text": "x"})),
            point(json!({"text": "y"})),
        ];
        let context = build_context(&points);
        assert!(context.contains("### Breaking\nx"));
        assert!(context.contains("### Article 2\ny"));
    }

    #[test]
    fn text_falls_back_through_content_and_body() {
        let points = vec![
            point(json!({"title": "A", "content": "from content"})),
            point(json!({"title": "B", "body": "from body"})),
        ];
        let context = build_context(&points);
        assert!(context.contains("### A\nfrom content"));
        assert!(context.contains("### B\nfrom body"));
    }

    #[test]
    fn missing_text_fields_fall_back_to_payload_json() {
        let points = vec![point(json!({"title": "Odd", "source": "wire"}))];
        let context = build_context(&points);
        assert!(context.starts_with("### Odd\n"));
        assert!(context.contains("\"source\": \"wire\""));
    }
}
