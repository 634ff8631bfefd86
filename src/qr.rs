//! QR payload construction.
//!
//! The engine only ever supplies the *string* a QR glyph encodes; glyph
//! geometry comes from the composer and rasterization is the backend's
//! job. Two payload shapes exist: a plain template ("REF-{REF}"), whose
//! substituted values are inserted as-is, and a URL whose query-parameter
//! values are percent-encoded.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};

use crate::template::{expand_line, Bindings};

/// Query-parameter escaping: everything but the RFC 3986 unreserved set.
/// Space encodes as %20, non-ASCII byte-wise.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// The fixed payload template for a generation run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum QrPayload {
    /// Literal template; placeholder values are inserted unescaped.
    Plain { template: String },
    /// `base` plus a query string. Each param value is itself a template;
    /// its expansion is percent-encoded before insertion.
    Url {
        base: String,
        params: Vec<(String, String)>,
    },
}

impl Default for QrPayload {
    fn default() -> Self {
        QrPayload::Plain {
            template: "REF-{REF}".to_string(),
        }
    }
}

/// Build the payload string for one label.
pub fn build_payload(payload: &QrPayload, bindings: &Bindings) -> String {
    match payload {
        QrPayload::Plain { template } => expand_line(template, bindings),
        QrPayload::Url { base, params } => {
            let mut out = base.clone();
            for (i, (name, value)) in params.iter().enumerate() {
                let sep = if i == 0 && !base.contains('?') { '?' } else { '&' };
                out.push(sep);
                out.push_str(&utf8_percent_encode(name, QUERY_VALUE).to_string());
                out.push('=');
                let expanded = expand_line(value, bindings);
                out.push_str(&utf8_percent_encode(&expanded, QUERY_VALUE).to_string());
            }
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bindings(pairs: &[(&str, &str)]) -> Bindings {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_default_plain_payload() {
        let b = bindings(&[("REF", "JB-0001")]);
        assert_eq!(build_payload(&QrPayload::default(), &b), "REF-JB-0001");
    }

    #[test]
    fn test_plain_values_not_escaped() {
        let b = bindings(&[("REF", "A B/C")]);
        let p = QrPayload::Plain {
            template: "{REF}".to_string(),
        };
        assert_eq!(build_payload(&p, &b), "A B/C");
    }

    #[test]
    fn test_url_space_encodes_as_percent_20() {
        let b = bindings(&[("REF", "A B")]);
        let p = QrPayload::Url {
            base: "https://example.com/scan".to_string(),
            params: vec![("ref".to_string(), "{REF}".to_string())],
        };
        assert_eq!(
            build_payload(&p, &b),
            "https://example.com/scan?ref=A%20B"
        );
    }

    #[test]
    fn test_url_reserved_and_non_ascii() {
        let b = bindings(&[("REF", "a&b=ñ")]);
        let p = QrPayload::Url {
            base: "https://example.com".to_string(),
            params: vec![("r".to_string(), "{REF}".to_string())],
        };
        assert_eq!(
            build_payload(&p, &b),
            "https://example.com?r=a%26b%3D%C3%B1"
        );
    }

    #[test]
    fn test_url_multiple_params_and_existing_query() {
        let b = bindings(&[("REF", "X1"), ("LOT", "7")]);
        let p = QrPayload::Url {
            base: "https://example.com/scan?v=2".to_string(),
            params: vec![
                ("ref".to_string(), "{REF}".to_string()),
                ("lot".to_string(), "{LOT}".to_string()),
            ],
        };
        assert_eq!(
            build_payload(&p, &b),
            "https://example.com/scan?v=2&ref=X1&lot=7"
        );
    }

    #[test]
    fn test_payload_deserializes_from_json() {
        let p: QrPayload =
            serde_json::from_str(r#"{"type": "plain", "template": "REF-{REF}"}"#).unwrap();
        assert_eq!(p, QrPayload::default());

        let p: QrPayload = serde_json::from_str(
            r#"{"type": "url", "base": "https://x.y", "params": [["ref", "{REF}"]]}"#,
        )
        .unwrap();
        assert!(matches!(p, QrPayload::Url { .. }));
    }
}
