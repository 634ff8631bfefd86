//! Template line expansion.
//!
//! Label text is an ordered list of lines containing `{NAME}` placeholders.
//! Expansion substitutes each placeholder from a bindings map in a single
//! left-to-right pass: substituted values are never re-scanned, so a value
//! containing "{REF}" lands literally. Placeholders with no binding are
//! left verbatim: user-authored templates may reference fields that are
//! not wired up, and that must not fail a run.

use std::collections::BTreeMap;

/// Placeholder-name → value mapping for one label.
pub type Bindings = BTreeMap<String, String>;

/// Expand every template line against `bindings`.
///
/// Lines that are blank after trimming are dropped; the remaining order is
/// preserved.
pub fn expand(lines: &[String], bindings: &Bindings) -> Vec<String> {
    lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| expand_line(line, bindings))
        .collect()
}

/// Expand one line. Single pass, case-sensitive, non-recursive.
pub fn expand_line(line: &str, bindings: &Bindings) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        match rest[open..].find('}') {
            Some(close) => {
                let name = &rest[open + 1..open + close];
                match bindings.get(name) {
                    Some(value) => out.push_str(value),
                    None => out.push_str(&rest[open..=open + close]),
                }
                rest = &rest[open + close + 1..];
            }
            // Unterminated brace: the remainder is literal text.
            None => {
                out.push_str(&rest[open..]);
                return out;
            }
        }
    }
    out.push_str(rest);
    out
}

/// Placeholder names referenced by `lines` but missing from `bindings`.
///
/// Lets the composer warn once per name per run instead of once per label.
pub fn unbound_placeholders(lines: &[String], bindings: &Bindings) -> Vec<String> {
    let mut missing: Vec<String> = Vec::new();
    for line in lines {
        let mut rest = line.as_str();
        while let Some(open) = rest.find('{') {
            match rest[open..].find('}') {
                Some(close) => {
                    let name = &rest[open + 1..open + close];
                    if !name.is_empty()
                        && !bindings.contains_key(name)
                        && !missing.iter().any(|m| m == name)
                    {
                        missing.push(name.to_string());
                    }
                    rest = &rest[open + close + 1..];
                }
                None => break,
            }
        }
    }
    missing
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
    fn test_simple_substitution() {
        let b = bindings(&[("REF", "JB-0001")]);
        assert_eq!(expand_line("REF: {REF}", &b), "REF: JB-0001");
    }

    #[test]
    fn test_multiple_placeholders_one_line() {
        let b = bindings(&[("REF", "A1"), ("LOT", "L9")]);
        assert_eq!(expand_line("{REF}/{LOT}/{REF}", &b), "A1/L9/A1");
    }

    #[test]
    fn test_unknown_placeholder_left_verbatim() {
        let b = bindings(&[("REF", "A1")]);
        assert_eq!(expand_line("{REF} {BATCH}", &b), "A1 {BATCH}");
    }

    #[test]
    fn test_not_recursive() {
        // A value containing a placeholder form must not be re-expanded.
        let b = bindings(&[("REF", "{REF}"), ("X", "see {REF}")]);
        assert_eq!(expand_line("{X}", &b), "see {REF}");
    }

    #[test]
    fn test_unterminated_brace_is_literal() {
        let b = bindings(&[("REF", "A1")]);
        assert_eq!(expand_line("start {REF", &b), "start {REF");
    }

    #[test]
    fn test_blank_lines_dropped() {
        let lines = vec![
            "first".to_string(),
            "   ".to_string(),
            String::new(),
            "last".to_string(),
        ];
        let out = expand(&lines, &Bindings::new());
        assert_eq!(out, vec!["first", "last"]);
    }

    #[test]
    fn test_unbound_placeholders_deduplicated() {
        let lines = vec![
            "{REF} {BATCH}".to_string(),
            "{BATCH} {LOT}".to_string(),
        ];
        let b = bindings(&[("REF", "A1")]);
        assert_eq!(unbound_placeholders(&lines, &b), vec!["BATCH", "LOT"]);
    }

    #[test]
    fn test_empty_braces_pass_through() {
        let b = Bindings::new();
        assert_eq!(expand_line("a {} b", &b), "a {} b");
        assert!(unbound_placeholders(&["{}".to_string()], &b).is_empty());
    }
}
