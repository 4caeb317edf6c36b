//! Property path parsing and template matching.
//!
//! Paths address locations in a JSON configuration tree using two token
//! kinds: object-key segments separated by ':' and array indices written
//! as "[N]" attached directly to the preceding token, e.g.
//! "Fields:Field1[0]:Name". Template paths replace indices with the
//! wildcard "[*]".
//!
//! Matching compares token sequences instead of building regexes, which
//! keeps it auditable and free of escaping bugs.

/// A single token in a property path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathToken {
    /// An object-key segment, rendered as ":Key" (no colon before the first).
    Segment(String),
    /// An array position, rendered as "[N]".
    Index(usize),
    /// The template wildcard "[*]", standing in for any single index.
    Wildcard,
}

/// Split a path string into tokens.
///
/// Never fails: an unterminated or non-numeric bracket is folded into the
/// surrounding segment text, so malformed input only ever matches itself.
pub fn tokenize(path: &str) -> Vec<PathToken> {
    let mut tokens = Vec::new();
    let mut cur = String::new();
    // Set after an index/wildcard token; the empty chunk between "]" and
    // ":" is not a segment.
    let mut after_index = false;
    let mut pos = 0;

    while pos < path.len() {
        match path.as_bytes()[pos] {
            b':' => {
                if !(after_index && cur.is_empty()) {
                    tokens.push(PathToken::Segment(std::mem::take(&mut cur)));
                }
                after_index = false;
                pos += 1;
            }
            b'[' => {
                let parsed = path[pos + 1..].find(']').and_then(|offset| {
                    let end = pos + 1 + offset;
                    let inner = &path[pos + 1..end];
                    if inner == "*" {
                        Some((PathToken::Wildcard, end))
                    } else {
                        inner.parse::<usize>().ok().map(|n| (PathToken::Index(n), end))
                    }
                });
                match parsed {
                    Some((token, end)) => {
                        if !cur.is_empty() {
                            tokens.push(PathToken::Segment(std::mem::take(&mut cur)));
                        }
                        tokens.push(token);
                        after_index = true;
                        pos = end + 1;
                    }
                    None => {
                        cur.push('[');
                        after_index = false;
                        pos += 1;
                    }
                }
            }
            _ => {
                let c = path[pos..].chars().next().unwrap_or('\u{fffd}');
                cur.push(c);
                after_index = false;
                pos += c.len_utf8();
            }
        }
    }

    if !cur.is_empty() {
        tokens.push(PathToken::Segment(cur));
    } else if !after_index && path.ends_with(':') {
        tokens.push(PathToken::Segment(String::new()));
    }

    tokens
}

/// Render a token sequence back into path-string form.
pub fn render(tokens: &[PathToken]) -> String {
    let mut out = String::new();
    for (i, token) in tokens.iter().enumerate() {
        match token {
            PathToken::Segment(name) => {
                if i > 0 {
                    out.push(':');
                }
                out.push_str(name);
            }
            PathToken::Index(n) => {
                out.push_str(&format!("[{n}]"));
            }
            PathToken::Wildcard => out.push_str("[*]"),
        }
    }
    out
}

/// True iff the path contains at least one numeric "[N]" token.
pub fn has_array_index(path: &str) -> bool {
    tokenize(path)
        .iter()
        .any(|t| matches!(t, PathToken::Index(_)))
}

/// Replace every "[N]" with the wildcard "[*]", leaving segments untouched.
///
/// Pure string rewrite; performs no tree lookup. Idempotent.
pub fn normalize_to_template_path(path: &str) -> String {
    let tokens: Vec<PathToken> = tokenize(path)
        .into_iter()
        .map(|t| match t {
            PathToken::Index(_) => PathToken::Wildcard,
            other => other,
        })
        .collect();
    render(&tokens)
}

/// Number of wildcard tokens in a path.
pub fn wildcard_count(path: &str) -> usize {
    tokenize(path)
        .iter()
        .filter(|t| matches!(t, PathToken::Wildcard))
        .count()
}

/// Check whether a concrete path is obtainable from a template path by
/// substituting each "[*]" with some "[N]".
///
/// Full match only; a template is never a prefix match for a longer path.
pub fn matches_template_path(concrete_path: &str, template_path: &str) -> bool {
    let concrete = tokenize(concrete_path);
    let template = tokenize(template_path);

    if concrete.len() != template.len() {
        return false;
    }

    concrete
        .iter()
        .zip(template.iter())
        .all(|(c, t)| match (c, t) {
            (PathToken::Segment(a), PathToken::Segment(b)) => a == b,
            (PathToken::Index(a), PathToken::Index(b)) => a == b,
            (PathToken::Index(_), PathToken::Wildcard) => true,
            (PathToken::Wildcard, PathToken::Wildcard) => true,
            _ => false,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tokenize_segments_and_indices() {
        assert_eq!(
            tokenize("Fields:Field1[0]:Name"),
            vec![
                PathToken::Segment("Fields".to_string()),
                PathToken::Segment("Field1".to_string()),
                PathToken::Index(0),
                PathToken::Segment("Name".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_adjacent_indices() {
        assert_eq!(
            tokenize("Fields[0][3]:Name"),
            vec![
                PathToken::Segment("Fields".to_string()),
                PathToken::Index(0),
                PathToken::Index(3),
                PathToken::Segment("Name".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_wildcard() {
        assert_eq!(
            tokenize("Users[*]:Name"),
            vec![
                PathToken::Segment("Users".to_string()),
                PathToken::Wildcard,
                PathToken::Segment("Name".to_string()),
            ]
        );
    }

    #[test]
    fn test_tokenize_malformed_bracket_is_literal() {
        // Unterminated bracket stays part of the segment text.
        assert_eq!(
            tokenize("A[x:B"),
            vec![
                PathToken::Segment("A[x".to_string()),
                PathToken::Segment("B".to_string()),
            ]
        );
    }

    #[test]
    fn test_render_round_trip() {
        for path in [
            "SystemUsers[0]:Id",
            "Fields[0][0]:Name",
            "AppSettings:Fields[*]:Contents:Map",
            "Single",
        ] {
            assert_eq!(render(&tokenize(path)), path);
        }
    }

    #[test]
    fn test_has_array_index() {
        assert!(has_array_index("Users[5]:Name"));
        assert!(!has_array_index("Users:Name"));
        // A wildcard is not a numeric index.
        assert!(!has_array_index("Users[*]:Name"));
    }

    #[test]
    fn test_normalize_to_template_path() {
        assert_eq!(
            normalize_to_template_path("SystemUsers[0]:Id"),
            "SystemUsers[*]:Id"
        );
        assert_eq!(
            normalize_to_template_path("Fields[0][3]:Name"),
            "Fields[*][*]:Name"
        );
    }

    #[test]
    fn test_normalize_to_template_path_idempotent() {
        let once = normalize_to_template_path("A[1]:B[2]:C");
        assert_eq!(normalize_to_template_path(&once), once);
    }

    #[test]
    fn test_normalize_without_index_is_identity() {
        assert_eq!(normalize_to_template_path("Users:Name"), "Users:Name");
    }

    #[test]
    fn test_matches_template_path() {
        assert!(matches_template_path("Users[5]:Name", "Users[*]:Name"));
        assert!(!matches_template_path("Other[0]:Name", "Users[*]:Name"));
        assert!(matches_template_path("Users[5]:Name", "Users[5]:Name"));
        assert!(!matches_template_path("Users[5]:Name", "Users[4]:Name"));
    }

    #[test]
    fn test_matches_no_partial_match() {
        assert!(!matches_template_path("Users[5]:Name:First", "Users[*]:Name"));
        assert!(!matches_template_path("Users[5]", "Users[*]:Name"));
    }

    #[test]
    fn test_path_matches_its_own_template() {
        for path in ["Users[5]:Name", "A[0][1]:B", "Plain:Path", "Users[*]:Name"] {
            assert!(matches_template_path(path, &normalize_to_template_path(path)));
        }
    }

    #[test]
    fn test_wildcard_count() {
        assert_eq!(wildcard_count("Users[*]:Roles[*]"), 2);
        assert_eq!(wildcard_count("Users[0]:Name"), 0);
    }
}
