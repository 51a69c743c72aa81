//! Purpose: Extract the type fragment from opaque global identifiers.
//! Exports: `GidPattern`, `DEFAULT_GID_PATTERN`.
//! Role: Discriminator fallback when a payload carries no explicit type field.
//! Invariants: A pattern has exactly one capture group; checked once at construction.
//! Invariants: An identifier must match exactly once, otherwise it is malformed.

use std::sync::LazyLock;

use regex::Regex;

use crate::core::error::{Error, ErrorKind};

pub const DEFAULT_GID_PATTERN: &str = r"^gid://shopify/(\w+)/\d+$";

static DEFAULT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(DEFAULT_GID_PATTERN).expect("default gid pattern compiles"));

#[derive(Clone, Debug)]
pub struct GidPattern {
    regex: Regex,
}

impl GidPattern {
    pub fn new(pattern: &str) -> Result<Self, Error> {
        let regex = Regex::new(pattern).map_err(|err| {
            Error::new(ErrorKind::Usage)
                .with_message(format!("invalid gid pattern `{pattern}`"))
                .with_source(err)
        })?;
        // captures_len counts the implicit whole-match group.
        let groups = regex.captures_len() - 1;
        if groups != 1 {
            return Err(Error::new(ErrorKind::Usage)
                .with_message(format!(
                    "gid pattern `{pattern}` has {groups} capture groups, expected exactly 1"
                ))
                .with_hint("Wrap the type fragment in a single group, e.g. gid://app/(\\w+)/\\d+"));
        }
        Ok(Self { regex })
    }

    pub fn as_str(&self) -> &str {
        self.regex.as_str()
    }

    pub fn type_fragment<'a>(&self, gid: &'a str) -> Result<&'a str, Error> {
        let mut matches = self.regex.captures_iter(gid);
        let fragment = match (matches.next(), matches.next()) {
            (Some(captures), None) => captures.get(1).map(|group| group.as_str()),
            _ => None,
        };
        fragment.ok_or_else(|| {
            Error::new(ErrorKind::MalformedIdentifier)
                .with_message(format!("malformed gid `{gid}`"))
                .with_hint(format!("expected a match for `{}`", self.regex.as_str()))
        })
    }
}

impl Default for GidPattern {
    fn default() -> Self {
        Self {
            regex: DEFAULT_REGEX.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_GID_PATTERN, GidPattern};
    use crate::core::error::ErrorKind;

    #[test]
    fn default_pattern_extracts_type() {
        let pattern = GidPattern::default();
        assert_eq!(pattern.as_str(), DEFAULT_GID_PATTERN);
        assert_eq!(
            pattern.type_fragment("gid://shopify/Video/123").expect("fragment"),
            "Video"
        );
        assert_eq!(
            pattern
                .type_fragment("gid://shopify/MediaImage/9")
                .expect("fragment"),
            "MediaImage"
        );
    }

    #[test]
    fn extraction_is_deterministic() {
        let pattern = GidPattern::new(r"gid://app/(\w+)/\d+").expect("pattern");
        for gid in ["gid://app/Video/1", "gid://app/Model3d/42", "gid://app/X/0"] {
            let first = pattern.type_fragment(gid).expect("first");
            let second = pattern.type_fragment(gid).expect("second");
            assert_eq!(first, second);
        }
    }

    #[test]
    fn malformed_identifiers_fail() {
        let pattern = GidPattern::default();
        for gid in [
            "",
            "Video/123",
            "gid://shopify/Video/",
            "gid://shopify/Video/abc",
            "gid://other/Video/1",
        ] {
            let err = pattern.type_fragment(gid).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::MalformedIdentifier, "gid {gid:?}");
        }
    }

    #[test]
    fn repeated_matches_are_malformed() {
        let pattern = GidPattern::new(r"gid://app/(\w+)/\d+").expect("pattern");
        let err = pattern
            .type_fragment("gid://app/Video/1 gid://app/Image/2")
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedIdentifier);
    }

    #[test]
    fn pattern_must_have_one_group() {
        for pattern in [r"gid://app/\w+/\d+", r"gid://app/(\w+)/(\d+)"] {
            let err = GidPattern::new(pattern).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Usage, "pattern {pattern}");
        }
        let err = GidPattern::new("gid://app/(").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
    }
}
