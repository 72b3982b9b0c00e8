use std::fmt;

const WILDCARD: char = '*';
const END_ANCHOR: char = '$';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Polarity {
    Allow,
    Disallow,
}

impl Polarity {
    pub fn is_allowed(self) -> bool {
        matches!(self, Polarity::Allow)
    }
}

impl fmt::Display for Polarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Polarity::Allow => f.write_str("Allow"),
            Polarity::Disallow => f.write_str("Disallow"),
        }
    }
}

/// One `Allow`/`Disallow` path pattern, compiled for matching.
///
/// The pattern is split on `*` into literal spans. A trailing `$` anchors the
/// final span to the end of the candidate. Specificity is the number of
/// literal bytes, so `/*.php$` ranks as 5.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternRule {
    pattern: String,
    polarity: Polarity,
    literals: Vec<String>,
    anchored_end: bool,
    specificity: usize,
}

impl PatternRule {
    /// Compiles `pattern` as given. Callers normalize it beforehand.
    pub fn new(pattern: impl Into<String>, polarity: Polarity) -> Self {
        let pattern = pattern.into();
        let (body, anchored_end) = match pattern.strip_suffix(END_ANCHOR) {
            Some(body) => (body, true),
            None => (pattern.as_str(), false),
        };
        let literals: Vec<String> = body.split(WILDCARD).map(str::to_owned).collect();
        let specificity = literals.iter().map(String::len).sum();
        Self {
            pattern,
            polarity,
            literals,
            anchored_end,
            specificity,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn polarity(&self) -> Polarity {
        self.polarity
    }

    pub fn allowed(&self) -> bool {
        self.polarity.is_allowed()
    }

    pub fn specificity(&self) -> usize {
        self.specificity
    }

    pub fn is_anchored(&self) -> bool {
        self.anchored_end
    }

    /// Returns true if `path` is covered by this rule. Byte-exact and case-sensitive.
    pub fn matches(&self, path: &str) -> bool {
        let Some((first, rest)) = self.literals.split_first() else {
            return true;
        };
        let Some(remainder) = path.strip_prefix(first.as_str()) else {
            return false;
        };
        let Some((last, middle)) = rest.split_last() else {
            // No wildcard: plain prefix, or exact match when anchored.
            return !self.anchored_end || remainder.is_empty();
        };

        let mut cursor = path.len() - remainder.len();
        for literal in middle {
            match path[cursor..].find(literal.as_str()) {
                Some(offset) => cursor += offset + literal.len(),
                None => return false,
            }
        }

        if self.anchored_end {
            path.len() - cursor >= last.len() && path.ends_with(last.as_str())
        } else {
            path[cursor..].contains(last.as_str())
        }
    }
}

impl fmt::Display for PatternRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.polarity, self.pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn allow(pattern: &str) -> PatternRule {
        PatternRule::new(pattern, Polarity::Allow)
    }

    fn assert_matches(pattern: &str, examples: &[&str], antiexamples: &[&str]) {
        let rule = allow(pattern);
        for example in examples {
            assert!(rule.matches(example), "{example} didn't match {pattern}");
        }
        for example in antiexamples {
            assert!(!rule.matches(example), "{example} matched {pattern}");
        }
    }

    #[test]
    fn plain_prefix() {
        assert_matches("/tmp", &["/tmp", "/tmp.html", "/tmp/a.html"], &["/tm", "/Tmp"]);
    }

    #[test]
    fn directory_prefix() {
        assert_matches("/tmp/", &["/tmp/", "/tmp/a.html"], &["/tmp"]);
    }

    #[test]
    fn root_and_star_match_everything() {
        let examples = [
            "/",
            "/fish",
            "/fish.html",
            "/fish/salmon.html",
            "/fishheads",
            "/fishheads/yummy.html",
            "/fish.php?id=anything",
        ];
        assert_matches("/", &examples, &[]);
        assert_matches("/*", &examples, &[]);
    }

    #[test]
    fn trailing_wildcard_is_a_prefix() {
        assert_matches(
            "/fish*",
            &[
                "/fish",
                "/fish.html",
                "/fish/salmon.html",
                "/fishheads/yummy.html",
                "/fish.php?id=anything",
            ],
            &["/Fish.asp", "/catfish", "/?id=fish"],
        );
    }

    #[test]
    fn middle_wildcard() {
        assert_matches(
            "/test*foo",
            &["/testfoo", "/testafoo", "/testaasdffoo", "/test/foo"],
            &["/testfo", "/estfoo"],
        );
        assert_matches(
            "/hello/*/are/you",
            &[
                "/hello/how/are/you",
                "/hello/how/are/you/today",
                "/hello/how/are/yo/are/you",
            ],
            &["/hello/", "/hi/how/are/you"],
        );
    }

    #[test]
    fn several_wildcards() {
        assert_matches(
            "/this-*-is-a-*-test",
            &[
                "/this-test-is-a-simple-test",
                "/this-test-is-another-test-is-a-tricky-test",
            ],
            &["/this-test-is-a-mislead"],
        );
    }

    #[test]
    fn wildcard_extension() {
        assert_matches(
            "/*.php",
            &[
                "/filename.php",
                "/folder/filename.php",
                "/folder/filename.php?parameters",
                "/folder/any.php.file.html",
                "/filename.php/",
            ],
            &["/", "/windows.PHP"],
        );
        assert_matches(
            "/fish*.php",
            &["/fish.php", "/fishheads/catfish.php?parameters"],
            &["/Fish.PHP"],
        );
    }

    #[test]
    fn end_anchor() {
        assert_matches(
            "/*.php$",
            &["/filename.php", "/folder/filename.php"],
            &[
                "/filename.php?parameters",
                "/filename.php/",
                "/filename.php5",
                "/windows.PHP",
            ],
        );
        assert_matches("/exact$", &["/exact"], &["/exact/", "/exactly", "/exac"]);
    }

    #[test]
    fn anchor_does_not_overlap_earlier_span() {
        // "/ab" must not be reused to satisfy the anchored "b".
        assert_matches("/ab*b$", &["/abb", "/abxb"], &["/ab"]);
    }

    #[test]
    fn consecutive_wildcards_degrade_gracefully() {
        assert_matches("/a**b", &["/ab", "/a/x/b"], &["/b"]);
        assert_matches("*", &["", "/anything"], &[]);
    }

    #[test]
    fn specificity_counts_literal_bytes() {
        assert_eq!(allow("/path/exception").specificity(), 15);
        assert_eq!(allow("/*.php$").specificity(), 5);
        assert_eq!(allow("/path/*/with/**/wildcards/*").specificity(), 23);
        assert_eq!(allow("").specificity(), 0);
        assert!(allow("/*.php$").is_anchored());
    }

    #[test]
    fn display() {
        assert_eq!(allow("/foo").to_string(), "Allow: /foo");
        assert_eq!(
            PatternRule::new("/bar", Polarity::Disallow).to_string(),
            "Disallow: /bar"
        );
    }
}
