//! Patterns to wait for and the result of a successful wait.

use crate::error::Error;
use regex::bytes::Regex;

/// A compiled pattern the child program's output is searched for.
///
/// Patterns are regular expressions matched against the raw output
/// bytes, so they may span line breaks and match carriage returns
/// verbatim. Capture groups are carried into the [`MatchResult`].
#[derive(Debug, Clone)]
pub struct Pattern {
    source: String,
    regex: Regex,
}

impl Pattern {
    /// Compile a pattern from a regular expression source.
    pub fn new(source: impl Into<String>) -> Result<Self, Error> {
        let source = source.into();
        let regex = Regex::new(&source)
            .map_err(|_| Error::RegexParsing(source.clone()))?;
        Ok(Self { source, regex })
    }

    /// The source this pattern was compiled from.
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether the pattern matches anywhere in the text.
    pub fn is_match(&self, text: &str) -> bool {
        self.regex.is_match(text.as_bytes())
    }

    /// Capture groups of the first match in the text.
    ///
    /// Group `0` is the whole match. Returns [`None`] when the pattern
    /// does not match at all.
    pub fn captures(&self, text: &str) -> Option<Vec<Option<String>>> {
        self.find(text.as_bytes()).map(|span| span.groups)
    }

    pub(crate) fn find(&self, buf: &[u8]) -> Option<PatternSpan> {
        let caps = self.regex.captures(buf)?;
        let (start, end) = caps.get(0).map_or((0, 0), |m| (m.start(), m.end()));
        let groups = (0..caps.len())
            .map(|i| {
                caps.get(i).map(|m| {
                    String::from_utf8_lossy(m.as_bytes()).into_owned()
                })
            })
            .collect();
        Some(PatternSpan { start, end, groups })
    }
}

/// Byte span and captures of one match within the read buffer.
#[derive(Debug)]
pub(crate) struct PatternSpan {
    pub(crate) start: usize,
    pub(crate) end: usize,
    pub(crate) groups: Vec<Option<String>>,
}

/// The outcome of a successful wait.
///
/// Records which candidate pattern was satisfied and what its capture
/// groups held, along with the output that preceded the match.
#[derive(Debug, Clone)]
pub struct MatchResult {
    index: usize,
    groups: Vec<Option<String>>,
    before: String,
}

impl MatchResult {
    pub(crate) fn new(
        index: usize,
        groups: Vec<Option<String>>,
        before: String,
    ) -> Self {
        Self {
            index,
            groups,
            before,
        }
    }

    /// Index of the satisfied pattern within the candidate list.
    ///
    /// Always `0` for single-pattern waits.
    pub fn index(&self) -> usize {
        self.index
    }

    /// A capture group of the match.
    ///
    /// Group `0` is the whole match; [`None`] when the group does not
    /// exist or did not participate in the match.
    pub fn group(&self, n: usize) -> Option<&str> {
        self.groups.get(n).and_then(|g| g.as_deref())
    }

    /// Output preceding the match, consumed along with it.
    pub fn before(&self) -> &str {
        &self.before
    }
}
