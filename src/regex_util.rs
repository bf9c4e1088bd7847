use std::borrow::Cow;

use regex::{Captures, Regex};

pub trait RegexFullMatch {
    /// Eq of RE2 FullMatch
    fn full_match(&self, s: &str) -> bool;
}

pub trait RegexMatchStart {
    /// Eq of RE2 looking_at
    fn match_start(&self, s: &str) -> bool;
}

pub trait RegexConsume {
    /// Eq of RE2 Consume
    fn consume_start<'a>(&self, s: &'a str) -> Option<Cow<'a, str>> {
        self.consume_start_capturing(s).map(|res| res.0)
    }

    fn consume_start_capturing<'a>(&self, s: &'a str) -> Option<(Cow<'a, str>, Captures<'a>)>;
}

impl RegexFullMatch for Regex {
    fn full_match(&self, s: &str) -> bool {
        let found = self.find(s);
        if let Some(matched) = found {
            return matched.start() == 0 && matched.end() == s.len();
        }
        false
    }
}

impl RegexMatchStart for Regex {
    fn match_start(&self, s: &str) -> bool {
        let found = self.find(s);
        if let Some(matched) = found {
            return matched.start() == 0;
        }
        false
    }
}

impl RegexConsume for Regex {
    fn consume_start_capturing<'a>(&self, s: &'a str) -> Option<(Cow<'a, str>, Captures<'a>)> {
        let captures = self.captures(s)?;
        let full_capture = captures.get(0)?;
        if full_capture.start() != 0 {
            return None;
        }
        Some((Cow::Borrowed(&s[full_capture.end()..]), captures))
    }
}
