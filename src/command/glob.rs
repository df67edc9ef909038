//! Shell-style glob patterns compiled to anchored regular expressions.
//!
//! Supported syntax: `*` (any run), `?` (any single character), `[seq]`,
//! `[!seq]` (character classes, with `a-z` ranges). An unterminated `[` is a
//! literal. Matching is always against the whole name.

use regex::Regex;

#[derive(Debug, Clone)]
pub struct GlobPattern {
    glob: String,
    regex: Regex,
}

impl GlobPattern {
    pub fn new(glob: &str) -> Result<Self, regex::Error> {
        let regex = Regex::new(&translate(glob))?;
        Ok(Self {
            glob: glob.to_string(),
            regex,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.glob
    }

    pub fn matches(&self, name: &str) -> bool {
        self.regex.is_match(name)
    }
}

/// Translate a glob into an anchored regex source string.
pub fn translate(glob: &str) -> String {
    let chars: Vec<char> = glob.chars().collect();
    let mut out = String::from(r"\A(?s:");
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        i += 1;
        match c {
            '*' => out.push_str(".*"),
            '?' => out.push('.'),
            '[' => match class_end(&chars, i) {
                Some(end) => {
                    out.push_str(&translate_class(&chars[i..end]));
                    i = end + 1;
                }
                None => out.push_str(r"\["),
            },
            _ => out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4]))),
        }
    }
    out.push_str(r")\z");
    out
}

/// Index of the `]` closing a class that starts at `start` (just past `[`).
fn class_end(chars: &[char], start: usize) -> Option<usize> {
    let mut j = start;
    if chars.get(j) == Some(&'!') {
        j += 1;
    }
    // A leading `]` is part of the set.
    if chars.get(j) == Some(&']') {
        j += 1;
    }
    while j < chars.len() && chars[j] != ']' {
        j += 1;
    }
    (j < chars.len()).then_some(j)
}

fn translate_class(body: &[char]) -> String {
    let (negated, body) = match body.split_first() {
        Some(('!', rest)) => (true, rest),
        _ => (false, body),
    };

    let mut out = String::from("[");
    if negated {
        out.push('^');
    }
    for (k, &c) in body.iter().enumerate() {
        let is_range = c == '-' && k > 0 && k + 1 < body.len();
        if is_range {
            out.push('-');
        } else {
            out.push_str(&regex::escape(c.encode_utf8(&mut [0; 4])));
        }
    }
    out.push(']');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(glob: &str, name: &str) -> bool {
        GlobPattern::new(glob).unwrap().matches(name)
    }

    #[test]
    fn star_and_question_mark() {
        assert!(m("foo*", "foo.bar"));
        assert!(m("foo*", "foo"));
        assert!(!m("foo*", "xfoo.bar"));
        assert!(m("solarheat*_P*", "solarheat__1dpamzt__P_60"));
        assert!(m("a?c", "abc"));
        assert!(!m("a?c", "abbc"));
    }

    #[test]
    fn match_is_anchored_on_whole_name() {
        assert!(!m("bar", "foo.bar"));
        assert!(!m("foo", "foo.bar"));
        assert!(m("foo.bar", "foo.bar"));
        // `.` is literal, not a regex wildcard.
        assert!(!m("foo.bar", "fooXbar"));
    }

    #[test]
    fn character_classes() {
        assert!(m("p_[0-9]", "p_7"));
        assert!(!m("p_[0-9]", "p_x"));
        assert!(m("p_[!0-9]", "p_x"));
        assert!(!m("p_[!0-9]", "p_7"));
        assert!(m("p_[]]", "p_]"));
        assert!(m("p_[a-]", "p_-"));
        assert!(m("x[", "x["));
    }

    #[test]
    fn regex_metacharacters_are_escaped() {
        assert!(m("a+b(c)", "a+b(c)"));
        assert!(m("[&&]", "&"));
        assert!(m("$x^", "$x^"));
    }
}
