//! Shell-style wildcard patterns.
//!
//! Reference tables use the classic dialect: `*` and `?` stop at `/`, `[^...]` negates a class,
//! `!` inside a class is an ordinary character and `\` escapes the next character.
//! `glob::Pattern` negates with `[!...]` and has no escape character, so every pattern is
//! rewritten into its syntax before compiling.

use glob::{MatchOptions, Pattern, PatternError};

const OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

const ERR_ESCAPE: &str = "trailing escape character";
const ERR_CLASS: &str = "invalid character class";

/// Test `subject` against the wildcard `pattern`.
pub(crate) fn wildcard_match(pattern: &str, subject: &str) -> Result<bool, PatternError> {
    Ok(Pattern::new(&translate(pattern)?)?.matches_with(subject, OPTIONS))
}

/// Rewrite a shell-style pattern into `glob::Pattern` syntax.
fn translate(pattern: &str) -> Result<String, PatternError> {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() + 4);
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            // `glob` reserves `**` for whole path components; a run of stars is one star here.
            '*' => {
                while chars.get(i) == Some(&'*') {
                    i += 1;
                }
                out.push('*');
            }
            '\\' => {
                let &c = chars.get(i + 1).ok_or(PatternError {
                    pos: i,
                    msg: ERR_ESCAPE,
                })?;
                push_literal(&mut out, c);
                i += 2;
            }
            '[' => i = translate_class(&chars, i, &mut out)?,
            c => {
                out.push(c);
                i += 1;
            }
        }
    }

    Ok(out)
}

fn push_literal(out: &mut String, c: char) {
    match c {
        '*' | '?' | '[' => {
            out.push('[');
            out.push(c);
            out.push(']');
        }
        c => out.push(c),
    }
}

/// Translate the class opening at `start`; returns the index just past its closing `]`.
fn translate_class(chars: &[char], start: usize, out: &mut String) -> Result<usize, PatternError> {
    let invalid = |pos| PatternError { pos, msg: ERR_CLASS };

    let mut i = start + 1;
    let negated = chars.get(i) == Some(&'^');
    if negated {
        i += 1;
    }

    let mut ranges = Vec::new();
    loop {
        match chars.get(i) {
            None => return Err(invalid(start)),
            Some(']') if !ranges.is_empty() => break,
            _ => {}
        }
        let (lo, next) = class_char(chars, i).ok_or_else(|| invalid(i))?;
        i = next;
        let mut hi = lo;
        if chars.get(i) == Some(&'-') {
            let (c, next) = class_char(chars, i + 1).ok_or_else(|| invalid(i + 1))?;
            hi = c;
            i = next;
        }
        ranges.push((lo, hi));
    }

    push_class(out, negated, ranges);
    Ok(i + 1)
}

/// One class member, plain or `\`-escaped. Unescaped `-` and `]` are not members.
fn class_char(chars: &[char], i: usize) -> Option<(char, usize)> {
    match *chars.get(i)? {
        '-' | ']' => None,
        '\\' => chars.get(i + 1).map(|&c| (c, i + 2)),
        c => Some((c, i + 1)),
    }
}

/// Emit a class in `glob` syntax.
///
/// Members are always written as `lo-hi` ranges so `-` needs no placement rules. `glob` only
/// accepts `]` as the first member, and a leading `!` would negate the class.
fn push_class(out: &mut String, negated: bool, ranges: Vec<(char, char)>) {
    let mut close_bracket = false;
    let mut items = Vec::with_capacity(ranges.len());
    for (lo, hi) in ranges {
        if lo > hi {
            // empty range
            items.push(('b', 'a'));
        } else if (lo..=hi).contains(&']') {
            close_bracket = true;
            if lo < ']' {
                items.push((lo, '\\'));
            }
            if hi > ']' {
                items.push(('^', hi));
            }
        } else {
            items.push((lo, hi));
        }
    }

    if !negated {
        if close_bracket && items.is_empty() {
            out.push(']');
            return;
        }
        if !close_bracket {
            items.sort_by_key(|&(lo, _)| lo == '!');
            if items[0].0 == '!' {
                let hi = items.iter().map(|&(_, hi)| hi).max().unwrap_or('!');
                items = if hi == '!' {
                    vec![('!', '!')]
                } else {
                    vec![('"', hi), ('!', '!')]
                };
            }
            if items.len() == 1 && items[0].0 == items[0].1 {
                push_literal(out, items[0].0);
                return;
            }
        }
    }

    out.push('[');
    if negated {
        out.push('!');
    }
    if close_bracket {
        out.push(']');
    }
    for (lo, hi) in items {
        out.push(lo);
        out.push('-');
        out.push(hi);
    }
    out.push(']');
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(pattern: &str, subject: &str) -> bool {
        wildcard_match(pattern, subject).unwrap()
    }

    #[test]
    fn star_and_question_mark_stop_at_slash() {
        assert!(m("/usr/*", "/usr/local"));
        assert!(!m("/usr/*", "/usr/local/bin"));
        assert!(m("/usr/*/bin", "/usr/local/bin"));
        assert!(m("a?b", "axb"));
        assert!(!m("a?b", "a/b"));
    }

    #[test]
    fn caret_negates_and_bang_is_literal() {
        assert!(m("db[^0-9]", "dbx"));
        assert!(!m("db[^0-9]", "db7"));

        assert!(m("db[!0-9]", "db!"));
        assert!(m("db[!0-9]", "db5"));
        assert!(!m("db[!0-9]", "dbx"));
        assert!(m("[!]", "!"));
        assert!(m("[!-#]", "\""));
    }

    #[test]
    fn backslash_escapes_metacharacters() {
        assert!(m(r"a\*b", "a*b"));
        assert!(!m(r"a\*b", "axb"));
        assert!(m(r"web\[1\]", "web[1]"));
        assert!(m(r"what\?", "what?"));
        assert!(m(r"\x", "x"));
    }

    #[test]
    fn escaped_members_inside_classes() {
        assert!(m(r"[\]]", "]"));
        assert!(m(r"[^\]]", "x"));
        assert!(!m(r"[^\]]", "]"));
        assert!(m(r"[a\-z]", "-"));
        assert!(!m(r"[a\-z]", "m"));
        assert!(m(r"[x\]a-c]", "b"));
        assert!(m(r"[x\]a-c]", "]"));
        assert!(m(r"[\[-\^]", "]"));
        assert!(m(r"[\[-\^]", "\\"));
    }

    #[test]
    fn star_runs_collapse() {
        assert!(m("a**b", "axyb"));
        assert!(m("***", "anything"));
    }

    #[test]
    fn reversed_range_matches_nothing() {
        assert!(!m("[z-a]", "m"));
        assert!(m("[^z-a]", "m"));
    }

    #[test]
    fn malformed_patterns_are_errors() {
        for pattern in ["[broken", "db[0-9", "[]", "[^]", "[-a]", "[a-]", "x\\", "[a\\"] {
            assert!(wildcard_match(pattern, "x").is_err(), "{pattern}");
        }
    }
}
