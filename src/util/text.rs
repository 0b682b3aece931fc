use std::borrow::Cow;

const ESC: char = '\u{1b}';
const BEL: char = '\u{07}';

/// Makes a feed value safe to print as a single terminal line.
///
/// Feed text is attacker-controlled, so before it reaches a terminal this:
/// - drops ANSI CSI sequences (`ESC [` ... final byte `0x40..=0x7E`)
/// - drops OSC sequences (`ESC ]` ... terminated by BEL or `ESC \`)
/// - drops bare ESC and other C0 controls plus DEL
/// - collapses every run of whitespace containing a newline, carriage
///   return or tab into one space, and trims the ends
///
/// Returns `Cow::Borrowed` when the value needs no change.
///
/// # Examples
///
/// ```
/// use rss_reader::util::sanitize_line;
///
/// assert_eq!(sanitize_line("plain title"), "plain title");
/// assert_eq!(sanitize_line("\x1b[31mred\x1b[0m"), "red");
/// assert_eq!(sanitize_line("first\n  second"), "first second");
/// ```
pub fn sanitize_line(s: &str) -> Cow<'_, str> {
    if !needs_rewrite(s) {
        return Cow::Borrowed(s);
    }

    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();
    let mut pending_space = false;

    while let Some(c) = chars.next() {
        match c {
            ESC => match chars.peek() {
                Some('[') => {
                    chars.next();
                    for c in chars.by_ref() {
                        if ('\u{40}'..='\u{7e}').contains(&c) {
                            break;
                        }
                    }
                }
                Some(']') => {
                    chars.next();
                    while let Some(c) = chars.next() {
                        if c == BEL {
                            break;
                        }
                        if c == ESC && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            },
            c if c.is_whitespace() => pending_space = true,
            c if c.is_control() => {}
            c => {
                if pending_space && !out.is_empty() {
                    out.push(' ');
                }
                pending_space = false;
                out.push(c);
            }
        }
    }

    Cow::Owned(out)
}

/// Fast scan: borrowed output is possible only for text with no controls,
/// no line breaks or tabs, no doubled spaces and no edge whitespace.
fn needs_rewrite(s: &str) -> bool {
    if s.starts_with(char::is_whitespace) || s.ends_with(char::is_whitespace) {
        return true;
    }
    let mut prev_space = false;
    for c in s.chars() {
        if c.is_control() {
            return true;
        }
        let space = c.is_whitespace();
        if space && (prev_space || c != ' ') {
            return true;
        }
        prev_space = space;
    }
    false
}
