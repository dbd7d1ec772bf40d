//! Function body canonicalization.
//!
//! A body goes through two passes. [`strip_comments`] drops comments and
//! leading brace runs while keeping string and character literals verbatim.
//! [`normalize`] then removes layout characters, every remaining brace and
//! all spaces, and lowercases the result.
//!
//! Lowercasing folds identifier case, so `Foo()` and `foo()` canonicalize to
//! the same text. Indexes built from this form will report such pairs as
//! clones.

/// Canonical form used as fingerprint input.
pub fn canonicalize(body: &str) -> String {
    normalize(&strip_comments(body))
}

/// Remove `//` and `/* */` comments and leading brace runs.
///
/// Scanning follows a fixed priority at every token start: line comment,
/// brace run, block comment, quoted literal, then plain code. A block comment
/// without a closing `*/` and a literal without a closing quote are not
/// recognized as such and fall back to plain code. A code run extends up to
/// the next `/`, `'` or `"`, so braces inside it survive this pass.
pub fn strip_comments(src: &str) -> String {
    let bytes = src.as_bytes();
    let mut out = String::with_capacity(src.len());
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                i = line_comment_end(bytes, i);
                continue;
            }
            b'{' | b'}' => {
                while i < bytes.len() && matches!(bytes[i], b'{' | b'}') {
                    i += 1;
                }
                continue;
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                if let Some(end) = block_comment_end(bytes, i) {
                    i = end;
                    continue;
                }
            }
            quote @ (b'\'' | b'"') => {
                if let Some(end) = literal_end(bytes, i, quote) {
                    out.push_str(&src[i..end]);
                    i = end;
                    continue;
                }
            }
            _ => {}
        }

        let end = code_run_end(bytes, i);
        out.push_str(&src[i..end]);
        i = end;
    }

    out
}

/// Drop newlines, tabs, braces and spaces, then lowercase.
pub fn normalize(src: &str) -> String {
    src.chars()
        .filter(|c| !matches!(c, '\n' | '\r' | '\t' | '{' | '}' | ' '))
        .collect::<String>()
        .to_lowercase()
}

/// Position of the `\n` ending the line comment at `start`, or end of input.
fn line_comment_end(bytes: &[u8], start: usize) -> usize {
    bytes[start..]
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |off| start + off)
}

/// Position just past the first `*/` following the `/*` at `start`.
fn block_comment_end(bytes: &[u8], start: usize) -> Option<usize> {
    let body = start + 2;
    bytes
        .get(body..)?
        .windows(2)
        .position(|w| w == b"*/")
        .map(|off| body + off + 2)
}

/// Position just past the closing quote of the literal opened at `start`.
fn literal_end(bytes: &[u8], start: usize, quote: u8) -> Option<usize> {
    let mut i = start + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                // An escape needs a character to consume.
                if i + 1 >= bytes.len() {
                    return None;
                }
                // Skip the whole escaped character, which may be multi-byte.
                i += 1 + utf8_len(bytes[i + 1]);
            }
            b if b == quote => return Some(i + 1),
            _ => i += 1,
        }
    }
    None
}

/// End of a plain code run: the first byte is always taken.
fn code_run_end(bytes: &[u8], start: usize) -> usize {
    let first = start + utf8_len(bytes[start]);
    bytes[first.min(bytes.len())..]
        .iter()
        .position(|b| matches!(b, b'/' | b'\'' | b'"'))
        .map_or(bytes.len(), |off| first + off)
}

fn utf8_len(lead: u8) -> usize {
    match lead {
        0x00..=0x7f => 1,
        0xc0..=0xdf => 2,
        0xe0..=0xef => 3,
        0xf0..=0xf7 => 4,
        _ => 1,
    }
}
