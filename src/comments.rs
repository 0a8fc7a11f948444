//! Discovery of comment blocks in source text.
//!
//! `syn` drops ordinary comments, so blocks are recovered from the raw file content: a
//! run of consecutive `//` lines (including `///` and `//!`) forms one block, and so does
//! each `/* ... */` comment. Comments that trail code on the same line are not collected.
//!
//! Code lines are scanned for string literals (plain, byte and raw, with any number of
//! `#`s) so that comment-like lines inside a multi-line literal are not taken as comments.

/// One contiguous comment with markers removed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentBlock {
    /// 1-based line number of the first comment line
    pub start_line: usize,
    /// Comment text, one line per source line
    pub text: String,
}

/// Splits `source` into comment blocks, in source order.
pub fn extract_comment_blocks(source: &str) -> Vec<CommentBlock> {
    let mut blocks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut start_line = 0;
    let mut in_block_comment = false;

    let mut flush = |lines: &mut Vec<&str>, start: usize| {
        if !lines.is_empty() {
            blocks.push(CommentBlock {
                start_line: start,
                text: lines.join("\n"),
            });
            lines.clear();
        }
    };

    let mut open_literal: Option<StrLiteral> = None;

    for (index, line) in source.lines().enumerate() {
        let line_no = index + 1;
        let trimmed = line.trim();

        if open_literal.is_some() {
            flush(&mut current, start_line);
            open_literal = scan_code(line, open_literal);
            continue;
        }

        if in_block_comment {
            match trimmed.find("*/") {
                Some(end) => {
                    current.push(strip_decoration(&trimmed[..end]));
                    flush(&mut current, start_line);
                    in_block_comment = false;
                }
                None => current.push(strip_decoration(trimmed)),
            }
            continue;
        }

        if let Some(rest) = trimmed.strip_prefix("//") {
            if current.is_empty() {
                start_line = line_no;
            }
            current.push(strip_line_marker(rest));
            continue;
        }

        flush(&mut current, start_line);

        if let Some(rest) = trimmed.strip_prefix("/*") {
            start_line = line_no;
            // `/**/` is an empty comment, not a doc marker
            let rest = match rest.strip_prefix(['*', '!']) {
                Some(body) if !rest.starts_with("*/") => body,
                _ => rest,
            };
            match rest.find("*/") {
                Some(end) => {
                    current.push(strip_decoration(&rest[..end]));
                    flush(&mut current, start_line);
                }
                None => {
                    current.push(strip_decoration(rest));
                    in_block_comment = true;
                }
            }
        } else {
            open_literal = scan_code(line, None);
        }
    }

    flush(&mut current, start_line);
    blocks
}

/// A string literal left open at the end of a line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StrLiteral {
    /// `"..."` or `b"..."`
    Plain,
    /// `r#"..."#` with the number of `#`s
    Raw(usize),
}

/// Walks one line of code from the given literal state and returns the state at its end.
/// Text after `//` or an unterminated `/*` is not scanned.
fn scan_code(line: &str, mut open: Option<StrLiteral>) -> Option<StrLiteral> {
    let bytes = line.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match open {
            Some(StrLiteral::Plain) => match bytes[i] {
                b'\\' => i += 2,
                b'"' => {
                    open = None;
                    i += 1;
                }
                _ => i += 1,
            },
            Some(StrLiteral::Raw(hashes)) => {
                let closes = bytes[i] == b'"'
                    && bytes[i + 1..].iter().take(hashes).filter(|&&b| b == b'#').count() == hashes;
                if closes {
                    open = None;
                    i += 1 + hashes;
                } else {
                    i += 1;
                }
            }
            None => match bytes[i] {
                b'/' if bytes.get(i + 1) == Some(&b'/') => break,
                b'/' if bytes.get(i + 1) == Some(&b'*') => match line[i + 2..].find("*/") {
                    Some(end) => i += end + 4,
                    None => break,
                },
                b'"' => {
                    open = Some(StrLiteral::Plain);
                    i += 1;
                }
                b'\'' => i += char_literal_len(&line[i..]),
                b if b.is_ascii_alphabetic() || b == b'_' => {
                    let start = i;
                    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                        i += 1;
                    }
                    if matches!(&line[start..i], "r" | "br" | "cr") {
                        let hashes = bytes[i..].iter().take_while(|&&b| b == b'#').count();
                        if bytes.get(i + hashes) == Some(&b'"') {
                            open = Some(StrLiteral::Raw(hashes));
                            i += hashes + 1;
                        }
                    }
                }
                _ => i += 1,
            },
        }
    }

    open
}

/// Length of a char literal at the start of `rest`, or 1 for a lifetime quote.
fn char_literal_len(rest: &str) -> usize {
    let mut chars = rest.chars().skip(1);
    match chars.next() {
        Some('\\') => rest
            .get(3..)
            .and_then(|tail| tail.find('\''))
            .map_or(rest.len(), |p| p + 4),
        Some(c) if chars.next() == Some('\'') => 2 + c.len_utf8(),
        _ => 1,
    }
}

/// Text after `//`: drops the doc marker (`/` or `!`) and one space.
fn strip_line_marker(rest: &str) -> &str {
    let rest = rest.strip_prefix(['/', '!']).unwrap_or(rest);
    rest.strip_prefix(' ').unwrap_or(rest).trim_end()
}

/// Block comment line: drops a leading ` * ` decoration.
fn strip_decoration(line: &str) -> &str {
    let line = line.trim();
    let line = line.strip_prefix('*').unwrap_or(line);
    line.strip_prefix(' ').unwrap_or(line).trim_end()
}
