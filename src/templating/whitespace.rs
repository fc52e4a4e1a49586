//! Jinja-style whitespace handling on top of Tera.
//!
//! Templates are written for an engine configured with `trim_blocks` and
//! `lstrip_blocks`. Tera only knows the explicit `-` modifiers, so every
//! template source goes through [`apply_block_whitespace`] before Tera
//! parses it:
//!
//! - line endings are normalized to `\n` and a single trailing newline is
//!   dropped;
//! - spaces and tabs between the start of a line and a `{%` tag are removed
//!   (`{%+` keeps them);
//! - the first newline after a `%}` is removed (`+%}` keeps it);
//! - comments are removed here, applying the same two rules and their own
//!   `-` modifiers;
//! - the body of `{% raw %}` is copied untouched.
//!
//! `-` modifiers on blocks and `{{ }}` expressions are left for Tera.

/// Rewrite a template so Tera renders it the way Jinja would with
/// `trim_blocks` and `lstrip_blocks` enabled.
///
/// Unterminated tags are copied as they are so Tera reports them.
#[must_use]
pub fn apply_block_whitespace(source: &str) -> String {
    let normalized = source.replace("\r\n", "\n").replace('\r', "\n");
    let source = normalized.strip_suffix('\n').unwrap_or(&normalized);

    let mut out = String::with_capacity(source.len());
    let mut pos = 0;
    // Source offset from which the tail of `out` is a verbatim copy
    let mut copied_from = 0;

    while let Some(offset) = source[pos..].find('{') {
        let start = pos + offset;
        let kind = match source.as_bytes().get(start + 1) {
            Some(b'%') => TagKind::Block,
            Some(b'#') => TagKind::Comment,
            Some(b'{') => TagKind::Expression,
            _ => {
                out.push_str(&source[pos..=start]);
                pos = start + 1;
                continue;
            }
        };

        out.push_str(&source[pos..start]);

        let Some(end) = find_tag_end(source, start + 2, kind) else {
            out.push_str(&source[start..]);
            return out;
        };
        let tag = &source[start..end];

        if kind == TagKind::Expression {
            out.push_str(tag);
            pos = end;
            continue;
        }

        let open = Modifier::after_open(tag);
        let close = Modifier::before_close(tag);

        match open {
            Modifier::Minus if kind == TagKind::Comment => {
                let kept = out.trim_end().len();
                out.truncate(kept);
            }
            Modifier::None => lstrip_line(source, copied_from, start, &mut out),
            _ => {}
        }

        pos = end;
        copied_from = end;
        if kind == TagKind::Block {
            out.push_str(&strip_plus_modifiers(tag));

            if is_raw_open(tag) {
                match find_endraw(source, end) {
                    Some(endraw) => {
                        out.push_str(&source[end..endraw]);
                        pos = endraw;
                    }
                    None => {
                        out.push_str(&source[end..]);
                        return out;
                    }
                }
                continue;
            }
        }

        match close {
            Modifier::Minus if kind == TagKind::Comment => {
                let rest = &source[pos..];
                pos += rest.len() - rest.trim_start().len();
            }
            Modifier::None => {
                if source[pos..].starts_with('\n') {
                    pos += 1;
                }
            }
            _ => {}
        }
        copied_from = pos;
    }

    out.push_str(&source[pos..]);
    out
}

/// Drop the bodies of `{% raw %}` blocks, keeping the tags themselves.
///
/// Meant for output of [`apply_block_whitespace`], which has already
/// removed comments, so that what remains is only live template code.
pub(crate) fn without_raw_bodies(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut pos = 0;

    while let Some(offset) = source[pos..].find("{%") {
        let start = pos + offset;
        let Some(end) = find_tag_end(source, start + 2, TagKind::Block) else {
            break;
        };
        out.push_str(&source[pos..end]);
        pos = end;

        if is_raw_open(&source[start..end]) {
            match find_endraw(source, end) {
                Some(endraw) => pos = endraw,
                None => return out,
            }
        }
    }

    out.push_str(&source[pos..]);
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TagKind {
    Block,
    Comment,
    Expression,
}

impl TagKind {
    const fn closing(self) -> &'static str {
        match self {
            TagKind::Block => "%}",
            TagKind::Comment => "#}",
            TagKind::Expression => "}}",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Modifier {
    None,
    Minus,
    Plus,
}

impl Modifier {
    fn from_byte(byte: Option<&u8>) -> Self {
        match byte {
            Some(b'-') => Modifier::Minus,
            Some(b'+') => Modifier::Plus,
            _ => Modifier::None,
        }
    }

    fn after_open(tag: &str) -> Self {
        Self::from_byte(tag.as_bytes().get(2))
    }

    fn before_close(tag: &str) -> Self {
        // Too short to carry both an opening and a closing modifier
        if tag.len() < 5 {
            return Modifier::None;
        }
        Self::from_byte(tag.as_bytes().get(tag.len() - 3))
    }
}

/// End offset (exclusive) of the tag whose body starts at `from`.
///
/// Quoted strings inside blocks and expressions may contain the closing
/// delimiter; comments have no strings.
fn find_tag_end(source: &str, from: usize, kind: TagKind) -> Option<usize> {
    let closing = kind.closing();
    if kind == TagKind::Comment {
        return source[from..].find(closing).map(|i| from + i + closing.len());
    }

    let bytes = source.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = from;
    while i < bytes.len() {
        let byte = bytes[i];
        match quote {
            Some(q) if byte == q => quote = None,
            Some(_) => {}
            None if matches!(byte, b'"' | b'\'' | b'`') => quote = Some(byte),
            None if bytes[i..].starts_with(closing.as_bytes()) => {
                return Some(i + closing.len());
            }
            None => {}
        }
        i += 1;
    }
    None
}

/// Drop the spaces and tabs that precede `start` on its line, if nothing
/// else does.
///
/// Only the part of the indent copied to `out` since `copied_from` is
/// removed; a comment's `-#}` may already have consumed the rest.
fn lstrip_line(source: &str, copied_from: usize, start: usize, out: &mut String) {
    let line_start = source[..start].rfind('\n').map_or(0, |i| i + 1);
    let indent = &source[line_start..start];
    if indent.is_empty() || !indent.bytes().all(|b| b == b' ' || b == b'\t') {
        return;
    }
    let copied = start - line_start.max(copied_from);
    out.truncate(out.len() - copied);
}

fn strip_plus_modifiers(tag: &str) -> String {
    let mut tag = tag.to_string();
    if Modifier::before_close(&tag) == Modifier::Plus {
        let at = tag.len() - 3;
        tag.remove(at);
    }
    if Modifier::after_open(&tag) == Modifier::Plus {
        tag.remove(2);
    }
    tag
}

fn tag_body(tag: &str) -> &str {
    let inner = &tag[2..tag.len() - 2];
    inner.trim_start_matches(['-', '+']).trim_end_matches(['-', '+']).trim()
}

fn is_raw_open(tag: &str) -> bool {
    tag_body(tag) == "raw"
}

/// Offset of the `{% endraw %}` tag closing a raw body starting at `from`.
fn find_endraw(source: &str, from: usize) -> Option<usize> {
    let mut search = from;
    while let Some(offset) = source[search..].find("{%") {
        let start = search + offset;
        let end = find_tag_end(source, start + 2, TagKind::Block)?;
        if tag_body(&source[start..end]) == "endraw" {
            return Some(start);
        }
        search = start + 2;
    }
    None
}
