//! Raw Attribute Lexing
//!
//! The HTML tokenizer keeps the first of duplicate attributes. Templates
//! treat attributes as a mapping where the last value wins, so start tags
//! that raised a parse error are re-read from source here.

/// Whitespace as the HTML tokenizer sees it between attributes
fn is_space(b: u8) -> bool {
    matches!(b, b' ' | b'\t' | b'\n' | b'\r' | 0x0C)
}

fn skip_whitespace(input: &[u8], start: usize) -> usize {
    let mut pos = start;
    while pos < input.len() && is_space(input[pos]) {
        pos += 1;
    }
    pos
}

/// Offset of the first start tag (`<` followed by a letter) in `source[from..end]`
pub fn find_start_tag(source: &str, from: usize, end: usize) -> Option<usize> {
    let bytes = source.as_bytes();
    let end = end.min(bytes.len());
    (from..end.saturating_sub(1))
        .find(|&pos| bytes[pos] == b'<' && bytes[pos + 1].is_ascii_alphabetic())
}

/// One attribute as written: lowercased name and its full source text
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawAttr<'a> {
    name: String,
    text: &'a str,
}

/// Attributes of a raw start tag `<name ...>`, in source order, duplicates included
fn raw_attributes(tag: &str) -> Vec<RawAttr<'_>> {
    let bytes = tag.as_bytes();
    let len = bytes.len();
    let mut attrs = Vec::new();

    // Tag name
    let mut pos = 1;
    while pos < len && !is_space(bytes[pos]) && !matches!(bytes[pos], b'/' | b'>') {
        pos += 1;
    }

    loop {
        while pos < len && (is_space(bytes[pos]) || bytes[pos] == b'/') {
            pos += 1;
        }
        if pos >= len || bytes[pos] == b'>' {
            break;
        }

        // A name may start with '='
        let start = pos;
        pos += 1;
        while pos < len && !is_space(bytes[pos]) && !matches!(bytes[pos], b'/' | b'>' | b'=') {
            pos += 1;
        }
        let name = tag[start..pos].to_ascii_lowercase();

        let after_name = skip_whitespace(bytes, pos);
        if after_name < len && bytes[after_name] == b'=' {
            let value = skip_whitespace(bytes, after_name + 1);
            pos = match bytes.get(value) {
                Some(&quote @ (b'"' | b'\'')) => bytes[value + 1..]
                    .iter()
                    .position(|&b| b == quote)
                    .map_or(len, |close| value + 1 + close + 1),
                Some(b'>') | None => value,
                Some(_) => {
                    let mut end = value;
                    while end < len && !is_space(bytes[end]) && bytes[end] != b'>' {
                        end += 1;
                    }
                    end
                }
            };
        }

        attrs.push(RawAttr {
            name,
            text: &tag[start..pos],
        });
    }
    attrs
}

/// Rewrite a start tag keeping each attribute once: at its first position,
/// with the text of its last occurrence.
pub fn last_wins_tag(tag: &str) -> String {
    let attrs = raw_attributes(tag);
    let mut out = String::from("<x");
    for (i, attr) in attrs.iter().enumerate() {
        if attrs[..i].iter().any(|seen| seen.name == attr.name) {
            continue;
        }
        let last = attrs.iter().rev().find(|a| a.name == attr.name).unwrap_or(attr);
        out.push(' ');
        out.push_str(last.text);
    }
    out.push('>');
    out
}
