use crate::tree::Tags;

/// One game's tags and raw movetext lines, before any move is interpreted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PgnRecord {
    pub tags: Tags,
    pub movetext: Vec<String>,
}

impl PgnRecord {
    /// Pre-parse the bytes of a single game. Never fails; bad movetext is
    /// only discovered when the record is loaded.
    ///
    /// Tag lines are recognised only before the first movetext line.
    #[must_use]
    pub fn from_bytes(buf: &[u8]) -> Self {
        let mut record = PgnRecord::default();

        for raw in split_lines(buf) {
            // % lines are escape comments
            if raw.is_empty() || raw[0] == b'%' {
                continue;
            }
            let line = String::from_utf8_lossy(raw);

            if record.movetext.is_empty() && raw[0] == b'[' {
                let trimmed = line.trim();
                if trimmed.ends_with(']') {
                    if let Some((key, value)) = parse_tag(trimmed) {
                        record.tags.set(key, value);
                    }
                    continue;
                }
            }
            record.movetext.push(line.into_owned());
        }
        record
    }
}

/// Lines of `buf` with a leading BOM skipped and trailing `\r` dropped.
fn split_lines(buf: &[u8]) -> impl Iterator<Item = &[u8]> {
    let buf = buf.strip_prefix(super::UTF8_BOM).unwrap_or(buf);
    let body = buf.strip_suffix(b"\n").unwrap_or(buf);
    body.split(|&b| b == b'\n')
        .filter(move |_| !buf.is_empty())
        .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
}

/// `[Key "Value"]` to its parts. Lines with no space after the key are ignored.
fn parse_tag(line: &str) -> Option<(String, String)> {
    let inner = line[1..line.len() - 1].trim();
    let (key, value) = inner.split_once(' ')?;
    let value = value.trim();
    let value = value.strip_prefix('"').unwrap_or(value);
    let value = value.strip_suffix('"').unwrap_or(value);
    Some((key.trim().to_string(), unescape(value.trim())))
}

fn unescape(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tags_and_movetext() {
        let buf = b"\xEF\xBB\xBF[Event \"Casual\"]\r\n[White \"A \\\"Fish\\\" B\"]\r\n\r\n% engine note\r\n1. e4 e5\r\n[Not \"a tag\"]\r\n2. Nf3 *\r\n";
        let record = PgnRecord::from_bytes(buf);
        assert_eq!(record.tags.get("Event"), Some("Casual"));
        assert_eq!(record.tags.get("White"), Some("A \"Fish\" B"));
        assert_eq!(
            record.movetext,
            vec!["1. e4 e5", "[Not \"a tag\"]", "2. Nf3 *"]
        );
    }

    #[test]
    fn test_malformed_tag_lines() {
        let record = PgnRecord::from_bytes(b"[NoValue]\n[Event \"x\"\n1. d4");
        assert!(record.tags.is_empty());
        assert_eq!(record.movetext, vec!["[Event \"x\"", "1. d4"]);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(PgnRecord::from_bytes(b""), PgnRecord::default());
    }
}
