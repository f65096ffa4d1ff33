/// Lexer/Normalizer. Turns raw source text into an ordered list of logical
/// lines, each already classified as a label definition, a directive with
/// its raw argument strings, or an instruction mnemonic with its raw
/// argument strings.
use name_core::error::{AssembleError, ErrorKind};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawLine {
    Label(String),
    Directive(String, Vec<String>),
    Instruction(String, Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexedLine {
    pub line_number: u32,
    pub line: RawLine,
}

const CHAR_ESCAPES: &[(char, u8)] = &[
    ('n', b'\n'),
    ('r', b'\r'),
    ('t', b'\t'),
    ('\\', b'\\'),
    ('\'', b'\''),
    ('"', b'"'),
    ('0', 0),
];

pub fn normalize(source: &str) -> Result<Vec<LexedLine>, AssembleError> {
    let mut out = Vec::new();

    for (zero_based, raw_line) in source.trim_end().split('\n').enumerate() {
        let line_number = (zero_based + 1) as u32;
        let stripped = strip_comment(raw_line);

        for piece in split_on_colons(stripped) {
            let trimmed = piece.trim();
            if trimmed.is_empty() {
                continue;
            }
            let classified = classify(trimmed, line_number)?;
            out.push(LexedLine {
                line_number,
                line: classified,
            });
        }
    }

    Ok(out)
}

/// `;` is a synonym for `#`; everything from the first comment marker to
/// end-of-line is removed. Quoted strings are respected so a `#`/`;`
/// inside a string literal isn't mistaken for a comment marker.
fn strip_comment(line: &str) -> &str {
    let mut in_dquote = false;
    let mut escaped = false;
    for (i, c) in line.char_indices() {
        if in_dquote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_dquote = false;
            }
            continue;
        }
        match c {
            '"' => in_dquote = true,
            '#' | ';' => return &line[..i],
            _ => {}
        }
    }
    line
}

/// Splits a comment-stripped line at every `:` that is not at end-of-line
/// and not inside a double-quoted string. The resulting pieces all share
/// the originating line's number.
fn split_on_colons(line: &str) -> Vec<&str> {
    let bytes = line.as_bytes();
    let last_non_ws = line.trim_end().len();

    let mut pieces = Vec::new();
    let mut start = 0usize;
    let mut in_dquote = false;
    let mut escaped = false;

    for (i, c) in line.char_indices() {
        if in_dquote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_dquote = false;
            }
            continue;
        }

        match c {
            '"' => in_dquote = true,
            ':' => {
                let at_eol = i + 1 >= last_non_ws;
                if !at_eol {
                    pieces.push(&line[start..=i]);
                    start = i + 1;
                }
            }
            _ => {}
        }
    }

    let _ = bytes;
    pieces.push(&line[start..]);
    pieces
}

fn classify(text: &str, line_number: u32) -> Result<RawLine, AssembleError> {
    if let Some(label) = text.strip_suffix(':') {
        return Ok(RawLine::Label(label.trim().to_string()));
    }

    let (head, rest) = split_head(text);
    let args = split_args(rest, line_number)?;

    if head.starts_with('.') {
        Ok(RawLine::Directive(head.to_string(), args))
    } else {
        Ok(RawLine::Instruction(head.to_string(), args))
    }
}

fn split_head(text: &str) -> (&str, &str) {
    match text.find(char::is_whitespace) {
        Some(i) => (&text[..i], text[i..].trim_start()),
        None => (text, ""),
    }
}

/// Comma-splits the argument text, trims each piece, then applies the
/// character-literal conversion to each one. Commas inside a double-quoted
/// string do not split -- `.asciiz "hi, there"` is one argument.
fn split_args(rest: &str, line_number: u32) -> Result<Vec<String>, AssembleError> {
    if rest.is_empty() {
        return Ok(Vec::new());
    }

    let mut pieces = Vec::new();
    let mut start = 0usize;
    let mut in_dquote = false;
    let mut escaped = false;

    for (i, c) in rest.char_indices() {
        if in_dquote {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_dquote = false;
            }
            continue;
        }
        match c {
            '"' => in_dquote = true,
            ',' => {
                pieces.push(&rest[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&rest[start..]);

    pieces
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| convert_char_literal(s, line_number))
        .collect()
}

/// Replaces a whole-argument char literal (`'c'` or `'\e'`) with its decimal
/// ASCII code; leaves any other argument untouched.
fn convert_char_literal(arg: &str, line_number: u32) -> Result<String, AssembleError> {
    if !arg.starts_with('\'') {
        return Ok(arg.to_string());
    }

    let body = &arg[1..];
    let (code, remainder) = if let Some(escaped) = body.strip_prefix('\\') {
        let mut chars = escaped.chars();
        let esc = chars
            .next()
            .ok_or_else(|| AssembleError::new(line_number, ErrorKind::LexError("unterminated character literal".into())))?;
        let code = CHAR_ESCAPES
            .iter()
            .find(|(e, _)| *e == esc)
            .map(|(_, v)| *v)
            .ok_or_else(|| {
                AssembleError::new(line_number, ErrorKind::LexError(format!("invalid escape '\\{esc}'")))
            })?;
        (code, chars.as_str())
    } else {
        let mut chars = body.chars();
        let c = chars
            .next()
            .ok_or_else(|| AssembleError::new(line_number, ErrorKind::LexError("unterminated character literal".into())))?;
        if !c.is_ascii() {
            return Err(AssembleError::new(
                line_number,
                ErrorKind::LexError(format!("non-ascii character literal '{c}'")),
            ));
        }
        (c as u8, chars.as_str())
    };

    if remainder != "'" {
        return Err(AssembleError::new(
            line_number,
            ErrorKind::LexError(format!("malformed character literal '{arg}'")),
        ));
    }

    Ok(code.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_label_from_instruction_on_same_line() {
        let lines = normalize("loop: add $t0, $t1, $t2").unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].line, RawLine::Label("loop".to_string()));
        assert_eq!(
            lines[1].line,
            RawLine::Instruction(
                "add".to_string(),
                vec!["$t0".to_string(), "$t1".to_string(), "$t2".to_string()]
            )
        );
    }

    #[test]
    fn strips_hash_and_semicolon_comments() {
        let lines = normalize("add $t0, $t1, $t2 # a comment\nsub $t0, $t1, $t2 ; also a comment").unwrap();
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn directive_with_quoted_comma_preserves_string() {
        let lines = normalize(r#".asciiz "hi, there""#).unwrap();
        assert_eq!(
            lines[0].line,
            RawLine::Directive(".asciiz".to_string(), vec![r#""hi, there""#.to_string()])
        );
    }

    #[test]
    fn converts_plain_char_literal() {
        let lines = normalize(".byte 'a'").unwrap();
        assert_eq!(
            lines[0].line,
            RawLine::Directive(".byte".to_string(), vec!["97".to_string()])
        );
    }

    #[test]
    fn converts_escaped_char_literal() {
        let lines = normalize(".byte '\\n'").unwrap();
        assert_eq!(
            lines[0].line,
            RawLine::Directive(".byte".to_string(), vec!["10".to_string()])
        );
    }

    #[test]
    fn rejects_invalid_escape() {
        assert!(normalize(".byte '\\q'").is_err());
    }

    #[test]
    fn drops_blank_lines() {
        let lines = normalize("\n\n  \nadd $t0, $t1, $t2\n\n").unwrap();
        assert_eq!(lines.len(), 1);
    }
}
