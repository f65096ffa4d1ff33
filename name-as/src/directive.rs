/// Directive handling. A directive is pure with respect to layout
/// (`forward_offset`) and has a separate, effectful step that actually
/// writes initializer bytes (`execute`). The memory component is an
/// external collaborator, so `execute` takes the image by reference rather
/// than owning it.
use name_core::error::{AssembleError, ErrorKind};
use name_core::memory::Memory;

pub struct DirectiveRecord<'a> {
    pub name: &'a str,
    pub raw_args: &'a [String],
    pub address: u32,
    pub line_number: u32,
}

impl<'a> DirectiveRecord<'a> {
    /// How many bytes this directive reserves in its segment. Pure: does
    /// not touch memory.
    pub fn forward_offset(&self) -> Result<u32, AssembleError> {
        let n = self.raw_args.len() as u32;
        match self.name {
            ".align" => {
                let boundary = self.parse_single_nonneg()?;
                if boundary == 0 {
                    return Ok(0);
                }
                let rem = self.address % boundary;
                Ok(if rem == 0 { 0 } else { boundary - rem })
            }
            ".space" => self.parse_single_nonneg(),
            ".ascii" => Ok(self.decode_strings()?.len() as u32),
            ".asciiz" => Ok(self.decode_strings()?.len() as u32 + 1),
            ".byte" => Ok(n),
            ".half" => Ok(n * 2),
            ".word" => Ok(n * 4),
            ".float" => Ok(n * 4),
            ".double" => Ok(n * 8),
            other => Err(self.err(ErrorKind::DirectiveSyntax(format!("unknown directive '{other}'")))),
        }
    }

    /// Writes this directive's initializer content into `memory`. Returns
    /// any non-fatal warnings (e.g. floating-point directives are
    /// recognized but not emitted).
    pub fn execute(&self, memory: &mut Memory) -> Result<Vec<String>, AssembleError> {
        match self.name {
            ".align" | ".space" => Ok(Vec::new()),
            ".ascii" => {
                let bytes = self.decode_strings()?;
                memory
                    .write(self.address, &bytes)
                    .map_err(|e| self.err(e))?;
                Ok(Vec::new())
            }
            ".asciiz" => {
                let mut bytes = self.decode_strings()?;
                bytes.push(0);
                memory
                    .write(self.address, &bytes)
                    .map_err(|e| self.err(e))?;
                Ok(Vec::new())
            }
            ".byte" => self.write_ints(memory, 1),
            ".half" => self.write_ints(memory, 2),
            ".word" => self.write_ints(memory, 4),
            ".float" => Ok(vec![format!(
                "line {}: .float recognized but not emitted (no floating-point arithmetic); {} byte(s) reserved",
                self.line_number,
                self.raw_args.len() * 4
            )]),
            ".double" => Ok(vec![format!(
                "line {}: .double recognized but not emitted (no floating-point arithmetic); {} byte(s) reserved",
                self.line_number,
                self.raw_args.len() * 8
            )]),
            other => Err(self.err(ErrorKind::DirectiveSyntax(format!("unknown directive '{other}'")))),
        }
    }

    fn write_ints(&self, memory: &mut Memory, width: usize) -> Result<Vec<String>, AssembleError> {
        let mut addr = self.address;
        for arg in self.raw_args {
            let v = self.parse_int(arg)?;
            let bytes = (v as i64).to_be_bytes();
            memory
                .write(addr, &bytes[8 - width..])
                .map_err(|e| self.err(e))?;
            addr += width as u32;
        }
        Ok(Vec::new())
    }

    fn parse_single_nonneg(&self) -> Result<u32, AssembleError> {
        if self.raw_args.len() != 1 {
            return Err(self.err(ErrorKind::DirectiveSyntax(format!(
                "{} takes exactly one argument",
                self.name
            ))));
        }
        let v = self.parse_int(&self.raw_args[0])?;
        if v < 0 {
            return Err(self.err(ErrorKind::DirectiveSemantic(format!(
                "{} argument must be non-negative, got {v}",
                self.name
            ))));
        }
        Ok(v as u32)
    }

    fn parse_int(&self, text: &str) -> Result<i64, AssembleError> {
        let text = text.trim();
        let parsed = if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
            i64::from_str_radix(hex, 16).ok()
        } else {
            text.parse::<i64>().ok()
        };
        parsed.ok_or_else(|| {
            self.err(ErrorKind::DirectiveSemantic(format!(
                "'{text}' is not a valid integer literal"
            )))
        })
    }

    /// Unquotes and escape-decodes every argument, concatenating the
    /// results: `.ascii`/`.asciiz` arguments are joined.
    fn decode_strings(&self) -> Result<Vec<u8>, AssembleError> {
        if self.raw_args.is_empty() {
            return Err(self.err(ErrorKind::DirectiveSyntax(format!(
                "{} requires at least one string argument",
                self.name
            ))));
        }
        let mut out = Vec::new();
        for arg in self.raw_args {
            out.extend(self.decode_one_string(arg)?);
        }
        Ok(out)
    }

    fn decode_one_string(&self, arg: &str) -> Result<Vec<u8>, AssembleError> {
        let inner = arg
            .strip_prefix('"')
            .and_then(|s| s.strip_suffix('"'))
            .ok_or_else(|| {
                self.err(ErrorKind::DirectiveSyntax(format!(
                    "'{arg}' is not a quoted string"
                )))
            })?;

        let mut out = Vec::new();
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c as u8);
                continue;
            }
            match chars.next() {
                Some('n') => out.push(b'\n'),
                Some('r') => out.push(b'\r'),
                Some('t') => out.push(b'\t'),
                Some('b') => out.push(0x08),
                Some('f') => out.push(0x0C),
                Some('v') => out.push(0x0B),
                Some('0') => out.push(0),
                Some('\\') => out.push(b'\\'),
                Some('"') => out.push(b'"'),
                Some('\'') => out.push(b'\''),
                Some(other) => {
                    out.push(b'\\');
                    out.push(other as u8);
                }
                None => out.push(b'\\'),
            }
        }
        Ok(out)
    }

    fn err(&self, kind: ErrorKind) -> AssembleError {
        AssembleError::new(self.line_number, kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec<'a>(name: &'a str, args: &'a [String], address: u32) -> DirectiveRecord<'a> {
        DirectiveRecord {
            name,
            raw_args: args,
            address,
            line_number: 1,
        }
    }

    #[test]
    fn word_forward_offset_is_four_per_arg() {
        let args = vec!["1".to_string(), "2".to_string(), "3".to_string()];
        assert_eq!(rec(".word", &args, 0).forward_offset().unwrap(), 12);
    }

    #[test]
    fn asciiz_includes_null_terminator() {
        let args = vec![r#""hi""#.to_string()];
        assert_eq!(rec(".asciiz", &args, 0).forward_offset().unwrap(), 3);
    }

    #[test]
    fn ascii_joins_across_args() {
        let args = vec![r#""ab""#.to_string(), r#""cd""#.to_string()];
        assert_eq!(rec(".ascii", &args, 0).forward_offset().unwrap(), 4);
    }

    #[test]
    fn align_computes_padding_to_next_boundary() {
        let args = vec!["4".to_string()];
        assert_eq!(rec(".align", &args, 2).forward_offset().unwrap(), 2);
        assert_eq!(rec(".align", &args, 4).forward_offset().unwrap(), 0);
    }

    #[test]
    fn space_writes_nothing_but_reserves() {
        let args = vec!["8".to_string()];
        assert_eq!(rec(".space", &args, 0).forward_offset().unwrap(), 8);
    }

    #[test]
    fn word_execute_writes_big_endian() {
        let mut memory = Memory::new(16);
        let args = vec!["0x01020304".to_string()];
        rec(".word", &args, 0).execute(&mut memory).unwrap();
        assert_eq!(memory.read_word(0).unwrap(), 0x01020304);
    }

    #[test]
    fn float_directive_warns_and_reserves_without_writing() {
        let mut memory = Memory::new(16);
        let args = vec!["1.5".to_string()];
        let warnings = rec(".float", &args, 0).execute(&mut memory).unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(memory.read_word(0).unwrap(), 0);
    }
}
