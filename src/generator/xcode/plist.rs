//! NeXTSTEP (old-style ASCII) property lists, as used by `project.pbxproj`.
//!
//! Values are strings, arrays or dictionaries. Numbers are kept as the bare
//! strings they were written as, so a parsed file serializes back without
//! reformatting its scalars. Dictionaries are ordered by key, which matches
//! the order Xcode itself writes.

use std::collections::BTreeMap;
use std::fmt::Write;

use thiserror::Error;

/// A dictionary value.
pub type Dict = BTreeMap<String, Value>;

/// A property-list value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    String(String),
    Array(Vec<Value>),
    Dict(Dict),
}

impl Value {
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(s.into())
    }

    /// An array of strings.
    pub fn strings<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Value::Array(items.into_iter().map(|s| Value::String(s.into())).collect())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Vec<Value>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_array_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_dict_mut(&mut self) -> Option<&mut Dict> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }
}

/// A syntax error, located by byte offset.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid property list at byte {offset}: {message}")]
pub struct PlistError {
    pub offset: usize,
    pub message: String,
}

/// Parse property-list text.
pub fn parse(text: &str) -> Result<Value, PlistError> {
    let mut parser = Parser {
        src: text.as_bytes(),
        text,
        pos: 0,
    };
    parser.skip_trivia()?;
    let value = parser.value()?;
    parser.skip_trivia()?;
    if parser.pos != parser.src.len() {
        return Err(parser.error("unexpected content after the root value"));
    }
    Ok(value)
}

struct Parser<'a> {
    src: &'a [u8],
    text: &'a str,
    pos: usize,
}

fn is_bare(c: u8) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, b'_' | b'$' | b'/' | b':' | b'.' | b'-' | b'+')
}

impl Parser<'_> {
    fn error(&self, message: impl Into<String>) -> PlistError {
        PlistError {
            offset: self.pos,
            message: message.into(),
        }
    }

    fn peek(&self) -> Option<u8> {
        self.src.get(self.pos).copied()
    }

    fn skip_trivia(&mut self) -> Result<(), PlistError> {
        loop {
            match self.peek() {
                Some(c) if c.is_ascii_whitespace() => self.pos += 1,
                Some(b'/') if self.src.get(self.pos + 1) == Some(&b'/') => {
                    while let Some(c) = self.peek() {
                        if c == b'\n' {
                            break;
                        }
                        self.pos += 1;
                    }
                }
                Some(b'/') if self.src.get(self.pos + 1) == Some(&b'*') => {
                    let start = self.pos;
                    self.pos += 2;
                    loop {
                        match self.peek() {
                            None => {
                                self.pos = start;
                                return Err(self.error("unterminated comment"));
                            }
                            Some(b'*') if self.src.get(self.pos + 1) == Some(&b'/') => {
                                self.pos += 2;
                                break;
                            }
                            Some(_) => self.pos += 1,
                        }
                    }
                }
                _ => return Ok(()),
            }
        }
    }

    fn expect(&mut self, c: u8) -> Result<(), PlistError> {
        self.skip_trivia()?;
        if self.peek() == Some(c) {
            self.pos += 1;
            Ok(())
        } else {
            Err(self.error(format!("expected `{}`", c as char)))
        }
    }

    fn value(&mut self) -> Result<Value, PlistError> {
        self.skip_trivia()?;
        match self.peek() {
            Some(b'{') => self.dict(),
            Some(b'(') => self.array(),
            Some(b'"') => self.quoted().map(Value::String),
            Some(c) if is_bare(c) => Ok(Value::String(self.bare())),
            Some(_) => Err(self.error("expected a value")),
            None => Err(self.error("unexpected end of input")),
        }
    }

    fn dict(&mut self) -> Result<Value, PlistError> {
        self.pos += 1;
        let mut dict = Dict::new();
        loop {
            self.skip_trivia()?;
            match self.peek() {
                Some(b'}') => {
                    self.pos += 1;
                    return Ok(Value::Dict(dict));
                }
                None => return Err(self.error("unterminated dictionary")),
                _ => {}
            }
            let key = match self.value()? {
                Value::String(key) => key,
                _ => return Err(self.error("dictionary keys must be strings")),
            };
            self.expect(b'=')?;
            let value = self.value()?;
            self.expect(b';')?;
            dict.insert(key, value);
        }
    }

    fn array(&mut self) -> Result<Value, PlistError> {
        self.pos += 1;
        let mut items = Vec::new();
        loop {
            self.skip_trivia()?;
            match self.peek() {
                Some(b')') => {
                    self.pos += 1;
                    return Ok(Value::Array(items));
                }
                None => return Err(self.error("unterminated array")),
                _ => {}
            }
            items.push(self.value()?);
            self.skip_trivia()?;
            match self.peek() {
                Some(b',') => self.pos += 1,
                Some(b')') => {}
                _ => return Err(self.error("expected `,` or `)`")),
            }
        }
    }

    fn bare(&mut self) -> String {
        let start = self.pos;
        while self.peek().is_some_and(is_bare) {
            self.pos += 1;
        }
        self.text[start..self.pos].to_string()
    }

    fn quoted(&mut self) -> Result<String, PlistError> {
        let start = self.pos;
        self.pos += 1;
        let mut out = String::new();
        let mut chars = self.text[self.pos..].char_indices();
        while let Some((i, c)) = chars.next() {
            match c {
                '"' => {
                    self.pos += i + 1;
                    return Ok(out);
                }
                '\\' => {
                    let Some((_, e)) = chars.next() else { break };
                    match e {
                        'n' => out.push('\n'),
                        't' => out.push('\t'),
                        'r' => out.push('\r'),
                        'U' | 'u' => {
                            let hex: String = chars.by_ref().take(4).map(|(_, h)| h).collect();
                            let decoded = u32::from_str_radix(&hex, 16)
                                .ok()
                                .and_then(char::from_u32);
                            match decoded {
                                Some(ch) if hex.len() == 4 => out.push(ch),
                                _ => {
                                    self.pos = start;
                                    return Err(self.error("invalid \\U escape"));
                                }
                            }
                        }
                        other => out.push(other),
                    }
                }
                other => out.push(other),
            }
        }
        self.pos = start;
        Err(self.error("unterminated string"))
    }
}

/// Whether a string can be written without quotes.
fn is_plain(s: &str) -> bool {
    !s.is_empty()
        && s
            .bytes()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, b'_' | b'$' | b'/' | b':' | b'.'))
}

fn write_string(out: &mut String, s: &str) {
    if is_plain(s) {
        out.push_str(s);
        return;
    }
    out.push('"');
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c => out.push(c),
        }
    }
    out.push('"');
}

fn write_indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push('\t');
    }
}

fn write_value(out: &mut String, value: &Value, depth: usize) {
    match value {
        Value::String(s) => write_string(out, s),
        Value::Array(items) => {
            out.push_str("(\n");
            for item in items {
                write_indent(out, depth + 1);
                write_value(out, item, depth + 1);
                out.push_str(",\n");
            }
            write_indent(out, depth);
            out.push(')');
        }
        Value::Dict(dict) => {
            out.push_str("{\n");
            for (key, item) in dict {
                write_indent(out, depth + 1);
                write_string(out, key);
                out.push_str(" = ");
                write_value(out, item, depth + 1);
                out.push_str(";\n");
            }
            write_indent(out, depth);
            out.push('}');
        }
    }
}

/// Serialize a value as a `project.pbxproj` document.
pub fn to_string(value: &Value) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "// !$*UTF8*$!");
    write_value(&mut out, value, 0);
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_nested() {
        let text = r#"// !$*UTF8*$!
{
	archiveVersion = 1;
	/* comment */
	objects = {
		ABC = {isa = PBXGroup; children = (DEF, "G H", ); };
	};
	name = "quoted \"x\"\n";
}
"#;
        let value = parse(text).unwrap();
        let root = value.as_dict().unwrap();
        assert_eq!(root["archiveVersion"], Value::string("1"));
        assert_eq!(root["name"], Value::string("quoted \"x\"\n"));

        let group = root["objects"].as_dict().unwrap()["ABC"].as_dict().unwrap();
        assert_eq!(group["children"], Value::strings(["DEF", "G H"]));
    }

    #[test]
    fn test_parse_unicode_escape() {
        let value = parse(r#"{ a = "\U00e9t\U00e9"; }"#).unwrap();
        assert_eq!(value.as_dict().unwrap()["a"], Value::string("été"));
    }

    #[test]
    fn test_parse_errors_report_offset() {
        let err = parse("{ a = 1 }").unwrap_err();
        assert_eq!(err.offset, 8);
        assert!(err.message.contains("`;`"));

        assert!(parse("{ a = \"open; }").is_err());
        assert!(parse("( a, b").is_err());
        assert!(parse("{ } extra").is_err());
    }

    #[test]
    fn test_write_format() {
        let mut inner = Dict::new();
        inner.insert("isa".into(), Value::string("PBXGroup"));
        inner.insert("children".into(), Value::strings(["A"]));
        inner.insert("sourceTree".into(), Value::string("<group>"));
        let mut root = Dict::new();
        root.insert("objects".into(), Value::Dict(inner));
        root.insert("empty".into(), Value::string(""));

        let text = to_string(&Value::Dict(root));
        let expected = "// !$*UTF8*$!\n{\n\tempty = \"\";\n\tobjects = {\n\t\tchildren = (\n\t\t\tA,\n\t\t);\n\t\tisa = PBXGroup;\n\t\tsourceTree = \"<group>\";\n\t};\n}\n";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_quoting_rules() {
        let mut out = String::new();
        write_string(&mut out, "com.apple.product-type.tool");
        assert_eq!(out, "\"com.apple.product-type.tool\"");

        let mut out = String::new();
        write_string(&mut out, "$(SRCROOT)/lib");
        assert_eq!(out, "\"$(SRCROOT)/lib\"");

        let mut out = String::new();
        write_string(&mut out, "sourcecode.cpp.cpp");
        assert_eq!(out, "sourcecode.cpp.cpp");
    }

    #[test]
    fn test_reparse_is_stable() {
        let text = "// !$*UTF8*$!\n{\n\ta = (\n\t\t\"x y\",\n\t\t1,\n\t);\n\tb = {\n\t};\n}\n";
        let value = parse(text).unwrap();
        assert_eq!(to_string(&value), text);
    }
}
