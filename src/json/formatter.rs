use serde_json::ser::Formatter;
use std::io;

/// `serde_json` formatter producing diff-friendly sidecar files.
///
/// Objects are spread over lines with a fixed indent, arrays stay on a single
/// line at any depth, and anything nested inside an array is written inline.
/// An empty object is `{}`.
#[derive(Debug, Clone)]
pub struct SidecarFormatter<'a> {
    indent: &'a [u8],
    depth: usize,
    inline_depth: usize,
    has_value: bool,
}

impl<'a> SidecarFormatter<'a> {
    pub fn new() -> Self {
        Self::with_indent(b"  ")
    }

    pub fn with_indent(indent: &'a [u8]) -> Self {
        Self {
            indent,
            depth: 0,
            inline_depth: 0,
            has_value: false,
        }
    }

    fn inline(&self) -> bool {
        self.inline_depth > 0
    }

    fn write_indent<W: ?Sized + io::Write>(&self, writer: &mut W) -> io::Result<()> {
        for _ in 0..self.depth {
            writer.write_all(self.indent)?;
        }
        Ok(())
    }
}

impl Default for SidecarFormatter<'_> {
    fn default() -> Self {
        SidecarFormatter::new()
    }
}

impl Formatter for SidecarFormatter<'_> {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inline_depth += 1;
        writer.write_all(b"[")
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.inline_depth -= 1;
        writer.write_all(b"]")
    }

    fn begin_array_value<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        Ok(())
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        if !self.inline() {
            self.depth += 1;
            self.has_value = false;
        }
        writer.write_all(b"{")
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        if !self.inline() {
            self.depth -= 1;
            if self.has_value {
                writer.write_all(b"\n")?;
                self.write_indent(writer)?;
            }
        }
        writer.write_all(b"}")
    }

    fn begin_object_key<W: ?Sized + io::Write>(
        &mut self,
        writer: &mut W,
        first: bool,
    ) -> io::Result<()> {
        if self.inline() {
            if first {
                Ok(())
            } else {
                writer.write_all(b", ")
            }
        } else {
            let separator: &[u8] = if first { b"\n" } else { b",\n" };
            writer.write_all(separator)?;
            self.write_indent(writer)
        }
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        writer.write_all(b": ")
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, _writer: &mut W) -> io::Result<()> {
        self.has_value = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use serde_json::json;

    fn render(value: &serde_json::Value, indent: &[u8]) -> String {
        let mut buf = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, SidecarFormatter::with_indent(indent));
        value.serialize(&mut ser).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_nested_objects_indent() {
        let value = json!({"outer": {"inner": {"leaf": true}}, "empty": {}});
        assert_eq!(
            render(&value, b"  "),
            "{\n  \"outer\": {\n    \"inner\": {\n      \"leaf\": true\n    }\n  },\n  \"empty\": {}\n}"
        );
    }

    #[test]
    fn test_arrays_stay_inline() {
        let value = json!({"a": [[1, 2], [], {"k": [3]}], "b": []});
        assert_eq!(
            render(&value, b"  "),
            "{\n  \"a\": [[1, 2], [], {\"k\": [3]}],\n  \"b\": []\n}"
        );
    }

    #[test]
    fn test_custom_indent_and_scalars() {
        assert_eq!(render(&json!({"x": null}), b"\t"), "{\n\t\"x\": null\n}");
        assert_eq!(render(&json!([1.5, "s", false]), b"  "), "[1.5, \"s\", false]");
        assert_eq!(render(&json!("plain"), b"  "), "\"plain\"");
    }
}
