//! XML helpers: a small builder for OOXML parts and a quick-xml text reader.

use quick_xml::events::Event;
use quick_xml::Reader;

/// XML declaration used by OOXML parts.
pub const XML_DECLARATION: &str =
    "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>";

/// Collect the text content of every element with the given local name.
pub fn extract_text(xml: &str, tag_name: &str) -> Vec<String> {
    let mut reader = Reader::from_str(xml);
    let mut results = Vec::new();
    let mut in_target = false;
    let mut buf = String::new();

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                if e.local_name().as_ref() == tag_name.as_bytes() {
                    in_target = true;
                    buf.clear();
                }
            }
            Ok(Event::Empty(ref e)) => {
                if e.local_name().as_ref() == tag_name.as_bytes() {
                    results.push(String::new());
                }
            }
            Ok(Event::Text(ref e)) => {
                if in_target {
                    if let Ok(text) = e.unescape() {
                        buf.push_str(&text);
                    }
                }
            }
            Ok(Event::End(ref e)) => {
                if e.local_name().as_ref() == tag_name.as_bytes() && in_target {
                    results.push(std::mem::take(&mut buf));
                    in_target = false;
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                log::warn!("XML read error at {}: {}", reader.buffer_position(), e);
                break;
            }
            _ => {}
        }
    }
    results
}

/// Indenting XML builder for generating package parts.
pub struct XmlBuilder {
    content: String,
    indent_level: usize,
}

impl XmlBuilder {
    pub fn new() -> Self {
        let mut content = String::from(XML_DECLARATION);
        content.push('\n');
        Self {
            content,
            indent_level: 0,
        }
    }

    pub fn open_tag(&mut self, name: &str, attrs: &[(&str, &str)]) -> &mut Self {
        self.indent();
        self.start(name, attrs);
        self.content.push_str(">\n");
        self.indent_level += 1;
        self
    }

    pub fn close_tag(&mut self, name: &str) -> &mut Self {
        self.indent_level = self.indent_level.saturating_sub(1);
        self.indent();
        self.content.push_str("</");
        self.content.push_str(name);
        self.content.push_str(">\n");
        self
    }

    pub fn empty_tag(&mut self, name: &str, attrs: &[(&str, &str)]) -> &mut Self {
        self.indent();
        self.start(name, attrs);
        self.content.push_str("/>\n");
        self
    }

    /// Element with escaped text content on a single line.
    pub fn text_element(&mut self, name: &str, text: &str, attrs: &[(&str, &str)]) -> &mut Self {
        self.indent();
        self.start(name, attrs);
        self.content.push('>');
        self.content.push_str(&escape_xml_text(text));
        self.content.push_str("</");
        self.content.push_str(name);
        self.content.push_str(">\n");
        self
    }

    pub fn build(self) -> String {
        self.content
    }

    fn start(&mut self, name: &str, attrs: &[(&str, &str)]) {
        self.content.push('<');
        self.content.push_str(name);
        for (key, value) in attrs {
            self.content.push(' ');
            self.content.push_str(key);
            self.content.push_str("=\"");
            self.content.push_str(&escape_xml_attr(value));
            self.content.push('"');
        }
    }

    fn indent(&mut self) {
        for _ in 0..self.indent_level {
            self.content.push_str("  ");
        }
    }
}

impl Default for XmlBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Escape special characters in XML text content.
pub fn escape_xml_text(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Escape special characters in XML attribute values.
pub fn escape_xml_attr(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Drop characters XML 1.0 cannot represent (C0 controls other than tab,
/// newline and carriage return, lone surrogates never reach a `str`, and the
/// U+FFFE/U+FFFF non-characters).
pub fn strip_invalid_xml_chars(s: &str) -> String {
    s.chars()
        .filter(|&c| {
            matches!(c, '\t' | '\n' | '\r')
                || (c >= '\u{20}' && c != '\u{FFFE}' && c != '\u{FFFF}')
        })
        .collect()
}
