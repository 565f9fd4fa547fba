//! Toolbox XML for blocks, buttons and separators.
//!
//! The strings produced here are read verbatim by the palette renderer, so
//! tag names, attribute names and nesting must not change.

/// XML of a separator between groups of blocks.
pub const SEPARATOR_XML: &str = r#"<sep gap="36"/>"#;

/// Escape text for use in XML text content and attribute values. Encodes
/// `&`, `<`, `>`, `"` and `'`.
pub fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Shadow block placed in an input socket, with the name of the field that
/// holds the default value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shadow<'a> {
    pub block_type: &'a str,
    pub field_name: &'a str,
}

/// `<button text="…" callbackKey="…"></button>`
pub fn button_xml(text: &str, callback_key: &str) -> String {
    format!(
        "<button text=\"{}\" callbackKey=\"{}\"></button>",
        xml_escape(text),
        xml_escape(callback_key)
    )
}

/// `<value>` element for one input. Without a shadow the element is empty;
/// the `<field>` is only written when there is a non-empty default.
pub fn value_xml(input_name: &str, shadow: Option<Shadow<'_>>, default: Option<&str>) -> String {
    let mut out = format!("<value name=\"{}\">", xml_escape(input_name));
    if let Some(shadow) = shadow {
        out.push_str(&format!("<shadow type=\"{}\">", xml_escape(shadow.block_type)));
        if let Some(default) = default.filter(|d| !d.is_empty()) {
            out.push_str(&format!(
                "<field name=\"{}\">{}</field>",
                xml_escape(shadow.field_name),
                xml_escape(default)
            ));
        }
        out.push_str("</shadow>");
    }
    out.push_str("</value>");
    out
}

/// Bare `<field>` placed directly in a block, for fields that are not
/// inputs (dropdowns).
pub fn field_xml(field_name: &str, text: &str) -> String {
    format!("<field name=\"{}\">{}</field>", xml_escape(field_name), xml_escape(text))
}

/// `<block type="…">` wrapping the given `<value>`/`<field>` elements in order.
pub fn block_xml<S: AsRef<str>>(block_type: &str, values: &[S]) -> String {
    let mut out = format!("<block type=\"{}\">", xml_escape(block_type));
    for value in values {
        out.push_str(value.as_ref());
    }
    out.push_str("</block>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEXT: Shadow<'static> = Shadow {
        block_type: "text",
        field_name: "TEXT",
    };

    #[test]
    fn button_and_separator() {
        assert_eq!(
            button_xml("this is a button", "MAKE_A_VARIABLE"),
            r#"<button text="this is a button" callbackKey="MAKE_A_VARIABLE"></button>"#
        );
        assert_eq!(SEPARATOR_XML, r#"<sep gap="36"/>"#);
    }

    #[test]
    fn values_with_and_without_defaults() {
        assert_eq!(
            value_xml("ARG", Some(TEXT), None),
            r#"<value name="ARG"><shadow type="text"></shadow></value>"#
        );
        assert_eq!(
            value_xml("ARG", Some(TEXT), Some("")),
            r#"<value name="ARG"><shadow type="text"></shadow></value>"#
        );
        assert_eq!(
            value_xml("ARG", Some(TEXT), Some("D")),
            r#"<value name="ARG"><shadow type="text"><field name="TEXT">D</field></shadow></value>"#
        );
        assert_eq!(value_xml("THING", None, Some("x")), r#"<value name="THING"></value>"#);
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(xml_escape(r#"a<b & "c" 'd'>"#), "a&lt;b &amp; &quot;c&quot; &apos;d&apos;&gt;");
        assert_eq!(
            button_xml("Tom & Jerry", "F"),
            r#"<button text="Tom &amp; Jerry" callbackKey="F"></button>"#
        );
    }

    #[test]
    fn bare_field() {
        assert_eq!(field_xml("PARAM", "a<b"), r#"<field name="PARAM">a&lt;b</field>"#);
    }

    #[test]
    fn block_wraps_values() {
        let values = vec![value_xml("A", None, None)];
        assert_eq!(
            block_xml("test_loop", &values),
            r#"<block type="test_loop"><value name="A"></value></block>"#
        );
        assert_eq!(block_xml::<String>("test_reporter", &[]), r#"<block type="test_reporter"></block>"#);
    }
}
