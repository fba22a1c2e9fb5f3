//! XML renderer for record lists.
//!
//! Values are rendered recursively with two-space indentation per level:
//! lists become `<row>` children, records become one child per field, scalars
//! are escaped and written on a single line, and null renders as `<tag />`.

use crate::domain::model::{NormalizedHeaders, Node, Record};
use serde::{Deserialize, Serialize};

pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;
pub const ROOT_TAG: &str = "rows";
pub const ROW_TAG: &str = "row";
pub const ALIAS_ATTRIBUTE: &str = "name";

const INDENT_STEP: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarkupOptions {
    /// 屬性值是否跳脫；預設沿用不跳脫的輸出
    pub escape_attributes: bool,
}

/// 跳脫保留字元 `& < > " '`
pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '&' => escaped.push_str("&amp;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

/// 以預設選項輸出整份 XML 文件
pub fn render(records: &[Record], headers: &NormalizedHeaders) -> String {
    render_with(records, headers, &MarkupOptions::default())
}

pub fn render_with(records: &[Record], headers: &NormalizedHeaders, options: &MarkupOptions) -> String {
    let root = Node::from_records(records);
    let headers = (!headers.is_empty()).then_some(headers);
    let content = render_node(&root, ROOT_TAG, &[], 0, headers, options);

    [XML_DECLARATION, content.as_str()].join("\n")
}

/// 遞迴輸出單一節點。`headers` 只會沿著 list 往下傳，進入 record 後即失效。
pub fn render_node(
    node: &Node,
    tag: &str,
    props: &[(&str, &str)],
    indent: usize,
    headers: Option<&NormalizedHeaders>,
    options: &MarkupOptions,
) -> String {
    let content = match node {
        Node::Null => return format!("<{} />", tag),
        Node::Scalar(text) => {
            return format!(
                "{}<{}{}>{}</{}>",
                spaces(indent),
                tag,
                render_attributes(props, options),
                escape(text),
                tag
            );
        }
        Node::List(items) => items
            .iter()
            .map(|item| render_node(item, ROW_TAG, &[], indent + INDENT_STEP, headers, options))
            .collect::<Vec<_>>()
            .join("\n"),
        Node::Record(fields) => match headers {
            Some(headers) => headers
                .pairs()
                .map(|(key, alias)| {
                    // 記錄中沒有此欄位時當作 null
                    let child = node.field(key).unwrap_or(&Node::Null);
                    render_node(
                        child,
                        key,
                        &[(ALIAS_ATTRIBUTE, alias)],
                        indent + INDENT_STEP,
                        None,
                        options,
                    )
                })
                .collect::<Vec<_>>()
                .join("\n"),
            None => fields
                .iter()
                .map(|(key, child)| render_node(child, key, &[], indent + INDENT_STEP, None, options))
                .collect::<Vec<_>>()
                .join("\n"),
        },
    };

    let spaces = spaces(indent);
    [
        format!("{}<{}{}>", spaces, tag, render_attributes(props, options)),
        content,
        format!("{}</{}>", spaces, tag),
    ]
    .join("\n")
}

fn render_attributes(props: &[(&str, &str)], options: &MarkupOptions) -> String {
    props
        .iter()
        .map(|(key, value)| {
            if options.escape_attributes {
                format!(" {}=\"{}\"", key, escape(value))
            } else {
                format!(" {}=\"{}\"", key, value)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn spaces(count: usize) -> String {
    " ".repeat(count)
}
