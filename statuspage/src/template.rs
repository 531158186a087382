//! Minimal placeholder templates: `{{name}}` values and `{{#rows}}...{{/rows}}`
//! sections repeated once per row. Values are HTML-escaped on output.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

static TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([#/]?)\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("valid tag pattern")
});

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    #[error("no value for placeholder `{0}`")]
    Missing(String),

    #[error("section `{0}` is never closed")]
    Unterminated(String),

    #[error("section `{found}` closed while `{expected}` is open")]
    Mismatched { expected: String, found: String },

    #[error("section `{0}` closed without being opened")]
    Unopened(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Var(String),
    Section { name: String, body: Vec<Node> },
}

/// Values and repeated rows a template is rendered against.
#[derive(Debug, Default, Clone)]
pub struct Context {
    values: HashMap<String, String>,
    sections: HashMap<String, Vec<Context>>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        self.values.insert(key.into(), value.to_string());
        self
    }

    /// Appends one row to `section`. Lookups inside a row fall back to the
    /// enclosing contexts.
    pub fn push_row(&mut self, section: impl Into<String>, row: Context) -> &mut Self {
        self.sections.entry(section.into()).or_default().push(row);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Template {
    nodes: Vec<Node>,
}

fn current<'a>(root: &'a mut Vec<Node>, open: &'a mut [(String, Vec<Node>)]) -> &'a mut Vec<Node> {
    match open.last_mut() {
        Some((_, body)) => body,
        None => root,
    }
}

impl Template {
    pub fn parse(src: &str) -> Result<Self, TemplateError> {
        let mut root = Vec::new();
        let mut open: Vec<(String, Vec<Node>)> = Vec::new();
        let mut last = 0;

        for caps in TAG.captures_iter(src) {
            let Some(tag) = caps.get(0) else { continue };
            if tag.start() > last {
                current(&mut root, &mut open).push(Node::Text(src[last..tag.start()].to_string()));
            }
            last = tag.end();

            let name = caps[2].to_string();
            match &caps[1] {
                "#" => open.push((name, Vec::new())),
                "/" => match open.pop() {
                    Some((expected, body)) if expected == name => {
                        current(&mut root, &mut open).push(Node::Section { name, body });
                    }
                    Some((expected, _)) => {
                        return Err(TemplateError::Mismatched {
                            expected,
                            found: name,
                        });
                    }
                    None => return Err(TemplateError::Unopened(name)),
                },
                _ => current(&mut root, &mut open).push(Node::Var(name)),
            }
        }
        if last < src.len() {
            current(&mut root, &mut open).push(Node::Text(src[last..].to_string()));
        }
        if let Some((name, _)) = open.pop() {
            return Err(TemplateError::Unterminated(name));
        }
        Ok(Self { nodes: root })
    }

    pub fn render(&self, ctx: &Context) -> Result<String, TemplateError> {
        let mut out = String::new();
        render_nodes(&self.nodes, &[ctx], &mut out)?;
        Ok(out)
    }
}

fn render_nodes<'a>(
    nodes: &[Node],
    scopes: &[&'a Context],
    out: &mut String,
) -> Result<(), TemplateError> {
    for node in nodes {
        match node {
            Node::Text(text) => out.push_str(text),
            Node::Var(name) => {
                let value = scopes
                    .iter()
                    .rev()
                    .copied()
                    .find_map(|c: &'a Context| c.values.get(name))
                    .ok_or_else(|| TemplateError::Missing(name.clone()))?;
                escape_html_into(value, out);
            }
            Node::Section { name, body } => {
                // An absent section renders nothing.
                let rows = scopes
                    .iter()
                    .rev()
                    .copied()
                    .find_map(|c: &'a Context| c.sections.get(name));
                for row in rows.into_iter().flatten() {
                    let mut inner = scopes.to_vec();
                    inner.push(row);
                    render_nodes(body, &inner, out)?;
                }
            }
        }
    }
    Ok(())
}

fn escape_html_into(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
}
