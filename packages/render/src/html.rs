//! HTML serialization of virtual trees.

use mailcraft_schema::Document;
use tracing::instrument;

use crate::layout::RenderOptions;
use crate::preview::render_with;
use crate::vdom::VNode;

const VOID_ELEMENTS: [&str; 5] = ["br", "hr", "img", "meta", "input"];

/// Options for HTML output
#[derive(Debug, Clone)]
pub struct HtmlOptions {
    /// Pretty print HTML
    pub pretty: bool,
    /// Indentation string
    pub indent: String,
    /// `<title>` of full documents
    pub title: String,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            pretty: true,
            indent: "  ".to_string(),
            title: "Email preview".to_string(),
        }
    }
}

struct Context<'a> {
    options: &'a HtmlOptions,
    depth: usize,
    buffer: String,
}

impl<'a> Context<'a> {
    fn new(options: &'a HtmlOptions) -> Self {
        Self {
            options,
            depth: 0,
            buffer: String::new(),
        }
    }

    fn add(&mut self, text: &str) {
        self.buffer.push_str(text);
    }

    fn add_line(&mut self, text: &str) {
        if self.options.pretty {
            self.add_indent();
        }
        self.add(text);
        if self.options.pretty {
            self.add("\n");
        }
    }

    fn add_indent(&mut self) {
        for _ in 0..self.depth {
            self.buffer.push_str(&self.options.indent);
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        if self.depth > 0 {
            self.depth -= 1;
        }
    }

    fn get_output(self) -> String {
        self.buffer
    }
}

/// Serialize a tree fragment
pub fn to_html(node: &VNode, options: &HtmlOptions) -> String {
    let mut ctx = Context::new(options);
    write_node(node, &mut ctx);
    ctx.get_output()
}

/// Render `doc` into a complete HTML email
#[instrument(skip_all)]
pub fn render_email_html(doc: &Document, render: &RenderOptions, options: &HtmlOptions) -> String {
    let tree = render_with(doc, render);
    let mut ctx = Context::new(options);

    ctx.add_line("<!DOCTYPE html>");
    ctx.add_line("<html>");
    ctx.indent();

    ctx.add_line("<head>");
    ctx.indent();
    ctx.add_line("<meta charset=\"UTF-8\">");
    ctx.add_line("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">");
    ctx.add_line(&format!("<title>{}</title>", escape_text(&options.title)));
    ctx.dedent();
    ctx.add_line("</head>");

    ctx.add_line("<body style=\"margin: 0; padding: 0; background: #f3f4f6;\">");
    ctx.indent();
    write_node(&tree, &mut ctx);
    ctx.dedent();
    ctx.add_line("</body>");

    ctx.dedent();
    ctx.add_line("</html>");

    ctx.get_output()
}

fn write_node(node: &VNode, ctx: &mut Context) {
    match node {
        VNode::Element {
            tag,
            attributes,
            styles,
            children,
            ..
        } => {
            let mut open = format!("<{}", tag);
            for (name, value) in attributes {
                open.push_str(&format!(" {}=\"{}\"", name, escape_attr(value)));
            }
            if !styles.is_empty() {
                let inline = styles
                    .iter()
                    .map(|(k, v)| format!("{}: {}", k, v))
                    .collect::<Vec<_>>()
                    .join("; ");
                open.push_str(&format!(" style=\"{}\"", escape_attr(&inline)));
            }
            open.push('>');

            if VOID_ELEMENTS.contains(&tag.as_str()) {
                ctx.add_line(&open);
                return;
            }

            // Keep text-only elements on a single line
            if children.iter().all(|c| matches!(c, VNode::Text { .. })) {
                let text: String = children
                    .iter()
                    .filter_map(|c| match c {
                        VNode::Text { content } => Some(escape_text(content)),
                        _ => None,
                    })
                    .collect();
                ctx.add_line(&format!("{}{}</{}>", open, text, tag));
                return;
            }

            ctx.add_line(&open);
            ctx.indent();
            for child in children {
                write_node(child, ctx);
            }
            ctx.dedent();
            ctx.add_line(&format!("</{}>", tag));
        }
        VNode::Text { content } => ctx.add_line(&escape_text(content)),
        VNode::Comment { content } => ctx.add_line(&format!("<!-- {} -->", content.replace("--", "- -"))),
        VNode::Placeholder { kind, message, .. } => ctx.add_line(&format!(
            "<div class=\"mc-unsupported\" data-block-type=\"{}\" style=\"border: 1px dashed #f87171; color: #b91c1c; padding: 8px; font-family: monospace;\">{}</div>",
            escape_attr(kind),
            escape_text(message)
        )),
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
