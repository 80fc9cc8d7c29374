//! Inspector-style rendering of pipeline values.
//!
//! Two modes: JSON (the default, compact or 2-space pretty) and a
//! JS-object-literal mode with bare keys and single-quoted strings
//! (`--no-json`). The renderer always emits ANSI color; the [`OutputSink`]
//! strips it when color is disabled, so rendering code never branches on
//! the color option.

use std::io;
use std::io::Write;

use crate::sink::OutputSink;
use crate::value::Value;

/// ANSI SGR codes applied per value class.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Object keys
    pub key: &'static str,
    /// String scalars
    pub string: &'static str,
    /// Integer and float scalars
    pub number: &'static str,
    /// true/false/null and the absent-value marker
    pub literal: &'static str,
}

impl Default for Styles {
    fn default() -> Self {
        Styles {
            key: "32",     // green
            string: "33",  // yellow
            number: "36",  // cyan
            literal: "35", // magenta
        }
    }
}

/// Wrap text in an SGR sequence.
pub fn paint(text: &str, code: &str) -> String {
    format!("\x1b[{}m{}\x1b[0m", code, text)
}

/// Options consumed by [`render`].
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Multi-line output with 2-space indentation
    pub pretty: bool,
    /// Strict JSON output; false selects the JS-literal mode
    pub json: bool,
    /// Truncate string scalars beyond this many characters
    pub max_length: Option<usize>,
    /// Accepted for option-surface compatibility; JSON documents cannot
    /// contain functions, so nothing is ever hidden
    pub hide_functions: bool,
    pub styles: Styles,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            pretty: true,
            json: true,
            max_length: None,
            hide_functions: false,
            styles: Styles::default(),
        }
    }
}

/// Render a pipeline value to the sink as a single line-terminated unit.
///
/// An absent value renders as the marker `undefined`, so input that parsed
/// to nothing still produces visible output.
pub fn render<W: Write>(
    value: Option<&Value>,
    options: &RenderOptions,
    sink: &mut OutputSink<W>,
) -> io::Result<()> {
    let text = match value {
        Some(v) => Renderer::new(options).print(v),
        None => paint("undefined", options.styles.literal),
    };
    sink.puts(&text)
}

struct Renderer<'a> {
    options: &'a RenderOptions,
}

impl<'a> Renderer<'a> {
    fn new(options: &'a RenderOptions) -> Self {
        Renderer { options }
    }

    fn print(&self, value: &Value) -> String {
        self.print_value(value, 0)
    }

    fn print_value(&self, value: &Value, indent: usize) -> String {
        let styles = &self.options.styles;
        match value {
            Value::Null => paint("null", styles.literal),
            Value::Boolean(b) => paint(&b.to_string(), styles.literal),
            Value::Integer(n) => paint(&n.to_string(), styles.number),
            Value::Float(n) => paint(&n.to_string(), styles.number),
            Value::String(s) => self.print_string(s),
            Value::Array(arr) => self.print_array(arr, indent),
            Value::Object(obj) => self.print_object(obj, indent),
        }
    }

    fn print_string(&self, s: &str) -> String {
        let truncated = match self.options.max_length {
            Some(max) if s.chars().count() > max => {
                let mut t: String = s.chars().take(max).collect();
                t.push('…');
                t
            }
            _ => s.to_string(),
        };

        let quoted = if self.options.json {
            format!("\"{}\"", escape_json(&truncated))
        } else {
            format!("'{}'", escape_single(&truncated))
        };
        paint(&quoted, self.options.styles.string)
    }

    fn print_key(&self, key: &str) -> String {
        let text = if self.options.json {
            format!("\"{}\"", escape_json(key))
        } else if is_bare_key(key) {
            key.to_string()
        } else {
            format!("'{}'", escape_single(key))
        };
        paint(&text, self.options.styles.key)
    }

    fn print_array(&self, arr: &[Value], indent: usize) -> String {
        if arr.is_empty() {
            return "[]".to_string();
        }

        if self.options.pretty {
            let items: Vec<String> = arr
                .iter()
                .map(|v| {
                    format!(
                        "{}{}",
                        self.indent(indent + 1),
                        self.print_value(v, indent + 1)
                    )
                })
                .collect();
            format!(
                "[\n{}\n{}]",
                items.join(",\n"),
                self.indent(indent)
            )
        } else {
            let items: Vec<String> = arr.iter().map(|v| self.print_value(v, indent)).collect();
            format!("[{}]", items.join(","))
        }
    }

    fn print_object(&self, obj: &indexmap::IndexMap<String, Value>, indent: usize) -> String {
        if obj.is_empty() {
            return "{}".to_string();
        }

        // Insertion order, as parsed
        if self.options.pretty {
            let items: Vec<String> = obj
                .iter()
                .map(|(k, v)| {
                    format!(
                        "{}{}: {}",
                        self.indent(indent + 1),
                        self.print_key(k),
                        self.print_value(v, indent + 1)
                    )
                })
                .collect();
            format!(
                "{{\n{}\n{}}}",
                items.join(",\n"),
                self.indent(indent)
            )
        } else {
            let items: Vec<String> = obj
                .iter()
                .map(|(k, v)| format!("{}:{}", self.print_key(k), self.print_value(v, indent)))
                .collect();
            format!("{{{}}}", items.join(","))
        }
    }

    fn indent(&self, level: usize) -> String {
        "  ".repeat(level)
    }
}

fn is_bare_key(key: &str) -> bool {
    !key.is_empty()
        && !key.chars().next().is_some_and(|c| c.is_ascii_digit())
        && key.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

fn escape_json(s: &str) -> String {
    s.chars()
        .flat_map(|c| match c {
            '"' => vec!['\\', '"'],
            '\\' => vec!['\\', '\\'],
            '\n' => vec!['\\', 'n'],
            '\r' => vec!['\\', 'r'],
            '\t' => vec!['\\', 't'],
            c if c.is_control() => format!("\\u{:04x}", c as u32).chars().collect(),
            c => vec![c],
        })
        .collect()
}

fn escape_single(s: &str) -> String {
    s.chars()
        .flat_map(|c| match c {
            '\'' => vec!['\\', '\''],
            '\\' => vec!['\\', '\\'],
            '\n' => vec!['\\', 'n'],
            c => vec![c],
        })
        .collect()
}
