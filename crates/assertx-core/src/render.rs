//! Text renderings of inspected values for failure messages.

use crate::config::DiffOptions;
use crate::inspect::{Inspect, Scalar, Shape};
use crate::policy::{FieldFilter, FieldSite};
use std::collections::{HashMap, HashSet};
use std::fmt::Write as _;

/// Render a value on one line with default options.
///
/// ```
/// use assertx_core::render::compact;
///
/// assert_eq!(compact(&vec![Some(1u8), None]), "[Some(1), None]");
/// ```
pub fn compact(value: &dyn Inspect) -> String {
    Renderer::new(&DiffOptions::default(), false, None).render(value, &[])
}

/// Render a value over multiple lines.
pub fn pretty(value: &dyn Inspect, options: &DiffOptions) -> String {
    Renderer::new(options, true, None).render(value, &[])
}

/// Render a value located at `path`, leaving out fields `filter` ignores.
///
/// `want` is the expected counterpart of `value` (the value itself when
/// rendering the expected side). The filter is shown the counterpart's fields,
/// so rules that look at expected values hide the same fields in both
/// renderings. Fields without a counterpart are only subject to the rules that
/// do not look at values.
pub(crate) fn render_filtered(
    value: &dyn Inspect,
    want: Option<&dyn Inspect>,
    path: &[&'static str],
    options: &DiffOptions,
    pretty: bool,
    filter: &dyn FieldFilter,
) -> String {
    Renderer::new(options, pretty, Some(filter)).render_against(value, want, path)
}

/// Render a type name according to the options.
pub fn type_name(name: &str, options: &DiffOptions) -> String {
    if options.strip_type_names {
        strip_type_names(name)
    } else {
        name.to_string()
    }
}

/// Remove module paths from a type name, generics included.
///
/// ```
/// use assertx_core::render::strip_type_names;
///
/// assert_eq!(
///     strip_type_names("alloc::vec::Vec<my_app::model::Account>"),
///     "Vec<Account>"
/// );
/// ```
pub fn strip_type_names(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut segment_start = 0;
    let mut chars = name.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ':' && chars.peek() == Some(&':') {
            chars.next();
            out.truncate(segment_start);
        } else {
            out.push(c);
            if !(c.is_alphanumeric() || c == '_') {
                segment_start = out.len();
            }
        }
    }
    out
}

/// Cut `text` to at most `max` bytes on a char boundary.
pub fn truncate(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

struct Renderer<'o> {
    options: &'o DiffOptions,
    pretty: bool,
    filter: Option<&'o dyn FieldFilter>,
    on_stack: HashSet<usize>,
    path: Vec<&'static str>,
}

impl<'o> Renderer<'o> {
    fn new(options: &'o DiffOptions, pretty: bool, filter: Option<&'o dyn FieldFilter>) -> Self {
        Self {
            options,
            pretty,
            filter,
            on_stack: HashSet::new(),
            path: Vec::new(),
        }
    }

    fn render(self, value: &dyn Inspect, path: &[&'static str]) -> String {
        self.render_against(value, Some(value), path)
    }

    fn render_against(
        mut self,
        value: &dyn Inspect,
        want: Option<&dyn Inspect>,
        path: &[&'static str],
    ) -> String {
        self.path.extend_from_slice(path);
        let mut out = String::new();
        self.write_value(&mut out, value, want, 0);
        out
    }

    /// Write `value`, walking its expected counterpart `want` alongside.
    fn write_value(
        &mut self,
        out: &mut String,
        value: &dyn Inspect,
        want: Option<&dyn Inspect>,
        depth: usize,
    ) {
        let want_shape = want.map(|w| w.shape());
        match value.shape() {
            Shape::Nil => out.push_str("None"),
            Shape::Scalar(scalar) => write_scalar(out, &scalar),
            Shape::Bytes(bytes) => {
                let _ = write!(out, "b\"{}\"", bytes.escape_ascii());
            }
            Shape::Seq(items) | Shape::Array(items) => {
                let want_items = match want_shape {
                    Some(Shape::Seq(w) | Shape::Array(w)) => w,
                    _ => Vec::new(),
                };
                let pairs = items
                    .iter()
                    .enumerate()
                    .map(|(i, item)| (*item, want_items.get(i).copied()))
                    .collect::<Vec<_>>();
                self.write_list(out, "[", "]", &pairs, depth);
            }
            Shape::Set(items) => {
                let mut items = items;
                items.sort_by_cached_key(|item| compact(*item));
                // members only pair up when rendering the expected side itself
                let is_want = want.is_some_and(|w| same_value(value, w));
                let pairs = items
                    .iter()
                    .map(|item| (*item, is_want.then_some(*item)))
                    .collect::<Vec<_>>();
                self.write_list(out, "{", "}", &pairs, depth);
            }
            Shape::Map(entries) => {
                let want_entries = match want_shape {
                    Some(Shape::Map(w)) => w,
                    _ => Vec::new(),
                };
                self.write_map(out, entries, want_entries, depth);
            }
            Shape::Struct(fields) => {
                let name = type_name(value.type_name(), self.options);
                let want_fields = match want_shape {
                    Some(Shape::Struct(w))
                        if w.len() == fields.len()
                            && want.is_some_and(|v| v.type_name() == value.type_name()) =>
                    {
                        w
                    }
                    _ => Vec::new(),
                };
                let mut rendered = Vec::with_capacity(fields.len());
                for (i, field) in fields.iter().enumerate() {
                    let field_want = want_fields.get(i).map(|w| w.value);
                    self.path.push(field.name);
                    let site = FieldSite {
                        path: &self.path,
                        exported: field.exported,
                        want: field_want,
                    };
                    let ignored = self.filter.is_some_and(|f| f.ignores(&site));
                    if !ignored {
                        let mut text = String::new();
                        self.write_value(&mut text, field.value, field_want, depth + 1);
                        rendered.push((field.name.to_string(), text));
                    }
                    self.path.pop();
                }
                out.push_str(&name);
                self.write_entries(out, " {", "}", rendered, depth);
            }
            Shape::Pointer { addr, target } => {
                if !self.on_stack.insert(addr) {
                    out.push_str("<cycle>");
                    return;
                }
                let want_target = match want_shape {
                    Some(Shape::Pointer { target, .. }) => Some(target),
                    _ => None,
                };
                out.push('&');
                self.write_value(out, target, want_target, depth);
                self.on_stack.remove(&addr);
            }
            Shape::Some(inner) => {
                let want_inner = match want_shape {
                    Some(Shape::Some(w)) => Some(w),
                    _ => None,
                };
                out.push_str("Some(");
                self.write_value(out, inner, want_inner, depth);
                out.push(')');
            }
            Shape::Error(err) => {
                let _ = write!(out, "error({:?})", err.to_string());
            }
            Shape::Opaque(text) => out.push_str(&text),
        }
    }

    fn write_list(
        &mut self,
        out: &mut String,
        open: &str,
        close: &str,
        items: &[(&dyn Inspect, Option<&dyn Inspect>)],
        depth: usize,
    ) {
        let rendered: Vec<String> = items
            .iter()
            .map(|(item, want)| {
                let mut text = String::new();
                self.write_value(&mut text, *item, *want, depth + 1);
                text
            })
            .collect();
        self.write_items(out, open, close, rendered, depth);
    }

    fn write_map(
        &mut self,
        out: &mut String,
        entries: Vec<(&dyn Inspect, &dyn Inspect)>,
        want_entries: Vec<(&dyn Inspect, &dyn Inspect)>,
        depth: usize,
    ) {
        let want_by_key: HashMap<String, &dyn Inspect> = want_entries
            .into_iter()
            .map(|(key, value)| (compact(key), value))
            .collect();
        let mut rendered: Vec<(String, String)> = entries
            .into_iter()
            .map(|(key, value)| {
                let key = compact(key);
                let mut text = String::new();
                let want = want_by_key.get(&key).copied();
                self.write_value(&mut text, value, want, depth + 1);
                (key, text)
            })
            .collect();
        rendered.sort();
        self.write_entries(out, "{", "}", rendered, depth);
    }

    fn write_entries(
        &self,
        out: &mut String,
        open: &str,
        close: &str,
        entries: Vec<(String, String)>,
        depth: usize,
    ) {
        let separator = &self.options.separator;
        let items = entries
            .into_iter()
            .map(|(key, value)| format!("{key}{separator}{value}"))
            .collect();
        self.write_items(out, open, close, items, depth);
    }

    fn write_items(
        &self,
        out: &mut String,
        open: &str,
        close: &str,
        items: Vec<String>,
        depth: usize,
    ) {
        out.push_str(open);
        if items.is_empty() {
            out.push_str(close.trim_start());
            return;
        }
        if self.pretty {
            let inner = " ".repeat(self.options.indent * (depth + 1));
            let outer = " ".repeat(self.options.indent * depth);
            out.push('\n');
            for item in items {
                let _ = writeln!(out, "{inner}{item},");
            }
            out.push_str(&outer);
        } else {
            // struct bodies are padded, lists and maps are not
            let spaced = open == " {";
            if spaced {
                out.push(' ');
            }
            out.push_str(&items.join(", "));
            if spaced {
                out.push(' ');
            }
        }
        out.push_str(close);
    }
}

fn same_value(a: &dyn Inspect, b: &dyn Inspect) -> bool {
    std::ptr::addr_eq(a, b)
}

fn write_scalar(out: &mut String, scalar: &Scalar<'_>) {
    let _ = match scalar {
        Scalar::Unit => write!(out, "()"),
        Scalar::Bool(b) => write!(out, "{b}"),
        Scalar::Int(i) => write!(out, "{i}"),
        Scalar::Uint(u) => write!(out, "{u}"),
        Scalar::Float(f) => write!(out, "{f:?}"),
        Scalar::Char(c) => write!(out, "{c:?}"),
        Scalar::Str(s) => write!(out, "{s:?}"),
    };
}
