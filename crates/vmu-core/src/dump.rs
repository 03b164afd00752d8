//! Depth-limited value dumps for log messages.
//!
//! Values are serialized with serde straight into a trimmed tree. Below the
//! depth limit a container is counted, never visited, so the output stays
//! bounded even for very deep or self-referencing values.

use colored::Colorize;
use serde::ser;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

/// Nesting depth used by [`safe_dump`].
pub const DEFAULT_MAX_DEPTH: usize = 2;

/// Options and newtypes followed in a row before the dump gives up on a value.
const MAX_WRAPPER_CHAIN: usize = 64;

/// Output layout of a dump.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DumpStyle {
    /// Indented `key: value` lines, readable on a console.
    #[default]
    Console,
    /// Same layout as `Console` with ANSI colors (when the terminal allows).
    Colored,
    /// Single-line JSON.
    Compact,
}

/// Options for [`dump_with`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpOptions {
    /// Number of nested levels rendered below the root value.
    pub max_depth: usize,
    pub style: DumpStyle,
}

impl Default for DumpOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            style: DumpStyle::Console,
        }
    }
}

impl DumpOptions {
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_style(mut self, style: DumpStyle) -> Self {
        self.style = style;
        self
    }
}

/// Dump a value for a log message, `"null"` when there is none.
pub fn safe_dump<T: Serialize + ?Sized>(value: Option<&T>) -> String {
    match value {
        Some(value) => dump_with(value, &DumpOptions::default()),
        None => "null".to_string(),
    }
}

/// Dump a value with explicit options. Never fails.
pub fn dump_with<T: Serialize + ?Sized>(value: &T, options: &DumpOptions) -> String {
    let node = match value.serialize(NodeSerializer::new(options.max_depth)) {
        Ok(node) => node,
        Err(e) => return format!("<unrenderable: {}>", e),
    };

    match options.style {
        DumpStyle::Console => node.render_console(false),
        DumpStyle::Colored => node.render_console(true),
        DumpStyle::Compact => node.into_value().to_string(),
    }
}

/// A value trimmed to the depth limit.
#[derive(Debug)]
enum Node {
    Scalar(Value),
    Object(Vec<(String, Node)>),
    Array(Vec<Node>),
    ElidedObject(usize),
    ElidedArray(usize),
    /// A chain of wrappers too long to follow.
    TooDeep,
}

impl Node {
    fn is_block(&self) -> bool {
        match self {
            Node::Object(fields) => !fields.is_empty(),
            Node::Array(items) => !items.is_empty(),
            _ => false,
        }
    }

    /// Single-line form of a scalar, empty container or placeholder.
    fn inline(&self) -> String {
        match self {
            Node::Scalar(value) => value.to_string(),
            Node::Object(_) => "{}".to_string(),
            Node::Array(_) => "[]".to_string(),
            Node::ElidedObject(len) => format!("{{...}} ({} {})", len, plural(*len, "field")),
            Node::ElidedArray(len) => format!("[...] ({} {})", len, plural(*len, "item")),
            Node::TooDeep => "<too deep>".to_string(),
        }
    }

    fn styled(&self, colored: bool) -> String {
        let text = self.inline();
        if !colored {
            return text;
        }
        match self {
            Node::Scalar(Value::String(_)) => text.green().to_string(),
            Node::Scalar(Value::Number(_)) => text.yellow().to_string(),
            Node::Scalar(_) => text.magenta().to_string(),
            Node::Object(_) | Node::Array(_) => text,
            _ => text.dimmed().to_string(),
        }
    }

    fn render_console(&self, colored: bool) -> String {
        if !self.is_block() {
            return self.styled(colored);
        }
        let mut console = ConsoleLines {
            colored,
            lines: Vec::new(),
        };
        console.block(self, 0);
        console.lines.join("\n")
    }

    fn into_value(self) -> Value {
        match self {
            Node::Scalar(value) => value,
            Node::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(key, node)| (key, node.into_value()))
                    .collect::<Map<String, Value>>(),
            ),
            Node::Array(items) => Value::Array(items.into_iter().map(Node::into_value).collect()),
            elided => Value::String(elided.inline()),
        }
    }
}

/// Indented `key: value` output.
struct ConsoleLines {
    colored: bool,
    lines: Vec<String>,
}

impl ConsoleLines {
    fn block(&mut self, node: &Node, indent: usize) {
        match node {
            Node::Object(fields) => {
                for (key, value) in fields {
                    self.entry(Some(key), value, indent);
                }
            }
            Node::Array(items) => {
                for item in items {
                    self.entry(None, item, indent);
                }
            }
            _ => {
                let line = format!("{}{}", "  ".repeat(indent), node.styled(self.colored));
                self.lines.push(line);
            }
        }
    }

    /// One field (`key:`) or array item (`-`).
    fn entry(&mut self, key: Option<&str>, node: &Node, indent: usize) {
        let pad = "  ".repeat(indent);
        let label = match key {
            Some(key) if self.colored => format!("{}:", key.cyan()),
            Some(key) => format!("{}:", key),
            None => "-".to_string(),
        };

        if node.is_block() {
            self.lines.push(format!("{}{}", pad, label));
            self.block(node, indent + 1);
        } else {
            self.lines
                .push(format!("{}{} {}", pad, label, node.styled(self.colored)));
        }
    }
}

fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        noun.to_string()
    } else {
        format!("{}s", noun)
    }
}

/// Failure reported by a value's own `Serialize` impl.
#[derive(Debug, Error)]
#[error("{0}")]
struct DumpError(String);

impl ser::Error for DumpError {
    fn custom<T: std::fmt::Display>(msg: T) -> Self {
        DumpError(msg.to_string())
    }
}

fn scalar(value: impl Into<Value>) -> Node {
    Node::Scalar(value.into())
}

/// Serializer that builds a [`Node`] and stops descending at the depth limit.
#[derive(Debug, Clone, Copy)]
struct NodeSerializer {
    /// Container levels still rendered in full.
    remaining: usize,
    /// Wrappers followed since the last container.
    wrappers: usize,
}

impl NodeSerializer {
    fn new(remaining: usize) -> Self {
        Self {
            remaining,
            wrappers: 0,
        }
    }

    fn child(self) -> Self {
        Self::new(self.remaining.saturating_sub(1))
    }

    fn wrapped<T: Serialize + ?Sized>(self, value: &T) -> Result<Node, DumpError> {
        if self.wrappers >= MAX_WRAPPER_CHAIN {
            return Ok(Node::TooDeep);
        }
        value.serialize(Self {
            wrappers: self.wrappers + 1,
            ..self
        })
    }
}

/// Text of a map key.
fn key_text<T: Serialize + ?Sized>(key: &T) -> Result<String, DumpError> {
    Ok(match key.serialize(NodeSerializer::new(0))? {
        Node::Scalar(Value::String(text)) => text,
        node => node.inline(),
    })
}

impl ser::Serializer for NodeSerializer {
    type Ok = Node;
    type Error = DumpError;
    type SerializeSeq = Collector;
    type SerializeTuple = Collector;
    type SerializeTupleStruct = Collector;
    type SerializeTupleVariant = Collector;
    type SerializeMap = Collector;
    type SerializeStruct = Collector;
    type SerializeStructVariant = Collector;

    fn serialize_bool(self, v: bool) -> Result<Node, DumpError> {
        Ok(scalar(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Node, DumpError> {
        Ok(scalar(v))
    }

    fn serialize_i16(self, v: i16) -> Result<Node, DumpError> {
        Ok(scalar(v))
    }

    fn serialize_i32(self, v: i32) -> Result<Node, DumpError> {
        Ok(scalar(v))
    }

    fn serialize_i64(self, v: i64) -> Result<Node, DumpError> {
        Ok(scalar(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Node, DumpError> {
        Ok(scalar(v))
    }

    fn serialize_u16(self, v: u16) -> Result<Node, DumpError> {
        Ok(scalar(v))
    }

    fn serialize_u32(self, v: u32) -> Result<Node, DumpError> {
        Ok(scalar(v))
    }

    fn serialize_u64(self, v: u64) -> Result<Node, DumpError> {
        Ok(scalar(v))
    }

    // Non-finite floats become null, as in JSON
    fn serialize_f32(self, v: f32) -> Result<Node, DumpError> {
        Ok(scalar(v))
    }

    fn serialize_f64(self, v: f64) -> Result<Node, DumpError> {
        Ok(scalar(v))
    }

    fn serialize_char(self, v: char) -> Result<Node, DumpError> {
        Ok(scalar(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Node, DumpError> {
        Ok(scalar(v))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Node, DumpError> {
        if self.remaining == 0 && !v.is_empty() {
            return Ok(Node::ElidedArray(v.len()));
        }
        Ok(Node::Array(v.iter().map(|byte| scalar(*byte)).collect()))
    }

    fn serialize_none(self) -> Result<Node, DumpError> {
        Ok(Node::Scalar(Value::Null))
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Node, DumpError> {
        self.wrapped(value)
    }

    fn serialize_unit(self) -> Result<Node, DumpError> {
        Ok(Node::Scalar(Value::Null))
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Node, DumpError> {
        Ok(Node::Scalar(Value::Null))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Node, DumpError> {
        Ok(scalar(variant))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Node, DumpError> {
        self.wrapped(value)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Node, DumpError> {
        if self.remaining == 0 {
            return Ok(Node::ElidedObject(1));
        }
        let inner = value.serialize(self.child())?;
        Ok(Node::Object(vec![(variant.to_string(), inner)]))
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Collector, DumpError> {
        Ok(Collector::items(self.remaining, None))
    }

    fn serialize_tuple(self, _len: usize) -> Result<Collector, DumpError> {
        Ok(Collector::items(self.remaining, None))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Collector, DumpError> {
        Ok(Collector::items(self.remaining, None))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Collector, DumpError> {
        Ok(Collector::items(self.remaining, Some(variant)))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Collector, DumpError> {
        Ok(Collector::fields(self.remaining, None))
    }

    fn serialize_struct(self, _name: &'static str, _len: usize) -> Result<Collector, DumpError> {
        Ok(Collector::fields(self.remaining, None))
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Collector, DumpError> {
        Ok(Collector::fields(self.remaining, Some(variant)))
    }
}

enum Entries {
    Items(Vec<Node>),
    Fields(Vec<(String, Node)>),
}

/// Builds one container. At zero remaining depth it only counts entries.
struct Collector {
    remaining: usize,
    count: usize,
    entries: Entries,
    pending_key: Option<String>,
    /// Enum variant wrapping the container, and whether that wrapper is elided.
    variant: Option<(&'static str, bool)>,
}

impl Collector {
    fn items(remaining: usize, variant: Option<&'static str>) -> Self {
        Self::new(remaining, variant, Entries::Items(Vec::new()))
    }

    fn fields(remaining: usize, variant: Option<&'static str>) -> Self {
        Self::new(remaining, variant, Entries::Fields(Vec::new()))
    }

    fn new(remaining: usize, variant: Option<&'static str>, entries: Entries) -> Self {
        // A variant is an object of one field around the container
        let (remaining, variant) = match variant {
            Some(name) => (remaining.saturating_sub(1), Some((name, remaining == 0))),
            None => (remaining, None),
        };
        Self {
            remaining,
            count: 0,
            entries,
            pending_key: None,
            variant,
        }
    }

    fn visit<T: Serialize + ?Sized>(&self, value: &T) -> Result<Node, DumpError> {
        value.serialize(NodeSerializer::new(self.remaining).child())
    }

    fn push_item<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DumpError> {
        self.count += 1;
        if self.remaining > 0 {
            let node = self.visit(value)?;
            if let Entries::Items(items) = &mut self.entries {
                items.push(node);
            }
        }
        Ok(())
    }

    fn push_field<T: Serialize + ?Sized>(&mut self, key: String, value: &T) -> Result<(), DumpError> {
        let node = self.visit(value)?;
        if let Entries::Fields(fields) = &mut self.entries {
            fields.push((key, node));
        }
        Ok(())
    }

    fn finish(self) -> Result<Node, DumpError> {
        let elided = self.remaining == 0 && self.count > 0;
        let node = match self.entries {
            Entries::Items(_) if elided => Node::ElidedArray(self.count),
            Entries::Fields(_) if elided => Node::ElidedObject(self.count),
            Entries::Items(items) => Node::Array(items),
            Entries::Fields(fields) => Node::Object(fields),
        };

        Ok(match self.variant {
            None => node,
            Some((_, true)) => Node::ElidedObject(1),
            Some((name, false)) => Node::Object(vec![(name.to_string(), node)]),
        })
    }
}

impl ser::SerializeSeq for Collector {
    type Ok = Node;
    type Error = DumpError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DumpError> {
        self.push_item(value)
    }

    fn end(self) -> Result<Node, DumpError> {
        self.finish()
    }
}

impl ser::SerializeTuple for Collector {
    type Ok = Node;
    type Error = DumpError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DumpError> {
        self.push_item(value)
    }

    fn end(self) -> Result<Node, DumpError> {
        self.finish()
    }
}

impl ser::SerializeTupleStruct for Collector {
    type Ok = Node;
    type Error = DumpError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DumpError> {
        self.push_item(value)
    }

    fn end(self) -> Result<Node, DumpError> {
        self.finish()
    }
}

impl ser::SerializeTupleVariant for Collector {
    type Ok = Node;
    type Error = DumpError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DumpError> {
        self.push_item(value)
    }

    fn end(self) -> Result<Node, DumpError> {
        self.finish()
    }
}

impl ser::SerializeMap for Collector {
    type Ok = Node;
    type Error = DumpError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), DumpError> {
        self.count += 1;
        if self.remaining > 0 {
            self.pending_key = Some(key_text(key)?);
        }
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), DumpError> {
        if self.remaining > 0 {
            let key = self.pending_key.take().unwrap_or_default();
            self.push_field(key, value)?;
        }
        Ok(())
    }

    fn end(self) -> Result<Node, DumpError> {
        self.finish()
    }
}

impl ser::SerializeStruct for Collector {
    type Ok = Node;
    type Error = DumpError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), DumpError> {
        self.count += 1;
        if self.remaining > 0 {
            self.push_field(key.to_string(), value)?;
        }
        Ok(())
    }

    fn end(self) -> Result<Node, DumpError> {
        self.finish()
    }
}

impl ser::SerializeStructVariant for Collector {
    type Ok = Node;
    type Error = DumpError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), DumpError> {
        ser::SerializeStruct::serialize_field(self, key, value)
    }

    fn end(self) -> Result<Node, DumpError> {
        self.finish()
    }
}
