//! Compiles a flat schema table into the node tree the validator walks.

use super::{Bound, FieldDescriptor, FieldKind, SchemaTable};
use crate::duration::HostDuration;
use crate::error::SchemaError;
use crate::validator;
use serde_json::Value;
use std::collections::HashSet;
use std::fmt::Write as _;

/// Inclusive bounds of a numeric field.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NumericBounds {
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
}

impl NumericBounds {
    /// Whether `value` lies within the bounds.
    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.minimum.map_or(true, |min| value >= min) && self.maximum.map_or(true, |max| value <= max)
    }

    fn describe(&self) -> Option<String> {
        match (self.minimum, self.maximum) {
            (Some(min), Some(max)) => Some(format!("between {min} and {max}")),
            (Some(min), None) => Some(format!(">= {min}")),
            (None, Some(max)) => Some(format!("<= {max}")),
            (None, None) => None,
        }
    }
}

/// What happens to members an object does not declare.
#[derive(Debug, Clone, PartialEq)]
pub enum AdditionalKeys {
    /// Undeclared members are unknown fields.
    Closed,
    /// Undeclared members pass through unchecked.
    Open,
    /// Undeclared members must each satisfy this node.
    Typed(Box<SchemaNode>),
}

/// An object with declared members.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectNode {
    pub fields: Vec<(String, SchemaNode)>,
    pub additional: AdditionalKeys,
}

impl ObjectNode {
    /// The declared member `name`.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&SchemaNode> {
        self.fields.iter().find(|(key, _)| key == name).map(|(_, node)| node)
    }

    /// The declared member matching `name` ignoring ASCII case, with its
    /// declared spelling.
    #[must_use]
    pub fn field_ignore_case(&self, name: &str) -> Option<(&str, &SchemaNode)> {
        self.fields
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(key, node)| (key.as_str(), node))
    }

    /// Declared member names, comma separated, for error messages.
    #[must_use]
    pub fn declared_names(&self) -> String {
        self.fields
            .iter()
            .map(|(key, _)| key.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// An array and its item rule.
#[derive(Debug, Clone, PartialEq)]
pub struct ArrayNode {
    pub items: Box<SchemaNode>,
    pub max_items: Option<usize>,
    pub unique_items: bool,
}

/// The kind of a node together with its kind-specific constraints.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    String,
    Integer(NumericBounds),
    Number(NumericBounds),
    Boolean,
    Enum(Vec<String>),
    Version(Vec<String>),
    Duration {
        minimum: Option<HostDuration>,
        maximum: Option<HostDuration>,
    },
    Object(ObjectNode),
    Array(ArrayNode),
    /// Extension point; any string-keyed object.
    Map,
    Any,
}

impl NodeKind {
    /// Human readable description of what the node accepts.
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::String => "string".to_string(),
            Self::Integer(bounds) => with_suffix("integer", bounds.describe()),
            Self::Number(bounds) => with_suffix("number", bounds.describe()),
            Self::Boolean => "boolean".to_string(),
            Self::Enum(values) | Self::Version(values) => format!("one of {}", quote_list(values)),
            Self::Duration { minimum, maximum } => {
                let mut text = "duration".to_string();
                if let Some(min) = minimum {
                    let _ = write!(text, " >= {min}");
                }
                if let Some(max) = maximum {
                    let _ = write!(text, " <= {max}");
                }
                text
            }
            Self::Object(_) => "object".to_string(),
            Self::Array(array) => format!("array of {}", array.items.kind.describe()),
            Self::Map => "object (extension map)".to_string(),
            Self::Any => "any value".to_string(),
        }
    }
}

fn with_suffix(base: &str, suffix: Option<String>) -> String {
    suffix.map_or_else(|| base.to_string(), |s| format!("{base} {s}"))
}

/// `"a", "b", "c"`
pub(crate) fn quote_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("\"{v}\""))
        .collect::<Vec<_>>()
        .join(", ")
}

/// A field rule: kind plus presence, nullability and default.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaNode {
    pub kind: NodeKind,
    pub required: bool,
    pub nullable: bool,
    pub default: Option<Value>,
    pub description: Option<String>,
}

impl SchemaNode {
    /// What the node accepts, including `null` when nullable.
    #[must_use]
    pub fn expected(&self) -> String {
        if self.nullable {
            format!("{} or null", self.kind.describe())
        } else {
            self.kind.describe()
        }
    }

    fn any() -> Self {
        Self {
            kind: NodeKind::Any,
            required: false,
            nullable: true,
            default: None,
            description: None,
        }
    }
}

/// A compiled schema, ready for validation.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledSchema {
    name: String,
    version: Option<String>,
    root: ObjectNode,
}

impl CompiledSchema {
    /// Document family, e.g. `host`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Schema version the table declares.
    #[must_use]
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// The root object rule.
    #[must_use]
    pub const fn root(&self) -> &ObjectNode {
        &self.root
    }

    /// The node at a dotted path of declared members, e.g.
    /// `extensions.queues.batchSize`.
    #[must_use]
    pub fn node_at(&self, path: &str) -> Option<&SchemaNode> {
        let mut parts = path.split('.');
        let mut node = self.root.field(parts.next()?)?;
        for part in parts {
            match &node.kind {
                NodeKind::Object(object) => node = object.field(part)?,
                _ => return None,
            }
        }
        Some(node)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Segment {
    Key(String),
    Items,
    Additional,
}

struct Row {
    segments: Vec<Segment>,
    descriptor: FieldDescriptor,
}

struct Compiler<'a> {
    schema: &'a str,
    rows: Vec<Row>,
}

pub(super) fn compile(table: &SchemaTable) -> Result<CompiledSchema, SchemaError> {
    let descriptors = table.expanded_fields()?;
    let mut rows = Vec::with_capacity(descriptors.len());
    let mut seen = HashSet::new();

    for descriptor in descriptors {
        let segments = parse_path(&descriptor.path).ok_or_else(|| SchemaError::InvalidField {
            schema: table.name.clone(),
            path: descriptor.path.clone(),
            message: "malformed path".to_string(),
        })?;
        if !seen.insert(segments.clone()) {
            return Err(SchemaError::InvalidField {
                schema: table.name.clone(),
                path: descriptor.path,
                message: "declared more than once".to_string(),
            });
        }
        rows.push(Row { segments, descriptor });
    }

    let compiler = Compiler {
        schema: &table.name,
        rows,
    };
    compiler.check_parents()?;
    let root = compiler.build_object(&[], table.root_open, "")?;

    Ok(CompiledSchema {
        name: table.name.clone(),
        version: table.version.clone(),
        root,
    })
}

fn parse_path(path: &str) -> Option<Vec<Segment>> {
    let mut segments = Vec::new();
    for part in path.split('.') {
        if part == "*" {
            segments.push(Segment::Additional);
        } else if let Some(name) = part.strip_suffix("[]") {
            if name.is_empty() || name.contains(['[', ']', '*']) {
                return None;
            }
            segments.push(Segment::Key(name.to_string()));
            segments.push(Segment::Items);
        } else {
            if part.is_empty() || part.contains(['[', ']', '*']) {
                return None;
            }
            segments.push(Segment::Key(part.to_string()));
        }
    }
    Some(segments)
}

impl Compiler<'_> {
    fn invalid(&self, path: &str, message: impl Into<String>) -> SchemaError {
        SchemaError::InvalidField {
            schema: self.schema.to_string(),
            path: path.to_string(),
            message: message.into(),
        }
    }

    fn row_at(&self, segments: &[Segment]) -> Option<&Row> {
        self.rows.iter().find(|row| row.segments == segments)
    }

    /// Rows exactly one segment below `prefix`, in declaration order.
    fn children<'r>(&'r self, prefix: &'r [Segment]) -> impl Iterator<Item = &'r Row> + 'r {
        self.rows
            .iter()
            .filter(move |row| row.segments.len() == prefix.len() + 1 && row.segments.starts_with(prefix))
    }

    fn check_parents(&self) -> Result<(), SchemaError> {
        for row in &self.rows {
            let Some((last, parent)) = row.segments.split_last() else {
                return Err(self.invalid(&row.descriptor.path, "empty path"));
            };
            let parent_kind = if parent.is_empty() {
                FieldKind::Object
            } else {
                match self.row_at(parent) {
                    Some(parent_row) => parent_row.descriptor.kind,
                    None => return Err(self.invalid(&row.descriptor.path, "parent field is not declared")),
                }
            };
            let fits = match last {
                Segment::Key(_) | Segment::Additional => parent_kind == FieldKind::Object,
                Segment::Items => parent_kind == FieldKind::Array,
            };
            if !fits {
                return Err(self.invalid(
                    &row.descriptor.path,
                    format!("cannot be declared below a {parent_kind:?} field"),
                ));
            }
        }
        Ok(())
    }

    fn build_object(&self, prefix: &[Segment], open: bool, path: &str) -> Result<ObjectNode, SchemaError> {
        let mut fields = Vec::new();
        let mut additional = None;

        for row in self.children(prefix) {
            let node = self.build_node(row)?;
            match row.segments.last() {
                Some(Segment::Key(name)) => fields.push((name.clone(), node)),
                Some(Segment::Additional) => additional = Some(node),
                _ => {}
            }
        }

        let additional = match (additional, open) {
            (Some(_), true) => {
                return Err(self.invalid(path, "an open object cannot also declare '*' members"));
            }
            (Some(node), false) => AdditionalKeys::Typed(Box::new(node)),
            (None, true) => AdditionalKeys::Open,
            (None, false) => AdditionalKeys::Closed,
        };
        Ok(ObjectNode { fields, additional })
    }

    fn build_node(&self, row: &Row) -> Result<SchemaNode, SchemaError> {
        let d = &row.descriptor;
        let path = d.path.as_str();

        if !d.values.is_empty() && !matches!(d.kind, FieldKind::Enum | FieldKind::Version) {
            return Err(self.invalid(path, "'values' only applies to enum and version fields"));
        }
        if (d.minimum.is_some() || d.maximum.is_some())
            && !matches!(d.kind, FieldKind::Integer | FieldKind::Number | FieldKind::Duration)
        {
            return Err(self.invalid(path, "bounds only apply to integer, number and duration fields"));
        }
        if (d.max_items.is_some() || d.unique_items) && d.kind != FieldKind::Array {
            return Err(self.invalid(path, "'maxItems' and 'uniqueItems' only apply to arrays"));
        }
        if d.open && d.kind != FieldKind::Object {
            return Err(self.invalid(path, "'open' only applies to objects"));
        }
        if d.required && d.default.is_some() {
            return Err(self.invalid(path, "a required field cannot have a default"));
        }

        let kind = match d.kind {
            FieldKind::String => NodeKind::String,
            FieldKind::Boolean => NodeKind::Boolean,
            FieldKind::Map => NodeKind::Map,
            FieldKind::Any => NodeKind::Any,
            FieldKind::Integer => NodeKind::Integer(self.numeric_bounds(d)?),
            FieldKind::Number => NodeKind::Number(self.numeric_bounds(d)?),
            FieldKind::Enum | FieldKind::Version => {
                if d.values.is_empty() {
                    return Err(self.invalid(path, "enum and version fields need 'values'"));
                }
                if d.kind == FieldKind::Enum {
                    NodeKind::Enum(d.values.clone())
                } else {
                    NodeKind::Version(d.values.clone())
                }
            }
            FieldKind::Duration => {
                let minimum = self.duration_bound(path, d.minimum.as_ref())?;
                let maximum = self.duration_bound(path, d.maximum.as_ref())?;
                if let (Some(min), Some(max)) = (&minimum, &maximum) {
                    if min.as_duration() > max.as_duration() {
                        return Err(self.invalid(path, "minimum is greater than maximum"));
                    }
                }
                NodeKind::Duration { minimum, maximum }
            }
            FieldKind::Object => NodeKind::Object(self.build_object(&row.segments, d.open, path)?),
            FieldKind::Array => {
                let mut items_path = row.segments.clone();
                items_path.push(Segment::Items);
                let items = match self.row_at(&items_path) {
                    Some(items_row) => self.build_node(items_row)?,
                    None => SchemaNode::any(),
                };
                NodeKind::Array(ArrayNode {
                    items: Box::new(items),
                    max_items: d.max_items,
                    unique_items: d.unique_items,
                })
            }
        };

        let node = SchemaNode {
            kind,
            required: d.required,
            nullable: d.nullable,
            default: d.default.clone(),
            description: d.description.clone(),
        };

        if let Some(default) = &node.default {
            if let Some(problem) = validator::check_node(&node, default).into_iter().next() {
                return Err(self.invalid(path, format!("default does not validate: {problem}")));
            }
        }
        Ok(node)
    }

    fn numeric_bounds(&self, d: &FieldDescriptor) -> Result<NumericBounds, SchemaError> {
        let number = |bound: Option<&Bound>| match bound {
            None => Ok(None),
            Some(Bound::Number(n)) => Ok(Some(*n)),
            Some(Bound::Duration(text)) => Err(self.invalid(&d.path, format!("bound '{text}' is not a number"))),
        };
        let bounds = NumericBounds {
            minimum: number(d.minimum.as_ref())?,
            maximum: number(d.maximum.as_ref())?,
        };
        if let (Some(min), Some(max)) = (bounds.minimum, bounds.maximum) {
            if min > max {
                return Err(self.invalid(&d.path, "minimum is greater than maximum"));
            }
        }
        Ok(bounds)
    }

    fn duration_bound(&self, path: &str, bound: Option<&Bound>) -> Result<Option<HostDuration>, SchemaError> {
        match bound {
            None => Ok(None),
            Some(Bound::Duration(text)) => HostDuration::parse(text)
                .map(Some)
                .map_err(|e| self.invalid(path, e.to_string())),
            Some(Bound::Number(n)) => Err(self.invalid(path, format!("bound {n} is not a duration string"))),
        }
    }
}
