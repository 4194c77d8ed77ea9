//! Records, inputs, queries and update specs

use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::parser::{parse_json_text, strip_operator, OPERATOR_MARKER};

/// One stored document
pub type Record = Map<String, Value>;

/// A caller-supplied argument, either an already-built JSON value or JSON
/// text in single or double quotes
#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    /// Native JSON value
    Value(Value),
    /// JSON text, normalized before parsing
    Text(String),
}

impl Input {
    /// Turn the input into a JSON value. Empty or zero-like values come back
    /// as `None` and are treated by callers as if nothing was passed.
    pub fn normalize(self) -> Result<Option<Value>> {
        let value = match self {
            Input::Value(value) => value,
            Input::Text(text) => parse_json_text(&text)?,
        };
        Ok(if is_truthy(&value) { Some(value) } else { None })
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

impl From<Value> for Input {
    fn from(value: Value) -> Self {
        Input::Value(value)
    }
}

impl From<&Value> for Input {
    fn from(value: &Value) -> Self {
        Input::Value(value.clone())
    }
}

impl From<Record> for Input {
    fn from(record: Record) -> Self {
        Input::Value(Value::Object(record))
    }
}

impl From<&Record> for Input {
    fn from(record: &Record) -> Self {
        Input::Value(Value::Object(record.clone()))
    }
}

impl From<Vec<Record>> for Input {
    fn from(records: Vec<Record>) -> Self {
        Input::Value(Value::Array(records.into_iter().map(Value::Object).collect()))
    }
}

impl From<&str> for Input {
    fn from(text: &str) -> Self {
        Input::Text(text.to_string())
    }
}

impl From<String> for Input {
    fn from(text: String) -> Self {
        Input::Text(text)
    }
}

impl From<Query> for Input {
    fn from(query: Query) -> Self {
        let mut map = Map::new();
        map.insert(query.field, query.value);
        Input::Value(Value::Object(map))
    }
}

impl From<UpdateSpec> for Input {
    fn from(update: UpdateSpec) -> Self {
        let mut pair = Map::new();
        pair.insert(update.field, update.value);
        let mut map = Map::new();
        map.insert(update.command.key(), Value::Object(pair));
        Input::Value(Value::Object(map))
    }
}

/// Normalize an input that must be a single record
pub fn record_from_input(input: Input) -> Result<Option<Record>> {
    match input.normalize()? {
        None => Ok(None),
        Some(Value::Object(map)) => Ok(Some(map)),
        Some(other) => Err(Error::InvalidRecord(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

/// Normalize an input that must be a sequence of records
pub fn records_from_input(input: Input) -> Result<Option<Vec<Record>>> {
    match input.normalize()? {
        None => Ok(None),
        Some(Value::Array(items)) => items
            .into_iter()
            .map(|item| match item {
                Value::Object(map) => Ok(map),
                other => Err(Error::InvalidRecord(format!(
                    "expected a JSON object in sequence, got {}",
                    other
                ))),
            })
            .collect::<Result<Vec<_>>>()
            .map(Some),
        Some(other) => Err(Error::InvalidRecord(format!(
            "expected a JSON array of objects, got {}",
            other
        ))),
    }
}

/// Single-field equality predicate
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    /// Field name to compare
    pub field: String,
    /// Value the field must equal
    pub value: Value,
}

impl Query {
    /// Build a query from an explicit pair
    pub fn new(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Query {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Build a query from a mapping, keeping only its first entry
    pub fn from_input(input: Input) -> Result<Option<Self>> {
        match input.normalize()? {
            None => Ok(None),
            Some(Value::Object(map)) => Ok(map
                .into_iter()
                .next()
                .map(|(field, value)| Query { field, value })),
            Some(other) => Err(Error::InvalidQuery(format!(
                "expected a JSON object, got {}",
                other
            ))),
        }
    }

    /// Exact equality on one field: same JSON type and value
    pub fn matches(&self, record: &Record) -> bool {
        record.get(&self.field) == Some(&self.value)
    }
}

/// Update command named by an update spec's key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Overwrite an existing field
    Set,
    /// Recognized but never applied
    Push,
    /// Any other command, ignored
    Other(String),
}

impl Command {
    /// Decode a command from an operator key such as `$set`
    pub fn from_key(key: &str) -> Self {
        match strip_operator(key) {
            "set" => Command::Set,
            "push" => Command::Push,
            other => Command::Other(other.to_string()),
        }
    }

    /// Command name without marker
    pub fn name(&self) -> &str {
        match self {
            Command::Set => "set",
            Command::Push => "push",
            Command::Other(name) => name,
        }
    }

    /// Operator key with marker, e.g. `$set`
    pub fn key(&self) -> String {
        format!("{}{}", OPERATOR_MARKER, self.name())
    }
}

/// A command plus the single field/value pair it applies
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateSpec {
    /// What to do with the pair
    pub command: Command,
    /// Target field
    pub field: String,
    /// New value
    pub value: Value,
}

impl UpdateSpec {
    /// Build an update spec from explicit parts
    pub fn new(command: Command, field: impl Into<String>, value: impl Into<Value>) -> Self {
        UpdateSpec {
            command,
            field: field.into(),
            value: value.into(),
        }
    }

    /// Shorthand for a `$set` update
    pub fn set(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::new(Command::Set, field, value)
    }

    /// Build an update spec from `{ "<command>": { "<field>": <value> } }`.
    /// Only the first entry of each mapping is used.
    pub fn from_input(input: Input) -> Result<Option<Self>> {
        let map = match input.normalize()? {
            None => return Ok(None),
            Some(Value::Object(map)) => map,
            Some(other) => {
                return Err(Error::InvalidUpdate(format!(
                    "expected a JSON object, got {}",
                    other
                )))
            }
        };

        let (key, pair) = match map.into_iter().next() {
            Some(entry) => entry,
            None => return Ok(None),
        };
        let command = Command::from_key(&key);

        let pair = match pair {
            Value::Object(pair) => pair,
            other => {
                return Err(Error::InvalidUpdate(format!(
                    "value of {:?} must be a JSON object, got {}",
                    key, other
                )))
            }
        };

        match pair.into_iter().next() {
            Some((field, value)) => Ok(Some(UpdateSpec {
                command,
                field,
                value,
            })),
            None => Err(Error::InvalidUpdate(format!(
                "value of {:?} names no field",
                key
            ))),
        }
    }

    /// The field/value pair as a standalone record, used for upserts
    pub fn to_record(&self) -> Record {
        let mut record = Map::new();
        record.insert(self.field.clone(), self.value.clone());
        record
    }
}
