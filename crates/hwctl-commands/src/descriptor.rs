//! Command descriptors and argument metadata.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Command whose argument list gets the synthetic anneal-time entry.
pub const ANNEAL: &str = "Anneal";

/// The synthetic descriptor injected for [`ANNEAL`].
pub fn anneal_time_argument() -> ArgumentDescriptor {
    ArgumentDescriptor::new("Time [s]", "float")
}

/// The two command variants.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CommandKind {
    /// Arbitrary callable run asynchronously.
    #[serde(rename = "CONTROLLER")]
    Procedure,
    /// Two-state actuator toggle.
    #[serde(rename = "INOUT")]
    TwoState,
}

/// How a command's arguments are described.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ArgumentType {
    #[serde(rename = "List")]
    List,
    #[serde(rename = "JSONSchema")]
    JsonSchema,
}

/// One `(label, type tag)` argument entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ArgumentDescriptor {
    pub label: String,
    pub type_tag: String,
}

impl ArgumentDescriptor {
    pub fn new(label: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            type_tag: type_tag.into(),
        }
    }
}

/// Ordered argument descriptors, or an opaque schema blob.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum ArgumentSpec {
    List(Vec<ArgumentDescriptor>),
    JsonSchema(Value),
}

impl ArgumentSpec {
    pub fn argument_type(&self) -> ArgumentType {
        match self {
            Self::List(_) => ArgumentType::List,
            Self::JsonSchema(_) => ArgumentType::JsonSchema,
        }
    }

    /// Number of list entries; zero in schema mode.
    pub fn len(&self) -> usize {
        match self {
            Self::List(entries) => entries.len(),
            Self::JsonSchema(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ArgumentSpec {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

/// Static identity and argument metadata for one command.
///
/// Built once at startup from configuration and consumed by the
/// command constructors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommandDescriptor {
    pub name: String,
    pub kind: CommandKind,
    pub arguments: ArgumentSpec,
}

impl CommandDescriptor {
    pub fn new(name: impl Into<String>, kind: CommandKind) -> Self {
        Self {
            name: name.into(),
            kind,
            arguments: ArgumentSpec::default(),
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<ArgumentDescriptor>) -> Self {
        self.arguments = ArgumentSpec::List(arguments);
        self
    }

    /// Append a descriptor; no-op in schema mode.
    pub fn add_argument(&mut self, label: impl Into<String>, type_tag: impl Into<String>) {
        if let ArgumentSpec::List(entries) = &mut self.arguments {
            entries.push(ArgumentDescriptor::new(label, type_tag));
        }
    }

    /// Switch to schema-described arguments, replacing the stored list.
    pub fn set_argument_json_schema(&mut self, schema: Value) {
        self.arguments = ArgumentSpec::JsonSchema(schema);
    }

    pub fn argument_type(&self) -> ArgumentType {
        self.arguments.argument_type()
    }
}
