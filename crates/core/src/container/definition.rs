use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::BTreeMap;

/// A tag attached to a service definition, e.g. `{ name: ezpublish.fieldType, alias: ezstring }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    pub name: String,
    #[serde(flatten)]
    pub attributes: BTreeMap<String, Value>,
}

impl Tag {
    /// Create a tag without attributes
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add an attribute to the tag
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Get a scalar attribute rendered as a string
    pub fn attribute(&self, key: &str) -> Option<String> {
        match self.attributes.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Bool(b) => Some(b.to_string()),
            _ => None,
        }
    }
}

/// A method call performed on a service after construction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodCall {
    pub method: String,
    pub arguments: Vec<Value>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Vec<Value>) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }
}

/// Construction recipe for a service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Definition {
    pub class: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub arguments: Vec<Value>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub calls: Vec<MethodCall>,
    #[serde(default = "default_public")]
    pub public: bool,
    #[serde(default, rename = "abstract")]
    pub is_abstract: bool,
}

fn default_public() -> bool {
    true
}

impl Definition {
    /// Create a definition for the given class
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
            arguments: Vec::new(),
            tags: Vec::new(),
            calls: Vec::new(),
            public: true,
            is_abstract: false,
        }
    }

    /// Append a constructor argument
    pub fn add_argument(&mut self, argument: impl Into<Value>) -> &mut Self {
        self.arguments.push(argument.into());
        self
    }

    /// Append a method call
    pub fn add_method_call(&mut self, method: impl Into<String>, arguments: Vec<Value>) -> &mut Self {
        self.calls.push(MethodCall::new(method, arguments));
        self
    }

    /// Attach a tag
    pub fn add_tag(&mut self, tag: Tag) -> &mut Self {
        self.tags.push(tag);
        self
    }

    /// Tags with the given name, in declaration order
    pub fn tags_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Tag> + 'a {
        self.tags.iter().filter(move |tag| tag.name == name)
    }

    pub fn has_tag(&self, name: &str) -> bool {
        self.tags.iter().any(|tag| tag.name == name)
    }
}

/// An entry of the service registry
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Entry {
    /// Raw parameter value
    Parameter(Value),
    /// Service construction recipe
    Service(Definition),
    /// Another identifier this one stands for
    Alias(String),
}

impl Entry {
    pub fn kind(&self) -> &'static str {
        match self {
            Entry::Parameter(_) => "parameter",
            Entry::Service(_) => "service",
            Entry::Alias(_) => "alias",
        }
    }

    pub fn as_definition(&self) -> Option<&Definition> {
        match self {
            Entry::Service(definition) => Some(definition),
            _ => None,
        }
    }

    pub fn as_parameter(&self) -> Option<&Value> {
        match self {
            Entry::Parameter(value) => Some(value),
            _ => None,
        }
    }
}

/// A reference to another service found inside an argument value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reference<'a> {
    /// `@id`: the target must exist
    Required(&'a str),
    /// `@?id`: the target may be missing
    Optional(&'a str),
}

impl<'a> Reference<'a> {
    /// Parse `@id` / `@?id`; `@@...` is an escaped literal and not a reference
    pub fn parse(value: &'a str) -> Option<Self> {
        let rest = value.strip_prefix('@')?;
        if rest.starts_with('@') || rest.is_empty() {
            return None;
        }
        match rest.strip_prefix('?') {
            Some(id) if !id.is_empty() => Some(Reference::Optional(id)),
            Some(_) => None,
            None => Some(Reference::Required(rest)),
        }
    }
}

/// Build a `@id` reference value
pub fn reference(id: &str) -> Value {
    Value::String(format!("@{}", id))
}
