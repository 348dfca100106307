use crate::compiler::CompilerPass;
use crate::container::{ContainerBuilder, Entry};
use crate::errors::CoreError;
use serde_yaml::Value;
use std::collections::HashMap;

/// Replaces `%name%` placeholders in parameters and service definitions.
///
/// A string that is exactly one placeholder takes the parameter's value with
/// its YAML type; placeholders embedded in longer strings are stringified.
/// `%%` stands for a literal `%`.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResolveParameterPlaceholdersPass;

impl CompilerPass for ResolveParameterPlaceholdersPass {
    fn name(&self) -> &'static str {
        "ResolveParameterPlaceholdersPass"
    }

    fn process(&self, container: &mut ContainerBuilder) -> Result<(), CoreError> {
        let raw: HashMap<String, Value> = container
            .entries()
            .filter_map(|(name, entry)| entry.as_parameter().map(|value| (name.to_string(), value.clone())))
            .collect();
        let mut resolver = Resolver::new(raw);

        for (id, entry) in container.entries_mut() {
            match entry {
                Entry::Parameter(value) => *value = resolver.resolve_parameter(id)?,
                Entry::Service(definition) => {
                    definition.class = match resolver.resolve_string(&definition.class)? {
                        Value::String(class) => class,
                        other => return Err(CoreError::configuration(format!(
                            "Class of service '{}' resolved to a non-string value: {:?}",
                            id, other
                        ))),
                    };
                    for argument in &mut definition.arguments {
                        resolver.resolve_in_place(argument)?;
                    }
                    for call in &mut definition.calls {
                        for argument in &mut call.arguments {
                            resolver.resolve_in_place(argument)?;
                        }
                    }
                    for tag in &mut definition.tags {
                        for value in tag.attributes.values_mut() {
                            resolver.resolve_in_place(value)?;
                        }
                    }
                }
                Entry::Alias(_) => {}
            }
        }
        Ok(())
    }
}

struct Resolver {
    raw: HashMap<String, Value>,
    resolved: HashMap<String, Value>,
    resolving: Vec<String>,
}

impl Resolver {
    fn new(raw: HashMap<String, Value>) -> Self {
        Self {
            raw,
            resolved: HashMap::new(),
            resolving: Vec::new(),
        }
    }

    fn resolve_parameter(&mut self, name: &str) -> Result<Value, CoreError> {
        if let Some(value) = self.resolved.get(name) {
            return Ok(value.clone());
        }
        if self.resolving.iter().any(|pending| pending == name) {
            let mut path = self.resolving.clone();
            path.push(name.to_string());
            return Err(CoreError::CircularParameter { path: path.join(" -> ") });
        }
        let raw = self
            .raw
            .get(name)
            .cloned()
            .ok_or_else(|| CoreError::parameter_not_found(name))?;

        self.resolving.push(name.to_string());
        let value = self.resolve_value(raw);
        self.resolving.pop();

        let value = value?;
        self.resolved.insert(name.to_string(), value.clone());
        Ok(value)
    }

    fn resolve_in_place(&mut self, value: &mut Value) -> Result<(), CoreError> {
        *value = self.resolve_value(std::mem::replace(value, Value::Null))?;
        Ok(())
    }

    fn resolve_value(&mut self, value: Value) -> Result<Value, CoreError> {
        match value {
            Value::String(s) => self.resolve_string(&s),
            Value::Sequence(items) => items
                .into_iter()
                .map(|item| self.resolve_value(item))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Sequence),
            Value::Mapping(mapping) => {
                let mut resolved = serde_yaml::Mapping::with_capacity(mapping.len());
                for (key, item) in mapping {
                    resolved.insert(key, self.resolve_value(item)?);
                }
                Ok(Value::Mapping(resolved))
            }
            other => Ok(other),
        }
    }

    fn resolve_string(&mut self, s: &str) -> Result<Value, CoreError> {
        if let Some(name) = whole_placeholder(s) {
            return self.resolve_parameter(name);
        }
        if !s.contains('%') {
            return Ok(Value::String(s.to_string()));
        }

        let mut out = String::with_capacity(s.len());
        let mut rest = s;
        while let Some(start) = rest.find('%') {
            out.push_str(&rest[..start]);
            let after = &rest[start + 1..];
            if let Some(stripped) = after.strip_prefix('%') {
                out.push('%');
                rest = stripped;
                continue;
            }
            match after.find('%') {
                Some(end) if is_parameter_name(&after[..end]) => {
                    let name = &after[..end];
                    let value = self.resolve_parameter(name)?;
                    out.push_str(&embeddable(name, &value)?);
                    rest = &after[end + 1..];
                }
                _ => {
                    out.push('%');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        Ok(Value::String(out))
    }
}

fn whole_placeholder(s: &str) -> Option<&str> {
    let name = s.strip_prefix('%')?.strip_suffix('%')?;
    is_parameter_name(name).then_some(name)
}

fn is_parameter_name(name: &str) -> bool {
    !name.is_empty() && !name.chars().any(|c| c == '%' || c.is_whitespace())
}

fn embeddable(name: &str, value: &Value) -> Result<String, CoreError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Null => Ok(String::new()),
        _ => Err(CoreError::configuration(format!(
            "Parameter '{}' is not a scalar and cannot be embedded in a string",
            name
        ))),
    }
}
