// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 flowsmith contributors

//! Serialization engine
//!
//! Every renderable type publishes a static field table: an ordered list of
//! `(order, key, presence, accessor)` entries. The engine sorts the table by
//! `order`, evaluates each accessor and emits the key unless the presence
//! policy says the value should be left out. Output order is therefore a
//! property of the table, never of struct layout or builder call order.

mod layout;

use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::errors::{FlowError, FlowResult};
use crate::workflow::Pipeline;

/// When a field's key appears in the rendered output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    /// Always emitted, even when empty
    Always,
    /// Omitted when the value is its zero-equivalent
    OmitDefault,
    /// Omitted only when an optional value is absent
    OmitNone,
}

/// One entry in a type's field table
pub struct Field<T> {
    /// Position of the key within the rendered mapping
    pub order: u8,
    /// Key written to the output (may differ from the Rust field name)
    pub key: &'static str,
    /// Omission policy
    pub presence: Presence,
    /// Produces the value to render
    pub value: fn(&T) -> Value,
}

impl<T> Field<T> {
    /// Whether this field would be left out for the given value
    pub fn omits(&self, value: &Value) -> bool {
        match self.presence {
            Presence::Always => false,
            Presence::OmitDefault => is_default(value),
            Presence::OmitNone => value.is_null(),
        }
    }
}

/// A model type with a fixed rendering layout
pub trait Render: Sized + 'static {
    /// Human-readable type name used in diagnostics
    const KIND: &'static str;

    /// The type's field table
    fn fields() -> &'static [Field<Self>];

    /// Render into an ordered YAML mapping
    fn render(&self) -> Value {
        render_mapping(self)
    }

    /// Render into YAML text
    fn render_yaml(&self) -> FlowResult<String> {
        serde_yaml::to_string(&self.render()).map_err(serialization_error::<Self>)
    }
}

/// Serialization failure attributed to the type being rendered
pub fn serialization_error<T: Render>(error: impl std::fmt::Display) -> FlowError {
    FlowError::Serialization {
        context: T::KIND.to_string(),
        message: error.to_string(),
    }
}

/// Render a value through its field table
pub fn render_mapping<T: Render>(item: &T) -> Value {
    let mut fields: Vec<&Field<T>> = T::fields().iter().collect();
    fields.sort_by_key(|f| f.order);

    let mut mapping = Mapping::new();
    for field in fields {
        let value = (field.value)(item);
        if field.omits(&value) {
            continue;
        }
        mapping.insert(Value::String(field.key.to_string()), value);
    }

    Value::Mapping(mapping)
}

/// Ordered keys the table would emit for this value
pub fn rendered_keys<T: Render>(item: &T) -> Vec<&'static str> {
    let mut fields: Vec<&Field<T>> = T::fields().iter().collect();
    fields.sort_by_key(|f| f.order);
    fields
        .into_iter()
        .filter(|f| !f.omits(&(f.value)(item)))
        .map(|f| f.key)
        .collect()
}

/// Zero-equivalent check used by [`Presence::OmitDefault`]
pub fn is_default(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !*b,
        Value::Number(n) => {
            n.as_u64() == Some(0) || n.as_i64() == Some(0) || n.as_f64() == Some(0.0)
        }
        Value::String(s) => s.is_empty(),
        Value::Sequence(seq) => seq.is_empty(),
        Value::Mapping(map) => map.is_empty(),
        Value::Tagged(_) => false,
    }
}

/// Render a pipeline to YAML text
pub fn to_yaml(pipeline: &Pipeline) -> FlowResult<String> {
    let text = pipeline.render_yaml()?;
    debug!(
        pipeline = %pipeline.name,
        jobs = pipeline.jobs.len(),
        bytes = text.len(),
        "Rendered workflow"
    );
    Ok(text)
}

// ─────────────────────────────────────────────────────────────────────────────
// Value helpers shared by the field tables
// ─────────────────────────────────────────────────────────────────────────────

pub(crate) fn text(value: &str) -> Value {
    Value::String(value.to_string())
}

pub(crate) fn strings(values: &[String]) -> Value {
    Value::Sequence(values.iter().map(|v| text(v)).collect())
}

pub(crate) fn string_map(map: &IndexMap<String, String>) -> Value {
    Value::Mapping(map.iter().map(|(k, v)| (text(k), text(v))).collect())
}

pub(crate) fn nested<T: Render>(value: &Option<T>) -> Value {
    value.as_ref().map_or(Value::Null, |v| v.render())
}
