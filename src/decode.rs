//! Decoder selection: try each format in a fixed order, keep the first
//! document that decodes into a mapping.
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{Error, Result};

pub type Document = Map<String, Value>;

pub trait Decoder {
    fn name(&self) -> &'static str;
    fn decode(&self, bytes: &[u8]) -> Result<Document, String>;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct JsonDecoder;

impl Decoder for JsonDecoder {
    fn name(&self) -> &'static str { "json" }

    /// Numbers are kept as written, so values beyond f64 range still decode.
    fn decode(&self, bytes: &[u8]) -> Result<Document, String> {
        serde_json::from_slice::<Document>(bytes).map_err(|err| locate_json_error(bytes, err))
    }
}

/// Re-run a failed decode with path tracking so the message names where it stopped.
fn locate_json_error(bytes: &[u8], err: serde_json::Error) -> String {
    let de = &mut serde_json::Deserializer::from_slice(bytes);
    match serde_path_to_error::deserialize::<_, Document>(de) {
        Err(traced) => {
            let path = traced.path().to_string();
            format!("at JSON path {path} → {}", traced.into_inner())
        }
        // the document itself parsed; the failure was trailing data
        Ok(_) => err.to_string(),
    }
}

/// Reads the first YAML document and converts it into the JSON value tree.
/// Every YAML number becomes a JSON number, including `.nan` and `.inf`.
#[derive(Clone, Copy, Debug, Default)]
pub struct YamlDecoder;

impl Decoder for YamlDecoder {
    fn name(&self) -> &'static str { "yaml" }

    fn decode(&self, bytes: &[u8]) -> Result<Document, String> {
        let first = serde_yaml::Deserializer::from_slice(bytes)
            .next()
            .ok_or_else(|| "empty YAML stream".to_string())?;
        let value = serde_yaml::Value::deserialize(first).map_err(|e| e.to_string())?;
        match value {
            serde_yaml::Value::Mapping(map) => yaml_mapping(map),
            other => Err(format!("expected a mapping at the document root, found {}", yaml_kind(&other))),
        }
    }
}

fn yaml_mapping(map: serde_yaml::Mapping) -> Result<Document, String> {
    let mut doc = Document::with_capacity(map.len());
    for (key, value) in map {
        let key = match key {
            serde_yaml::Value::String(key) => key,
            other => return Err(format!("mapping key must be a string, found {}", yaml_kind(&other))),
        };
        doc.insert(key, yaml_value(value)?);
    }
    Ok(doc)
}

fn yaml_value(value: serde_yaml::Value) -> Result<Value, String> {
    use serde_yaml::Value as Yaml;
    Ok(match value {
        Yaml::Null => Value::Null,
        Yaml::Bool(b) => Value::Bool(b),
        Yaml::Number(n) => Value::Number(yaml_number(&n)),
        Yaml::String(s) => Value::String(s),
        Yaml::Sequence(xs) => Value::Array(xs.into_iter().map(yaml_value).collect::<Result<_, _>>()?),
        Yaml::Mapping(map) => Value::Object(yaml_mapping(map)?),
        Yaml::Tagged(tagged) => yaml_value(tagged.value)?,
    })
}

/// Only the kind survives inference, so non-finite floats are carried as
/// the nearest finite value (NaN as zero).
fn yaml_number(n: &serde_yaml::Number) -> serde_json::Number {
    if let Some(i) = n.as_i64() {
        return i.into();
    }
    if let Some(u) = n.as_u64() {
        return u.into();
    }
    let f = n.as_f64().unwrap_or(0.0);
    let finite = if f.is_nan() { 0.0 } else { f.clamp(f64::MIN, f64::MAX) };
    serde_json::Number::from_f64(finite).unwrap_or_else(|| 0.into())
}

fn yaml_kind(v: &serde_yaml::Value) -> &'static str {
    match v {
        serde_yaml::Value::Null => "null",
        serde_yaml::Value::Bool(_) => "boolean",
        serde_yaml::Value::Number(_) => "number",
        serde_yaml::Value::String(_) => "string",
        serde_yaml::Value::Sequence(_) => "sequence",
        serde_yaml::Value::Mapping(_) => "mapping",
        serde_yaml::Value::Tagged(_) => "tagged value",
    }
}

/// Ordered decoder chain.
pub struct Decoders {
    decoders: Vec<Box<dyn Decoder>>,
}

impl Default for Decoders {
    fn default() -> Self {
        Self::new(vec![Box::new(JsonDecoder), Box::new(YamlDecoder)])
    }
}

impl Decoders {
    pub fn new(decoders: Vec<Box<dyn Decoder>>) -> Self {
        Self { decoders }
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.decoders.iter().map(|d| d.name()).collect()
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<Document> {
        for decoder in &self.decoders {
            match decoder.decode(bytes) {
                Ok(doc) => {
                    debug!(decoder = decoder.name(), keys = doc.len(), "decoded input");
                    return Ok(doc);
                }
                Err(error) => debug!(decoder = decoder.name(), %error, "decoder rejected input"),
            }
        }
        Err(Error::Decode { tried: self.names() })
    }
}
