use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    /// Every configured decoder rejected the input.
    #[error("could not parse input after trying parsers for: {tried:?}")]
    Decode { tried: Vec<&'static str> },

    /// A value whose kind has no field type (`null`, `boolean`).
    /// `path` is a JSON Pointer to the offending value.
    #[error("unrecognized type: {kind} at `{path}`")]
    UnsupportedValueKind { kind: &'static str, path: String },

    #[error("failed to write output: {0}")]
    Write(#[from] std::io::Error),
}
