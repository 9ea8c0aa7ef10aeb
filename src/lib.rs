pub mod cli;
pub mod codegen;
pub mod decode;
pub mod error;
pub mod inference;
pub mod ir;

use serde_json::{Map, Value};

pub use error::{Error, Result};

/// Infer the root record of `root` and render it with default options.
pub fn generate(root: &Map<String, Value>) -> Result<String> {
    let record = inference::Inference::new().infer(root)?;
    codegen::render_to_string(&record, codegen::CodegenOptions::default())
}
