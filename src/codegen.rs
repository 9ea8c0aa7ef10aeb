//! Go-flavored struct declarations from an inferred [`Record`] tree.
//!
//! Records are written in post-order: every record a field refers to
//! (directly or through sequences) is declared before the record that
//! refers to it, so the root always comes last.
use std::io::Write;

use crate::error::Result;
use crate::ir::{Record, ScalarKind, Ty};

#[derive(Debug, Clone)]
pub struct CodegenOptions {
    /// Package clause written in the header.
    pub package: String,
    /// Struct-tag key carrying the original key, e.g. `json` in `json:"id"`.
    pub tag_key: String,
}

impl Default for CodegenOptions {
    fn default() -> Self {
        Self { package: "main".into(), tag_key: "json".into() }
    }
}

pub struct Codegen<W: Write> {
    out: W,
    options: CodegenOptions,
}

impl<W: Write> Codegen<W> {
    pub fn new(out: W) -> Self {
        Self::with_options(out, CodegenOptions::default())
    }

    pub fn with_options(out: W, options: CodegenOptions) -> Self {
        Self { out, options }
    }

    /// Header, then every declaration reachable from `root`.
    /// Stops at the first failed write; nothing already written is undone.
    pub fn emit(&mut self, root: &Record) -> Result<()> {
        writeln!(self.out, "package {}", self.options.package)?;
        writeln!(self.out)?;
        writeln!(
            self.out,
            "// {} and the types it references were inferred from a sample document.",
            capitalize(&root.name),
        )?;
        writeln!(self.out)?;
        self.emit_record(root)
    }

    fn emit_record(&mut self, record: &Record) -> Result<()> {
        for field in &record.fields {
            self.emit_nested(&field.ty)?;
        }

        let tag_key = &self.options.tag_key;
        writeln!(self.out, "type {} struct {{", capitalize(&record.name))?;
        for field in &record.fields {
            writeln!(
                self.out,
                "\t{} {} `{}:{}`",
                capitalize(&field.name),
                type_name(&field.ty),
                tag_key,
                quote(&field.tag),
            )?;
        }
        writeln!(self.out, "}} `{}:{}`", tag_key, quote(&record.name))?;
        writeln!(self.out)?;
        Ok(())
    }

    fn emit_nested(&mut self, ty: &Ty) -> Result<()> {
        match ty {
            Ty::Record(record) => self.emit_record(record),
            Ty::Sequence { element } => self.emit_nested(element),
            Ty::Scalar { .. } => Ok(()),
        }
    }
}

impl Codegen<Vec<u8>> {
    pub fn into_string(self) -> String {
        // only &str fragments are ever written
        String::from_utf8_lossy(&self.out).into_owned()
    }
}

/// Render `root` into `out` with default options.
pub fn render<W: Write>(root: &Record, out: W) -> Result<()> {
    Codegen::new(out).emit(root)
}

pub fn render_to_string(root: &Record, options: CodegenOptions) -> Result<String> {
    let mut cg = Codegen::with_options(Vec::new(), options);
    cg.emit(root)?;
    Ok(cg.into_string())
}

pub fn type_name(ty: &Ty) -> String {
    match ty {
        Ty::Scalar { kind: ScalarKind::Number } => "float64".into(),
        Ty::Scalar { kind: ScalarKind::String } => "string".into(),
        Ty::Scalar { kind: ScalarKind::Unknown } => "interface{}".into(),
        Ty::Record(record) => capitalize(&record.name),
        Ty::Sequence { element } => format!("[]{}", type_name(element)),
    }
}

/// Uppercase the first character only.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\r' => out.push_str("\\r"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}
