//! Minimal CLI: read → decode → infer → (go | ir)
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;

use crate::codegen::{Codegen, CodegenOptions};
use crate::decode::Decoders;
use crate::inference::{Inference, Unification};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

const STDIO: &str = "-";

/// infer nested struct declarations from a sample JSON or YAML document
#[derive(Parser, Debug)]
#[command(name = "genstruct", version)]
pub struct CommandLineInterface {
    /// name of file to read from; "-" for stdin
    #[arg(short, long, default_value = STDIO)]
    input: String,

    /// name of file to generate; "-" for stdout
    #[arg(short, long, default_value = STDIO)]
    output: String,

    /// name of the file to log errors to; "-" for stderr
    #[arg(short, long, default_value = STDIO)]
    errors: String,

    /// package clause of the generated file
    #[arg(long, default_value = "main")]
    package: String,

    /// struct-tag key holding the original field names
    #[arg(long, default_value = "json")]
    tag: String,

    /// how element types of a sequence are unified
    #[arg(long, value_enum, default_value_t = UnifyPolicy::LastPair)]
    unify: UnifyPolicy,

    /// what to emit
    #[arg(long, value_enum, default_value_t = Format::Go)]
    format: Format,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum UnifyPolicy {
    /// compare the last two elements only
    LastPair,
    /// any element differing from the first makes the sequence untyped
    Strict,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    /// struct declarations
    Go,
    /// the inferred type tree as JSON (debugging)
    Ir,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl UnifyPolicy {
    fn unification(self) -> Unification {
        match self {
            UnifyPolicy::LastPair => Unification::LastPair,
            UnifyPolicy::Strict => Unification::Strict,
        }
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }

    /// Nothing is written to the output until inference has succeeded.
    pub fn run(&self) -> Result<()> {
        let bytes = self.read_input()?;
        let root = Decoders::default().decode(&bytes)?;
        let record = Inference::new()
            .unification(self.unify.unification())
            .infer(&root)?;
        tracing::debug!(fields = record.fields.len(), "inferred root record");

        let mut out = self.open_output()?;
        match self.format {
            Format::Go => {
                let options = CodegenOptions {
                    package: self.package.clone(),
                    tag_key: self.tag.clone(),
                };
                Codegen::with_options(&mut out, options).emit(&record)?;
            }
            Format::Ir => {
                serde_json::to_writer_pretty(&mut out, &record)?;
                writeln!(out)?;
            }
        }
        out.flush().context("failed to flush output")?;
        Ok(())
    }

    /// Write `error` to the configured error sink. Falls back to stderr when
    /// the error file itself cannot be created.
    pub fn report(&self, error: &anyhow::Error) {
        if self.errors == STDIO {
            eprintln!("{} {error:#}", "error:".red().bold());
            return;
        }
        let written = File::create(&self.errors)
            .and_then(|mut file| writeln!(file, "{error:#}"));
        if let Err(io_error) = written {
            eprintln!("{} cannot open file {:?}: {io_error}", "error:".red().bold(), self.errors);
            eprintln!("{} {error:#}", "error:".red().bold());
        }
    }

    fn read_input(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::new();
        if self.input == STDIO {
            io::stdin().lock().read_to_end(&mut bytes).context("failed to read stdin")?;
        } else {
            File::open(&self.input)
                .and_then(|mut file| file.read_to_end(&mut bytes))
                .with_context(|| format!("failed to open input file {:?}", self.input))?;
        }
        Ok(bytes)
    }

    fn open_output(&self) -> Result<Box<dyn Write>> {
        if self.output == STDIO {
            return Ok(Box::new(BufWriter::new(io::stdout().lock())));
        }
        let file = File::create(&self.output)
            .with_context(|| format!("failed to create output file {:?}", self.output))?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
