//! The document transformation pipeline.
//!
//! Each input unit (one file, or one buffered stdin read) runs the ordered
//! stages parse → navigate → filter → project → render against a shared
//! [`OutputSink`]. Stages whose option is unset pass the value through
//! untouched. Filtering and projection require an array; anything else is
//! a recoverable condition reported on the diagnostics channel, after
//! which processing of that unit stops.

use std::fs;
use std::io::{self, Read, Write};
use std::path::Path;

use crate::navigate::navigate;
use crate::parser::{self, ParseError};
use crate::project::project;
use crate::query::{Query, QueryError};
use crate::render::{render, RenderOptions, Styles};
use crate::sink::OutputSink;
use crate::value::{type_name, Value};

/// Immutable per-invocation configuration, built once by the CLI layer.
#[derive(Debug, Clone)]
pub struct Options {
    /// Keep ANSI color in the output
    pub color: bool,
    /// Multi-line rendering with indentation
    pub pretty: bool,
    /// Strict JSON rendering; false selects the JS-literal mode
    pub json: bool,
    /// Dot-delimited path to descend into before filtering
    pub root: Option<String>,
    /// Comma-separated keys to project array elements down to
    pub fields: Option<String>,
    /// Relaxed Mongo-style filter over array elements
    pub query: Option<String>,
    /// Truncate rendered strings beyond this many characters
    pub max_length: Option<usize>,
    /// Accepted for option-surface compatibility; has no effect on JSON data
    pub hide_functions: bool,
}

impl Default for Options {
    fn default() -> Self {
        Options {
            color: true,
            pretty: true,
            json: true,
            root: None,
            fields: None,
            query: None,
            max_length: None,
            hide_functions: false,
        }
    }
}

/// Errors that can end a whole invocation.
#[derive(Debug)]
pub enum PipelineError {
    /// Reading a file or writing output failed
    Io(io::Error),
    /// Malformed JSON input
    Parse(ParseError),
    /// The configured query expression does not compile
    Query(QueryError),
}

impl std::fmt::Display for PipelineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PipelineError::Io(e) => write!(f, "IO error: {}", e),
            PipelineError::Parse(e) => write!(f, "{}", e),
            PipelineError::Query(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Io(e) => Some(e),
            PipelineError::Parse(e) => Some(e),
            PipelineError::Query(e) => Some(e),
        }
    }
}

impl From<io::Error> for PipelineError {
    fn from(e: io::Error) -> Self {
        PipelineError::Io(e)
    }
}

impl From<ParseError> for PipelineError {
    fn from(e: ParseError) -> Self {
        PipelineError::Parse(e)
    }
}

impl From<QueryError> for PipelineError {
    fn from(e: QueryError) -> Self {
        PipelineError::Query(e)
    }
}

/// Terminal state of one input unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The unit reached rendering (including the absent-value marker)
    Rendered,
    /// Filtering or projection hit a non-array; a diagnostic was emitted
    /// and nothing was rendered
    Aborted,
}

/// Orchestrates the stage chain for every input unit of an invocation.
///
/// Generic over the output and diagnostics writers so tests can capture
/// both; the binary uses stdout and stderr.
pub struct Pipeline<W: Write, E: Write> {
    options: Options,
    query: Option<Query>,
    render_options: RenderOptions,
    sink: OutputSink<W>,
    diag: E,
}

impl Pipeline<io::Stdout, io::Stderr> {
    /// Pipeline writing to the process's stdout and stderr.
    pub fn new(options: Options) -> Result<Self, QueryError> {
        Pipeline::with_sinks(options, io::stdout(), io::stderr())
    }
}

impl<W: Write, E: Write> Pipeline<W, E> {
    /// Build a pipeline over explicit output and diagnostics writers.
    ///
    /// The query expression, if any, is compiled here: an unparsable filter
    /// is a configuration mistake and fails before any input is read.
    pub fn with_sinks(options: Options, out: W, diag: E) -> Result<Self, QueryError> {
        let query = options.query.as_deref().map(Query::compile).transpose()?;
        let render_options = RenderOptions {
            pretty: options.pretty,
            json: options.json,
            max_length: options.max_length,
            hide_functions: options.hide_functions,
            styles: Styles::default(),
        };
        let sink = OutputSink::new(out, options.color);

        Ok(Pipeline {
            options,
            query,
            render_options,
            sink,
            diag,
        })
    }

    /// Parse one input unit. See [`parser::parse`].
    pub fn parse(&self, text: &str) -> Result<Option<Value>, ParseError> {
        parser::parse(text)
    }

    /// Run one parsed document through navigate → filter → project → render.
    pub fn process(&mut self, document: Option<Value>) -> io::Result<Outcome> {
        let mut value = document;

        if let Some(root) = &self.options.root {
            value = value.as_ref().and_then(|v| navigate(v, root)).cloned();
        }

        if let Some(query) = &self.query {
            match value {
                Some(Value::Array(items)) => {
                    value = Some(Value::Array(query.filter(items)));
                }
                other => {
                    let msg =
                        type_mismatch_message("query", other.as_ref(), self.options.root.is_some());
                    writeln!(self.diag, "{}", msg)?;
                    return Ok(Outcome::Aborted);
                }
            }
        }

        if let Some(fields) = &self.options.fields {
            match value {
                Some(Value::Array(items)) => {
                    let fields: Vec<&str> = fields.split(',').collect();
                    value = Some(Value::Array(project(items, &fields)));
                }
                other => {
                    let msg = type_mismatch_message(
                        "fields",
                        other.as_ref(),
                        self.options.root.is_some(),
                    );
                    writeln!(self.diag, "{}", msg)?;
                    return Ok(Outcome::Aborted);
                }
            }
        }

        render(value.as_ref(), &self.render_options, &mut self.sink)?;
        Ok(Outcome::Rendered)
    }

    /// Run the full pipeline for each named file, in order, against the
    /// same sink. Malformed JSON in any file ends the run; a type-mismatch
    /// abort does not.
    pub fn for_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<(), PipelineError> {
        let result = self.try_files(paths);
        // Output already rendered for earlier files must reach the
        // consumer even when a later file fails
        self.sink.end()?;
        result
    }

    fn try_files<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<(), PipelineError> {
        for path in paths {
            let text = fs::read_to_string(path)?;
            let document = self.parse(&text)?;
            self.process(document)?;
        }
        Ok(())
    }

    /// Buffer a reader to end of stream, then run the pipeline once.
    pub fn from_reader<R: Read>(&mut self, mut reader: R) -> Result<(), PipelineError> {
        let result = self.try_reader(&mut reader);
        self.sink.end()?;
        result
    }

    fn try_reader<R: Read>(&mut self, reader: &mut R) -> Result<(), PipelineError> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        let document = self.parse(&text)?;
        self.process(document)?;
        Ok(())
    }

    /// The main output written so far (test support).
    pub fn output(&self) -> &W {
        self.sink.get_ref()
    }

    /// The diagnostics written so far (test support).
    pub fn diagnostics(&self) -> &E {
        &self.diag
    }
}

/// The recoverable-condition sentence, preserved verbatim from the
/// original tool so scripts matching on it keep working.
fn type_mismatch_message(option: &str, value: Option<&Value>, root_configured: bool) -> String {
    let actual = value.map(type_name).unwrap_or("undefined");
    let mut msg = format!(
        "Data root is not of type array (but of type {}), so {} is not possible.",
        actual, option
    );
    if !root_configured {
        msg.push_str(" Maybe --root can help?");
    }
    msg
}
