pub mod lexer;
pub mod navigate;
pub mod parser;
pub mod pipeline;
pub mod project;
pub mod query;
pub mod render;
pub mod sink;
pub mod value;

pub use lexer::{Lexer, Token};
pub use parser::{ParseError, XSSI_PREFIX};
pub use pipeline::{Options, Outcome, Pipeline, PipelineError};
pub use query::{Query, QueryError};
pub use render::{RenderOptions, Styles};
pub use sink::OutputSink;
pub use value::Value;
