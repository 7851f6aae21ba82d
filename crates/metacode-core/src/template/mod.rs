//! Template module - text macro expansion engine
//!
//! Turns a macro body plus a binding environment (literal arguments and
//! tables) into output text. Everything outside a directive is opaque text;
//! the engine has no knowledge of the target language.
//!
//! ## Syntax
//!
//! - Substitution: `{{name}}`, row column: `{{row.column}}`
//! - Row count: `{{#table}}`
//! - Loops: `{{#for row of table}} ... {{/for}}`,
//!   `{{#for i,row of table}}`, `{{#for i in table}}`, `{{#for table}}` (binds `this`)
//! - Whitespace trim: `{{~` strips blanks before, `~}}` strips blanks and one
//!   line break after, so loop directives can sit on their own lines
//! - Escape sequences: `\{{literal}}`

pub mod engine;
pub mod error;

pub use engine::{
    expand, parse_template, render, Binding, Environment, Expr, Macro, Segment, Site, Template,
    TemplateEngine, Value,
};
pub use error::TemplateError;
