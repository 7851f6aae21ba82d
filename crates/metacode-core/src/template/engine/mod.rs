//! Template engine implementation

mod blocks;
mod parse;
mod scope;
mod tokenize;
mod trim;

use crate::table::Table;
use crate::template::error::TemplateError;
use std::collections::BTreeMap;

pub(crate) use parse::is_ident;
pub use parse::{parse_template, Expr, Segment, Site, Template};
pub use scope::Value;

use scope::Scope;

/// Value bound to a macro parameter
#[derive(Debug, Clone, PartialEq)]
pub enum Binding<'t> {
    /// Literal argument text
    Text(String),
    /// A declared table
    Table(&'t Table),
}

/// Parameter bindings for one macro invocation
///
/// Built fresh per invocation and dropped once the output is produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment<'t> {
    vars: BTreeMap<String, Binding<'t>>,
}

impl<'t> Environment<'t> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to literal text
    pub fn with_text(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.bind(name, Binding::Text(text.into()));
        self
    }

    /// Bind `name` to a table
    pub fn with_table(mut self, name: impl Into<String>, table: &'t Table) -> Self {
        self.bind(name, Binding::Table(table));
        self
    }

    pub fn bind(&mut self, name: impl Into<String>, binding: Binding<'t>) {
        self.vars.insert(name.into(), binding);
    }

    pub fn get(&self, name: &str) -> Option<&Binding<'t>> {
        self.vars.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Binding<'t>)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// A named template with formal parameters
#[derive(Debug, Clone, PartialEq)]
pub struct Macro {
    name: String,
    params: Vec<String>,
    template: Template,
}

impl Macro {
    pub fn new(name: impl Into<String>, params: Vec<String>, template: Template) -> Self {
        Self {
            name: name.into(),
            params,
            template,
        }
    }

    /// Parse a macro body into a `Macro`
    pub fn parse(
        name: impl Into<String>,
        params: Vec<String>,
        body: &str,
    ) -> Result<Self, TemplateError> {
        Ok(Self::new(name, params, parse_template(body)?))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    /// Bind positional arguments to the formal parameters
    ///
    /// # Errors
    ///
    /// `ArityMismatch` if the argument count differs from the parameter count.
    pub fn bind<'t>(&self, args: Vec<Binding<'t>>) -> Result<Environment<'t>, TemplateError> {
        if args.len() != self.params.len() {
            return Err(TemplateError::ArityMismatch {
                name: self.name.clone(),
                expected: self.params.len(),
                found: args.len(),
            });
        }
        let mut env = Environment::new();
        for (param, arg) in self.params.iter().zip(args) {
            env.bind(param.clone(), arg);
        }
        Ok(env)
    }
}

/// Template engine expanding macros against binding environments
///
/// Expansion is a pure function of the template and the environment: no
/// state is kept between calls, so one engine may be shared across threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct TemplateEngine;

impl TemplateEngine {
    /// Create a new template engine
    pub fn new() -> Self {
        Self
    }

    /// Expand a macro with the given environment
    ///
    /// # Errors
    ///
    /// `MissingArgument` if a formal parameter is unbound, otherwise any
    /// resolution error. No partial output is returned.
    pub fn expand(&self, mac: &Macro, env: &Environment<'_>) -> Result<String, TemplateError> {
        if let Some(param) = mac.params().iter().find(|p| env.get(p).is_none()) {
            return Err(TemplateError::MissingArgument {
                name: mac.name().to_string(),
                param: param.clone(),
            });
        }
        self.render(mac.template(), env)
    }

    /// Expand a parsed template with the given environment
    pub fn render(&self, template: &Template, env: &Environment<'_>) -> Result<String, TemplateError> {
        let mut scope = Scope::new(env);
        let mut output = String::new();
        self.expand_segments(template.segments(), &mut scope, &mut output)?;
        debug_assert_eq!(scope.depth(), 1);
        Ok(output)
    }

    fn expand_segments<'a>(
        &self,
        segments: &'a [Segment],
        scope: &mut Scope<'a>,
        output: &mut String,
    ) -> Result<(), TemplateError> {
        for segment in segments {
            match segment {
                Segment::Text(text) => output.push_str(text),
                Segment::Subst { expr, site } => {
                    self.process_substitution(expr, site, scope, output)?
                }
                Segment::Count { table, site } => {
                    let table = resolve_table(table, site, scope)?;
                    output.push_str(&table.len().to_string());
                }
                Segment::Loop {
                    index,
                    item,
                    table,
                    body,
                    site,
                } => {
                    let table = resolve_table(table, site, scope)?;
                    for (i, row) in table.rows().iter().enumerate() {
                        let mut frame = Vec::with_capacity(2);
                        if let Some(index) = index {
                            frame.push((index.as_str(), Value::Index(i)));
                        }
                        if let Some(item) = item {
                            frame.push((item.as_str(), Value::Row(row)));
                        }
                        scope.push(frame);
                        let result = self.expand_segments(body, scope, output);
                        scope.pop();
                        result?;
                    }
                }
            }
        }
        Ok(())
    }

    /// Process a scalar substitution (`{{name}}` or `{{name.field}}`)
    fn process_substitution(
        &self,
        expr: &Expr,
        site: &Site,
        scope: &Scope<'_>,
        output: &mut String,
    ) -> Result<(), TemplateError> {
        match expr {
            Expr::Var(name) => match lookup(name, site, scope)? {
                Value::Text(text) => output.push_str(text),
                Value::Table(table) => output.push_str(table.name()),
                Value::Index(i) => output.push_str(&i.to_string()),
                found @ Value::Row(_) => return Err(type_mismatch(name, "text", found, site)),
            },
            Expr::Field { var, field } => match lookup(var, site, scope)? {
                Value::Row(row) => {
                    let cell = row.get(field).ok_or_else(|| TemplateError::FieldNotFound {
                        name: var.clone(),
                        field: field.clone(),
                        directive: site.directive.clone(),
                        line: site.line,
                        column: site.column,
                    })?;
                    output.push_str(cell);
                }
                found => return Err(type_mismatch(var, "row", found, site)),
            },
        }
        Ok(())
    }
}

fn lookup<'a>(name: &str, site: &Site, scope: &Scope<'a>) -> Result<Value<'a>, TemplateError> {
    scope
        .lookup(name)
        .ok_or_else(|| TemplateError::UnboundReference {
            name: name.to_string(),
            directive: site.directive.clone(),
            line: site.line,
            column: site.column,
        })
}

fn resolve_table<'a>(
    name: &str,
    site: &Site,
    scope: &Scope<'a>,
) -> Result<&'a Table, TemplateError> {
    match lookup(name, site, scope)? {
        Value::Table(table) => Ok(table),
        found => Err(type_mismatch(name, "table", found, site)),
    }
}

fn type_mismatch(name: &str, expected: &'static str, found: Value<'_>, site: &Site) -> TemplateError {
    TemplateError::TypeMismatch {
        name: name.to_string(),
        expected,
        found: found.kind(),
        directive: site.directive.clone(),
        line: site.line,
        column: site.column,
    }
}

/// Convenience function: parse and expand template source in one step
pub fn render(source: &str, env: &Environment<'_>) -> Result<String, TemplateError> {
    let template = parse_template(source)?;
    TemplateEngine::new().render(&template, env)
}

/// Convenience function to expand a macro
pub fn expand(mac: &Macro, env: &Environment<'_>) -> Result<String, TemplateError> {
    TemplateEngine::new().expand(mac, env)
}

#[cfg(test)]
mod tests;
