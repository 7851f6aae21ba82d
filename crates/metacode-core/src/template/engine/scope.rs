//! Nested lookup scopes for expansion

use crate::table::{Row, Table};

use super::{Binding, Environment};

/// A value a name can resolve to during expansion
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value<'a> {
    Text(&'a str),
    Table(&'a Table),
    Row(&'a Row),
    Index(usize),
}

impl<'a> Value<'a> {
    /// Kind name used in error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Table(_) => "table",
            Value::Row(_) => "row",
            Value::Index(_) => "index",
        }
    }
}

impl<'a> From<&'a Binding<'a>> for Value<'a> {
    fn from(binding: &'a Binding<'a>) -> Self {
        match binding {
            Binding::Text(text) => Value::Text(text.as_str()),
            Binding::Table(table) => Value::Table(*table),
        }
    }
}

type Frame<'a> = Vec<(&'a str, Value<'a>)>;

/// Stack of binding frames, resolved innermost-first
///
/// The environment is the bottom frame; each loop iteration pushes one
/// frame and pops it when the iteration ends.
#[derive(Debug)]
pub(crate) struct Scope<'a> {
    frames: Vec<Frame<'a>>,
}

impl<'a> Scope<'a> {
    pub fn new(env: &'a Environment<'a>) -> Self {
        let base = env
            .iter()
            .map(|(name, binding)| (name, Value::from(binding)))
            .collect();
        Self { frames: vec![base] }
    }

    pub fn push(&mut self, frame: Frame<'a>) {
        self.frames.push(frame);
    }

    pub fn pop(&mut self) {
        // The environment frame stays for the whole expansion
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn lookup(&self, name: &str) -> Option<Value<'a>> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.iter().find(|(n, _)| *n == name).map(|(_, v)| *v))
    }
}
