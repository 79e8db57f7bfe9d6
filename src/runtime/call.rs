//! Interpreter call construction and rendering.
//!
//! Calls are built as data and rendered to expression text in one place, so
//! quoting rules live here and nowhere else. String arguments are escaped on
//! render; package names are additionally validated upstream by
//! [`crate::packages::PackageName`].

use crate::packages::PackageName;
use std::fmt;

/// An argument value in a rendered call.
#[derive(Debug, Clone, PartialEq)]
pub enum RValue {
    Bool(bool),
    Str(String),
    Strings(Vec<String>),
    Call(Box<RuntimeCall>),
}

impl From<bool> for RValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for RValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for RValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<&PackageName> for RValue {
    fn from(value: &PackageName) -> Self {
        Self::Str(value.as_str().to_string())
    }
}

impl From<Vec<String>> for RValue {
    fn from(value: Vec<String>) -> Self {
        Self::Strings(value)
    }
}

impl From<RuntimeCall> for RValue {
    fn from(value: RuntimeCall) -> Self {
        Self::Call(Box::new(value))
    }
}

/// A single function call destined for the embedded interpreter.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeCall {
    function: String,
    args: Vec<(Option<String>, RValue)>,
}

impl RuntimeCall {
    pub fn new(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            args: Vec::new(),
        }
    }

    /// Append a positional argument.
    pub fn arg(mut self, value: impl Into<RValue>) -> Self {
        self.args.push((None, value.into()));
        self
    }

    /// Append a named argument.
    pub fn named_arg(mut self, name: &str, value: impl Into<RValue>) -> Self {
        self.args.push((Some(name.to_string()), value.into()));
        self
    }

    /// Name of the called function, used in logs and error reports.
    pub fn function(&self) -> &str {
        &self.function
    }

    /// First positional string argument, if any. Test doubles use this to
    /// recover the package a call is about.
    pub fn first_string_arg(&self) -> Option<&str> {
        self.args.iter().find_map(|(name, value)| match value {
            RValue::Str(s) if name.is_none() => Some(s.as_str()),
            _ => None,
        })
    }

    /// First positional vector argument, if any.
    pub fn first_strings_arg(&self) -> Option<&[String]> {
        self.args.iter().find_map(|(name, value)| match value {
            RValue::Strings(s) if name.is_none() => Some(s.as_slice()),
            _ => None,
        })
    }

    /// Value of a named argument, if present.
    pub fn named(&self, name: &str) -> Option<&RValue> {
        self.args.iter().find_map(|(n, value)| match n {
            Some(n) if n == name => Some(value),
            _ => None,
        })
    }

    /// Render the bare expression, e.g. `requireNamespace("zoo", quietly = TRUE)`.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&self.function);
        out.push('(');
        for (i, (name, value)) in self.args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            if let Some(name) = name {
                out.push_str(name);
                out.push_str(" = ");
            }
            render_value(value, &mut out);
        }
        out.push(')');
        out
    }

    /// Render wrapped so the interpreter prints exactly `TRUE` or `FALSE`.
    pub fn render_flag(&self) -> String {
        format!(
            "cat(if (isTRUE({})) \"TRUE\" else \"FALSE\")",
            self.render()
        )
    }

    /// Render wrapped so the interpreter prints one result element per line.
    pub fn render_lines(&self) -> String {
        format!("cat({}, sep = \"\\n\")", self.render())
    }

    /// Render wrapped so a successful call prints nothing.
    pub fn render_invisible(&self) -> String {
        format!("invisible({})", self.render())
    }
}

impl fmt::Display for RuntimeCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

fn render_value(value: &RValue, out: &mut String) {
    match value {
        RValue::Bool(true) => out.push_str("TRUE"),
        RValue::Bool(false) => out.push_str("FALSE"),
        RValue::Str(s) => render_string(s, out),
        RValue::Strings(items) => {
            out.push_str("c(");
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push_str(", ");
                }
                render_string(item, out);
            }
            out.push(')');
        }
        RValue::Call(call) => out.push_str(&call.render()),
    }
}

/// Quote a string literal for the interpreter.
fn render_string(s: &str, out: &mut String) {
    out.push('"');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(ch),
        }
    }
    out.push('"');
}
