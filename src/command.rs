//! Structured command construction.
//!
//! Client invocations are built as argument vectors and executed without a
//! shell, so credential and table-name values never need escaping at run
//! time. [`ShellCommand::render`] produces the shell-quoted form shown to
//! the operator in debug and dry-run modes; splitting that form back through
//! `shlex` recovers the original argv.

use std::fmt;
use std::path::{Path, PathBuf};

/// One fully-built client invocation.
///
/// Holds the program, its argument vector, and an optional file to feed to
/// stdin (the load and apply-script paths read their SQL that way).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellCommand {
    program: PathBuf,
    args: Vec<String>,
    stdin: Option<PathBuf>,
}

impl ShellCommand {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: None,
        }
    }

    /// Append a single argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Feed the command's stdin from a file.
    pub fn stdin_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdin = Some(path.into());
        self
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn argv(&self) -> &[String] {
        &self.args
    }

    pub fn stdin(&self) -> Option<&Path> {
        self.stdin.as_deref()
    }

    /// Render the command for display, shell-quoting anything a shell would
    /// mangle. Values containing spaces or quotes survive intact.
    pub fn render(&self) -> String {
        let mut rendered = quote(&self.program.to_string_lossy());
        for arg in &self.args {
            rendered.push(' ');
            rendered.push_str(&quote(arg));
        }
        if let Some(stdin) = &self.stdin {
            rendered.push_str(" < ");
            rendered.push_str(&quote(&stdin.to_string_lossy()));
        }
        rendered
    }
}

impl fmt::Display for ShellCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render())
    }
}

fn quote(token: &str) -> String {
    shlex::try_quote(token)
        .map(|quoted| quoted.into_owned())
        .unwrap_or_else(|_| token.to_string())
}
