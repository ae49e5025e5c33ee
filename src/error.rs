use std::io::Write;
use std::path::PathBuf;

use crate::token::{Token, TokenKind};

/// An error at the host-process boundary: reading the script file handed
/// to `Lox::run_file` on the command line. Distinct from the pipeline's own
/// `ScanError`/`ParseError`/`ResolveError`/`RuntimeError`, which describe
/// failures in the Lox program itself rather than in the surrounding OS.
#[derive(Debug, thiserror::Error)]
pub enum LoxError {
    #[error("couldn't read script '{path}': {source}")]
    ScriptRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Owns the interpreter's output/diagnostic streams and the sticky flags the
/// host uses to pick an exit code. Threaded explicitly through the pipeline
/// instead of kept in global statics, so a REPL, a file run, and a test
/// harness can each supply their own streams without interfering with one
/// another.
pub struct Host {
    pub out: Box<dyn Write>,
    pub err: Box<dyn Write>,
    had_error: bool,
    had_runtime_error: bool,
}

impl Host {
    pub fn new(out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        Host { out, err, had_error: false, had_runtime_error: false }
    }

    pub fn had_error(&self) -> bool {
        self.had_error
    }

    pub fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }

    /// Clears both sticky flags. Called between REPL prompts so a bad line
    /// does not poison the rest of the session.
    pub fn reset(&mut self) {
        self.had_error = false;
        self.had_runtime_error = false;
    }

    pub fn report_static(&mut self, line: usize, at: &str, message: &str) {
        let _ = writeln!(self.err, "[line {line}] Error{at}: {message}");
        self.had_error = true;
        tracing::debug!(line, at, message, "static error reported");
    }

    pub fn report_runtime(&mut self, line: usize, message: &str) {
        let _ = writeln!(self.err, "{message}\n\t[Line {line}]");
        self.had_runtime_error = true;
        tracing::debug!(line, message, "runtime error reported");
    }
}

/// Implemented by every error kind the pipeline can surface; lets each
/// pipeline stage report its errors through the same `Host` without knowing
/// the exact formatting rule for other stages.
pub trait Reportable {
    fn report(&self, host: &mut Host);
}

/// An error raised by the scanner: an unterminated string, an unrecognized
/// character, etc. Scanning continues after one is raised.
#[derive(Debug)]
pub struct ScanError {
    pub line: usize,
    pub message: String,
}

impl Reportable for ScanError {
    fn report(&self, host: &mut Host) {
        host.report_static(self.line, "", &self.message);
    }
}

/// An error raised while parsing a declaration; the parser synchronizes and
/// keeps going after reporting one.
#[derive(Debug)]
pub struct ParseError {
    pub token: Token,
    pub message: String,
}

impl Reportable for ParseError {
    fn report(&self, host: &mut Host) {
        let at = token_location(&self.token);
        host.report_static(self.token.line, &at, &self.message);
    }
}

/// An error raised by the static resolver: duplicate bindings, `return`
/// outside a function, `this`/`super` misuse, self-inheriting classes.
#[derive(Debug)]
pub struct ResolveError {
    pub token: Token,
    pub message: String,
}

impl Reportable for ResolveError {
    fn report(&self, host: &mut Host) {
        let at = token_location(&self.token);
        host.report_static(self.token.line, &at, &self.message);
    }
}

/// An error raised by the evaluator: a type mismatch, an undefined name, a
/// bad call target. Aborts the statement list currently executing.
#[derive(Debug, Clone)]
pub struct RuntimeError {
    pub token: Token,
    pub message: String,
}

impl Reportable for RuntimeError {
    fn report(&self, host: &mut Host) {
        host.report_runtime(self.token.line, &self.message);
    }
}

fn token_location(token: &Token) -> String {
    if token.kind == TokenKind::Eof {
        " at end".to_string()
    } else {
        format!(" at '{}'", token.lexeme)
    }
}
