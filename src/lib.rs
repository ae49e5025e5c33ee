//! `rlox` is a tree-walking interpreter for Lox, the language from Bob
//! Nystrom's [Crafting Interpreters](https://craftinginterpreters.com/).
//! Lox is a small dynamically typed language with lexical scoping,
//! closures, and single-inheritance classes.
//!
//! ## Scanning
//! The first step is scanning: turning a string of source characters into a
//! list of tokens. The scanner is implemented in [`scanner`] as a state
//! machine over a peekable character iterator. It reports syntax errors
//! (an unterminated string, an unrecognized character) as a
//! [`ScanError`](error::ScanError) and keeps scanning afterward, so a file
//! with several typos gets all of them reported in one pass.
//!
//! ## Parsing
//! The second step is parsing: turning the token list into an abstract
//! syntax tree. [`parser`] is a recursive-descent parser producing
//! [`Expr`](expr::Expr) and [`Stmt`](stmt::Stmt) nodes. It reports
//! [`ParseError`](error::ParseError)s and synchronizes at statement
//! boundaries to keep parsing after one.
//!
//! ## Resolving
//! The third step is static resolution: [`resolver`] walks the tree once,
//! before any of it runs, to bind every variable reference to a lexical
//! scope distance. This is what makes closures and shadowing behave
//! correctly without a name lookup at every reference.
//!
//! ## Interpreting
//! The final step is evaluating the tree. [`interpreter`] walks the AST and
//! produces [`Object`](object::Object) values, using [`environment`] to
//! track variable bindings through nested scopes and
//! [`RuntimeError`](error::RuntimeError) for failures only detectable
//! while running (a type mismatch, calling a non-callable, an undefined
//! property).

pub mod ast;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use std::fs;
use std::io::{self, Write};
use std::path::Path;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use error::{Host, LoxError};
use interpreter::Interpreter;
use parser::Parser;
use resolver::Resolver;
use scanner::Scanner;

/// Exit code policy inherited from the original `jlox`: a static error
/// (scan, parse, or resolve) exits 65; an uncaught runtime error exits 70.
pub const EX_DATAERR: i32 = 65;
pub const EX_SOFTWARE: i32 = 70;

/// Top-level driver tying the pipeline stages to an output sink. Owns the
/// interpreter (and through it, the `Host`) for the process's lifetime so
/// global state and output persist across REPL prompts.
pub struct Lox {
    interpreter: Interpreter,
}

impl Lox {
    pub fn new(out: Box<dyn Write>, err: Box<dyn Write>) -> Self {
        Lox { interpreter: Interpreter::new(Host::new(out, err)) }
    }

    pub fn had_error(&self) -> bool {
        self.interpreter.host.had_error()
    }

    pub fn had_runtime_error(&self) -> bool {
        self.interpreter.host.had_runtime_error()
    }

    /// Runs a script file to completion. Returns the process exit code the
    /// caller should use: 0 on success, 65 on a static error, 70 on an
    /// uncaught runtime error.
    pub fn run_file(&mut self, path: &Path) -> Result<i32, LoxError> {
        let source = fs::read_to_string(path)
            .map_err(|source| LoxError::ScriptRead { path: path.to_path_buf(), source })?;

        tracing::info!(path = %path.display(), "running script");
        self.run(&source);

        if self.had_error() {
            return Ok(EX_DATAERR);
        }
        if self.had_runtime_error() {
            return Ok(EX_SOFTWARE);
        }

        Ok(0)
    }

    /// Runs a source string in place of a script file, returning the exit
    /// code it would have produced. Exposed mainly so tests can drive the
    /// pipeline on inline Lox source instead of fixture files.
    pub fn run_source(&mut self, source: &str) -> i32 {
        self.run(source);

        if self.had_error() {
            return EX_DATAERR;
        }
        if self.had_runtime_error() {
            return EX_SOFTWARE;
        }

        0
    }

    /// Runs an interactive REPL on stdin/stdout. History is kept in
    /// `~/.rlox_history` via [`home`]; a bad line only resets the `Host`'s
    /// sticky error flags, it never aborts the session.
    pub fn run_prompt(&mut self) -> io::Result<()> {
        let history_path = home::home_dir().map(|home| home.join(".rlox_history"));

        let mut editor = DefaultEditor::new().map_err(|error| io::Error::other(error.to_string()))?;
        if let Some(path) = &history_path {
            let _ = editor.load_history(path);
        }

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    let _ = editor.add_history_entry(line.as_str());
                    self.run(&line);
                    self.interpreter.host.reset();
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
                Err(error) => {
                    tracing::warn!(%error, "readline failed");
                    break;
                }
            }
        }

        if let Some(path) = &history_path {
            let _ = editor.save_history(path);
        }

        Ok(())
    }

    fn run(&mut self, source: &str) {
        let scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens(&mut self.interpreter.host);

        if self.had_error() {
            return;
        }

        let mut parser = Parser::new(tokens);
        let statements = parser.parse(&mut self.interpreter.host);

        if self.had_error() {
            return;
        }

        Resolver::new(&mut self.interpreter).resolve(&statements);

        if self.had_error() {
            return;
        }

        self.interpreter.interpret(&statements);
    }
}
