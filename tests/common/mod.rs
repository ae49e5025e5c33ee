use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use rlox::Lox;

/// An in-memory `Write` sink two owners can share: one moves into `Lox`,
/// the other stays behind to read back what was written.
#[derive(Clone, Default)]
pub struct Buffer(Rc<RefCell<Vec<u8>>>);

impl Buffer {
    pub fn new() -> Self {
        Buffer::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).expect("interpreter output is valid UTF-8")
    }
}

impl Write for Buffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// What running a Lox source string produced.
pub struct Run {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Runs `source` through the full scan/parse/resolve/interpret pipeline and
/// captures what it wrote to stdout and stderr.
pub fn run(source: &str) -> Run {
    let out = Buffer::new();
    let err = Buffer::new();

    let mut lox = Lox::new(Box::new(out.clone()), Box::new(err.clone()));
    let exit_code = lox.run_source(source);

    Run { stdout: out.contents(), stderr: err.contents(), exit_code }
}
