//! Configurable output destination for `print`/`println`.
//!
//! Enum dispatch instead of a trait object keeps this frequently-hit
//! path static.

use std::rc::Rc;

use parking_lot::Mutex;

/// Shared handle passed into the builtins that produce output.
pub type SharedPrintHandler = Rc<PrintHandler>;

/// Output destination.
pub enum PrintHandler {
    /// Write straight to stdout (the CLI default).
    Stdout(StdoutPrintHandler),
    /// Capture into a buffer (tests, embedding).
    Buffer(BufferPrintHandler),
}

impl PrintHandler {
    pub fn stdout() -> SharedPrintHandler {
        Rc::new(PrintHandler::Stdout(StdoutPrintHandler))
    }

    pub fn buffer() -> SharedPrintHandler {
        Rc::new(PrintHandler::Buffer(BufferPrintHandler::new()))
    }

    pub fn print(&self, msg: &str) {
        match self {
            PrintHandler::Stdout(h) => h.print(msg),
            PrintHandler::Buffer(h) => h.print(msg),
        }
    }

    pub fn println(&self, msg: &str) {
        match self {
            PrintHandler::Stdout(h) => h.println(msg),
            PrintHandler::Buffer(h) => h.println(msg),
        }
    }

    /// Captured output. Empty for the stdout handler.
    pub fn output(&self) -> String {
        match self {
            PrintHandler::Stdout(_) => String::new(),
            PrintHandler::Buffer(h) => h.output(),
        }
    }
}

/// Writes straight to stdout.
#[derive(Default)]
pub struct StdoutPrintHandler;

impl StdoutPrintHandler {
    pub fn print(&self, msg: &str) {
        print!("{msg}");
    }

    pub fn println(&self, msg: &str) {
        println!("{msg}");
    }
}

/// Captures output into a buffer for assertions.
#[derive(Default)]
pub struct BufferPrintHandler {
    buffer: Mutex<String>,
}

impl BufferPrintHandler {
    pub fn new() -> Self {
        BufferPrintHandler::default()
    }

    pub fn print(&self, msg: &str) {
        self.buffer.lock().push_str(msg);
    }

    pub fn println(&self, msg: &str) {
        let mut buf = self.buffer.lock();
        buf.push_str(msg);
        buf.push('\n');
    }

    pub fn output(&self) -> String {
        self.buffer.lock().clone()
    }
}
