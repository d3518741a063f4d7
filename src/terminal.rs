use crate::core::error::CarltonError;
use crate::display;
use crate::input::{self, CarltonHelper};
use crate::interrupt::Interrupts;
use is_terminal::IsTerminal;
use rustyline::Editor;
use rustyline::history::MemHistory;
use std::io::{self, BufRead, BufReader, Write};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::Duration;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Line-oriented console used by the REPL and the commands.
pub trait Terminal {
    /// Reads one line. `Ok(None)` means Ctrl-C or end of input.
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, CarltonError>;

    /// A message in the assistant's voice.
    fn say(&mut self, message: &str);

    /// Model output printed exactly as received.
    fn show_text(&mut self, text: &str);

    fn show_markdown(&mut self, text: &str);

    fn show_error(&mut self, message: &str);

    fn ask(&mut self, prompt: &str) -> Result<String, CarltonError> {
        self.read_line(prompt)?.ok_or(CarltonError::InputClosed)
    }
}

/// Lines from a blocking reader, pumped by a thread so a pending read can be
/// abandoned when an interrupt arrives.
struct PlainLines {
    lines: Receiver<io::Result<String>>,
}

impl PlainLines {
    fn spawn<R: BufRead + Send + 'static>(mut reader: R) -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            loop {
                let mut line = String::new();
                match reader.read_line(&mut line) {
                    Ok(0) => break,
                    Ok(_) => {
                        if tx.send(Ok(line)).is_err() {
                            break;
                        }
                    }
                    Err(e) => {
                        let _ = tx.send(Err(e));
                        break;
                    }
                }
            }
        });
        Self { lines: rx }
    }

    /// `Ok(None)` on end of input or on an interrupt raised while waiting.
    fn next_line(&self, interrupts: &Interrupts) -> Result<Option<String>, CarltonError> {
        let seen = interrupts.count();
        loop {
            match self.lines.recv_timeout(POLL_INTERVAL) {
                Ok(line) => return Ok(Some(line?.trim_end_matches(['\r', '\n']).to_string())),
                Err(RecvTimeoutError::Timeout) if interrupts.count() != seen => return Ok(None),
                Err(RecvTimeoutError::Timeout) => continue,
                Err(RecvTimeoutError::Disconnected) => return Ok(None),
            }
        }
    }
}

enum Input {
    Editor(Box<Editor<CarltonHelper, MemHistory>>),
    Plain(PlainLines),
}

/// Interactive console; falls back to plain stdin when it is not a tty.
pub struct RustylineTerminal {
    input: Input,
    interrupts: Interrupts,
}

impl RustylineTerminal {
    pub fn new(command_names: Vec<String>, interrupts: Interrupts) -> Result<Self, CarltonError> {
        let input = if io::stdin().is_terminal() {
            Input::Editor(Box::new(input::create_editor(command_names)?))
        } else {
            tracing::debug!("stdin is not a terminal, reading plain lines");
            Input::Plain(PlainLines::spawn(BufReader::new(io::stdin())))
        };
        Ok(Self { input, interrupts })
    }
}

impl Terminal for RustylineTerminal {
    fn read_line(&mut self, prompt: &str) -> Result<Option<String>, CarltonError> {
        match &mut self.input {
            Input::Editor(editor) => input::read_input(editor, prompt),
            Input::Plain(lines) => {
                print!("{}", prompt);
                io::stdout().flush()?;
                lines.next_line(&self.interrupts)
            }
        }
    }

    fn say(&mut self, message: &str) {
        display::bot_says(message);
    }

    fn show_text(&mut self, text: &str) {
        display::display_code(text);
    }

    fn show_markdown(&mut self, text: &str) {
        display::display_markdown(text);
    }

    fn show_error(&mut self, message: &str) {
        display::display_error(message);
    }
}
