use std::io;

/// Line-oriented user interaction: a source of answers and a sink for messages.
pub trait Console {
    /// Shows `prompt` and returns the next line without its line ending, or
    /// `None` once input is exhausted.
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>>;

    /// Writes one message line.
    fn say(&mut self, message: &str) -> io::Result<()>;
}
