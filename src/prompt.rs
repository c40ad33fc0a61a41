//! Interactive questions on stdin/stdout for values not given on the command
//! line.

use std::io::{self, BufRead, Write};

/// Answers that count as "yes". Compared case-insensitively after trimming.
const AFFIRMATIVE: &[&str] = &["yes", "y", "да"];

pub fn is_affirmative(answer: &str) -> bool {
    let answer = answer.trim().to_lowercase();
    AFFIRMATIVE.contains(&answer.as_str())
}

/// Parse a positive photo count.
pub fn parse_count(answer: &str) -> Option<u32> {
    answer.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    fn ask(&mut self, question: &str) -> io::Result<String> {
        write!(self.output, "{} ", question)?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "input closed before an answer was given",
            ));
        }
        Ok(line.trim().to_string())
    }

    /// Ask until a non-empty answer is given.
    pub fn ask_text(&mut self, question: &str) -> io::Result<String> {
        loop {
            let answer = self.ask(question)?;
            if !answer.is_empty() {
                return Ok(answer);
            }
        }
    }

    /// Ask until a positive integer is given.
    pub fn ask_count(&mut self, question: &str) -> io::Result<u32> {
        loop {
            let answer = self.ask(question)?;
            match parse_count(&answer) {
                Some(n) => return Ok(n),
                None => {
                    tracing::warn!("'{}' is not a positive number, try again", answer);
                }
            }
        }
    }

    /// Yes/no question. Anything other than an affirmative answer is "no".
    pub fn confirm(&mut self, question: &str) -> io::Result<bool> {
        let answer = self.ask(&format!("{} [yes/y/да]", question))?;
        Ok(is_affirmative(&answer))
    }
}
