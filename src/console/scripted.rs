use std::collections::VecDeque;
use std::io;

use super::source::Console;

/// One entry of a [`ScriptedConsole`] transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Prompt(String),
    Message(String),
}

/// [`Console`] that answers from a fixed script and records everything shown.
#[derive(Debug, Default)]
pub struct ScriptedConsole {
    answers: VecDeque<String>,
    transcript: Vec<Line>,
}

impl ScriptedConsole {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
        }
    }

    pub fn prompts(&self) -> Vec<&str> {
        self.transcript
            .iter()
            .filter_map(|l| match l {
                Line::Prompt(p) => Some(p.as_str()),
                Line::Message(_) => None,
            })
            .collect()
    }

    pub fn messages(&self) -> Vec<&str> {
        self.transcript
            .iter()
            .filter_map(|l| match l {
                Line::Message(m) => Some(m.as_str()),
                Line::Prompt(_) => None,
            })
            .collect()
    }

    /// Everything written so far, prompts and messages, joined by newlines.
    pub fn output(&self) -> String {
        self.transcript
            .iter()
            .map(|l| match l {
                Line::Prompt(s) | Line::Message(s) => s.as_str(),
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Answers not consumed yet.
    pub fn remaining(&self) -> usize {
        self.answers.len()
    }
}

impl Console for ScriptedConsole {
    fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        self.transcript.push(Line::Prompt(prompt.to_string()));
        Ok(self.answers.pop_front())
    }

    fn say(&mut self, message: &str) -> io::Result<()> {
        self.transcript.push(Line::Message(message.to_string()));
        Ok(())
    }
}
