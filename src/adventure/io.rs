//! Player-facing I/O seam. The engine only narrates and asks yes/no
//! questions; reading commands is the binary's job.

use std::collections::VecDeque;
use std::io::{self, BufRead, Write};

pub trait GameIo {
    /// Print one line of narration.
    fn say(&mut self, line: &str);

    /// Ask a yes/no question. Anything other than "yes"/"y" declines.
    fn confirm(&mut self, prompt: &str) -> bool;

    fn clear(&mut self) {}
}

pub fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "yes" | "y")
}

/// Console over stdin/stdout.
pub struct StdConsole {
    clear_screen: bool,
}

impl StdConsole {
    pub fn new(clear_screen: bool) -> Self {
        Self { clear_screen }
    }

    /// Prompt and read one line. `None` on end of input.
    pub fn read_line(&mut self, prompt: &str) -> Option<String> {
        print!("{}", prompt);
        let _ = io::stdout().flush();
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) | Err(_) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
        }
    }
}

impl GameIo for StdConsole {
    fn say(&mut self, line: &str) {
        println!("{}", line);
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        self.read_line(prompt)
            .map(|answer| is_affirmative(&answer))
            .unwrap_or(false)
    }

    fn clear(&mut self) {
        if self.clear_screen {
            // ANSI clear + home
            print!("\x1B[2J\x1B[H");
            let _ = io::stdout().flush();
        }
    }
}

/// Scripted I/O for driving sessions in tests: answers confirmations from a
/// queue (declining once it runs dry) and records everything said.
#[derive(Debug, Default)]
pub struct ScriptedIo {
    answers: VecDeque<String>,
    transcript: Vec<String>,
    prompts: Vec<String>,
}

impl ScriptedIo {
    pub fn new<I, S>(answers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            answers: answers.into_iter().map(Into::into).collect(),
            transcript: Vec::new(),
            prompts: Vec::new(),
        }
    }

    pub fn push_answer(&mut self, answer: &str) {
        self.answers.push_back(answer.to_string());
    }

    pub fn transcript(&self) -> &[String] {
        &self.transcript
    }

    pub fn transcript_contains(&self, needle: &str) -> bool {
        self.transcript.iter().any(|line| line.contains(needle))
    }

    pub fn prompts(&self) -> &[String] {
        &self.prompts
    }

    pub fn confirmations_asked(&self) -> usize {
        self.prompts.len()
    }

    pub fn clear_transcript(&mut self) {
        self.transcript.clear();
        self.prompts.clear();
    }
}

impl GameIo for ScriptedIo {
    fn say(&mut self, line: &str) {
        self.transcript.push(line.to_string());
    }

    fn confirm(&mut self, prompt: &str) -> bool {
        self.prompts.push(prompt.to_string());
        self.answers
            .pop_front()
            .map(|answer| is_affirmative(&answer))
            .unwrap_or(false)
    }
}
