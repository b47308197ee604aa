/// Line input for the shell.
///
/// Everything the program asks of the user flows through [`LineSource`], so
/// the configuration prompts and the menu loop can be driven by scripted
/// input in tests. The interactive implementation wraps `reedline`; a
/// keyboard interrupt (Ctrl-C or Ctrl-D) surfaces as
/// `SqlRunError::Interrupted` and is turned into a graceful shutdown by the
/// caller, never a crash.
use crate::core::error::{Result, SqlRunError};
use reedline::{
    Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus, Reedline, Signal,
};
use std::borrow::Cow;
use std::collections::VecDeque;

pub trait LineSource {
    /// Displays `prompt` and reads one line, blocking until the user
    /// answers or interrupts.
    fn read_line(&mut self, prompt: &str) -> Result<String>;
}

/// Interactive prompt backed by reedline.
pub struct InteractivePrompt {
    editor: Reedline,
    prompt: TextPrompt,
}

impl InteractivePrompt {
    pub fn new() -> Self {
        InteractivePrompt {
            editor: Reedline::create(),
            prompt: TextPrompt {
                text: String::new(),
            },
        }
    }
}

impl Default for InteractivePrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl LineSource for InteractivePrompt {
    fn read_line(&mut self, prompt: &str) -> Result<String> {
        self.prompt.text = prompt.to_string();
        match self.editor.read_line(&self.prompt)? {
            Signal::Success(line) => Ok(line),
            Signal::CtrlC | Signal::CtrlD => Err(SqlRunError::Interrupted),
        }
    }
}

/// Plain-text prompt rendering for reedline.
struct TextPrompt {
    text: String,
}

impl Prompt for TextPrompt {
    fn render_prompt_left(&self) -> Cow<str> {
        Cow::Borrowed(&self.text)
    }

    fn render_prompt_right(&self) -> Cow<str> {
        Cow::Borrowed("")
    }

    fn render_prompt_indicator(&self, _edit_mode: PromptEditMode) -> Cow<str> {
        Cow::Borrowed("")
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<str> {
        Cow::Borrowed("::: ")
    }

    fn render_prompt_history_search_indicator(
        &self,
        history_search: PromptHistorySearch,
    ) -> Cow<str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!(
            "({}reverse-search: {}) ",
            prefix, history_search.term
        ))
    }
}

/// Feeds pre-seeded lines and reports an interrupt once they run out.
/// Used by tests to drive the configuration prompts and the menu loop.
pub struct ScriptedLines {
    lines: VecDeque<String>,
}

impl ScriptedLines {
    pub fn new<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ScriptedLines {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }
}

impl LineSource for ScriptedLines {
    fn read_line(&mut self, _prompt: &str) -> Result<String> {
        self.lines.pop_front().ok_or(SqlRunError::Interrupted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_lines_yield_in_order_then_interrupt() {
        let mut lines = ScriptedLines::new(["first", "second"]);
        assert_eq!(lines.read_line("> ").unwrap(), "first");
        assert_eq!(lines.read_line("> ").unwrap(), "second");
        assert!(matches!(
            lines.read_line("> "),
            Err(SqlRunError::Interrupted)
        ));
    }
}
