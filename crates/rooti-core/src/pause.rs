//! Pause-category prompt.
//!
//! Pausing with the prompt enabled opens it; the user then either picks a
//! category (one of the configured presets or free text) or dismisses it.
//! The engine is never blocked on the answer: the prompt is just an
//! explicit pending state that the session consults when an answer arrives.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromptState {
    #[default]
    Closed,
    Open,
}

#[derive(Debug, Clone, Default)]
pub struct PausePrompt {
    state: PromptState,
    presets: Vec<String>,
}

impl PausePrompt {
    pub fn new(presets: Vec<String>) -> Self {
        Self {
            state: PromptState::Closed,
            presets,
        }
    }

    pub fn state(&self) -> PromptState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == PromptState::Open
    }

    pub fn presets(&self) -> &[String] {
        &self.presets
    }

    /// Preset by 1-based position, as listed to the user.
    pub fn preset(&self, number: usize) -> Option<&str> {
        number
            .checked_sub(1)
            .and_then(|i| self.presets.get(i))
            .map(String::as_str)
    }

    /// Returns `false` if it was already open.
    pub fn open(&mut self) -> bool {
        let was_closed = self.state == PromptState::Closed;
        self.state = PromptState::Open;
        was_closed
    }

    /// Returns `false` if it was already closed.
    pub fn close(&mut self) -> bool {
        let was_open = self.is_open();
        self.state = PromptState::Closed;
        was_open
    }

    /// Accept an answer. Blank input is ignored and leaves the prompt open;
    /// anything else closes it and yields the trimmed category. Answers
    /// while closed are ignored.
    pub fn submit(&mut self, category: &str) -> Option<String> {
        if !self.is_open() {
            return None;
        }
        let category = category.trim();
        if category.is_empty() {
            return None;
        }
        self.state = PromptState::Closed;
        Some(category.to_string())
    }

    /// Dismiss without a category. Returns `false` if nothing was open.
    pub fn cancel(&mut self) -> bool {
        self.close()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prompt() -> PausePrompt {
        PausePrompt::new(vec!["휴대폰".into(), "식사".into()])
    }

    #[test]
    fn submit_trims_and_closes() {
        let mut p = prompt();
        p.open();
        assert_eq!(p.submit("  phone "), Some("phone".to_string()));
        assert!(!p.is_open());
    }

    #[test]
    fn blank_submit_keeps_prompt_open() {
        let mut p = prompt();
        p.open();
        assert_eq!(p.submit("   "), None);
        assert!(p.is_open());
    }

    #[test]
    fn submit_while_closed_is_ignored() {
        let mut p = prompt();
        assert_eq!(p.submit("phone"), None);
    }

    #[test]
    fn cancel_closes_once() {
        let mut p = prompt();
        assert!(!p.cancel());
        p.open();
        assert!(p.cancel());
        assert_eq!(p.state(), PromptState::Closed);
    }

    #[test]
    fn presets_are_one_based() {
        let p = prompt();
        assert_eq!(p.preset(1), Some("휴대폰"));
        assert_eq!(p.preset(2), Some("식사"));
        assert_eq!(p.preset(0), None);
        assert_eq!(p.preset(3), None);
    }
}
