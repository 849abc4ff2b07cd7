//! Mock implementations for testing

use crate::error::{CliError, CliResult};
use crate::input::Interact;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::Path;

/// Mock implementation of Interact answering from a script
#[derive(Default)]
pub struct MockInteract {
    answers: RefCell<VecDeque<String>>,
    calls: RefCell<Vec<String>>,
}

impl MockInteract {
    /// Mock with no scripted answers
    pub fn new() -> Self {
        Self::default()
    }

    /// Mock answering each call with the next entry of `answers`
    pub fn with_answers(answers: &[&str]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().map(|a| a.to_string()).collect()),
            calls: RefCell::new(Vec::new()),
        }
    }

    /// Calls received so far, as `kind:argument`
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    fn answer(&self, call: String) -> CliResult<String> {
        self.calls.borrow_mut().push(call);
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| CliError::execution("no scripted answer left"))
    }
}

impl Interact for MockInteract {
    fn prompt(&self, text: &str) -> CliResult<String> {
        self.answer(format!("prompt:{}", text))
    }

    fn password(&self, text: &str) -> CliResult<String> {
        self.answer(format!("password:{}", text))
    }

    fn edit(&self, path: &Path) -> CliResult<String> {
        self.answer(format!("edit:{}", path.display()))
    }
}
