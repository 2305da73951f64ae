use dialoguer::Input;

use crate::error::{BasketError, Result};
use crate::panel::Prompter;

pub struct TermPrompter;

impl Prompter for TermPrompter {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        Input::<String>::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .map_err(|e| BasketError::Other(format!("input closed: {e}")))
    }

    fn say(&mut self, line: &str) {
        println!("{line}");
    }
}
