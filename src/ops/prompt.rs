use anyhow::Result;
use dialoguer::Confirm;
use dialoguer::Input;
#[cfg(test)]
use mockall::automock;

// -----------------------------------------------------------------------------
// PromptOps trait

/// Blocking terminal prompts.
///
/// Kept behind a trait so resolution logic can be driven without a
/// controlling terminal.
#[cfg_attr(test, automock)]
pub trait PromptOps {
    /// Ask a yes/no question. `default` is used when the operator just
    /// presses enter.
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;

    /// Ask for a line of text, pre-filled with `default`.
    fn input(&self, prompt: &str, default: &str) -> Result<String>;
}

// -----------------------------------------------------------------------------
// RealPrompt

/// Real implementation backed by dialoguer
pub struct RealPrompt;

impl PromptOps for RealPrompt {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        Ok(Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?)
    }

    fn input(&self, prompt: &str, default: &str) -> Result<String> {
        // An empty default would render as a mandatory field; allow the
        // operator to leave the answer blank instead.
        let value = if default.is_empty() {
            Input::new()
                .with_prompt(prompt)
                .allow_empty(true)
                .interact_text()?
        } else {
            Input::new()
                .with_prompt(prompt)
                .default(default.to_string())
                .interact_text()?
        };

        Ok(value)
    }
}
