//! Terminal confirmation prompts

use curfew_api::Confirmation;
use curfew_host_api::{Confirmer, HostError, HostResult};
use dialoguer::Input;

/// Prompts on the controlling terminal, re-asking until the answer parses
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalConfirmer;

impl TerminalConfirmer {
    pub fn new() -> Self {
        Self
    }
}

impl Confirmer for TerminalConfirmer {
    fn confirm(&self, prompt: &str, preview: Option<&str>) -> HostResult<Confirmation> {
        if let Some(preview) = preview {
            println!("{}", preview);
            println!();
        }

        let answer: String = Input::new()
            .with_prompt(format!("{} (y/n/quit)", prompt))
            .validate_with(|input: &String| -> Result<(), String> {
                input
                    .parse::<Confirmation>()
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .interact_text()
            .map_err(|e| HostError::PromptFailed(e.to_string()))?;

        answer
            .parse()
            .map_err(|e: curfew_util::CurfewError| HostError::PromptFailed(e.to_string()))
    }
}
