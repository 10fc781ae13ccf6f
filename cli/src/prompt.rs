use colored::Colorize;
use env_defs::Prompter;
use log::warn;

/// Terminal prompts. When stdin is not a terminal, or the prompt is
/// cancelled, confirmations are declined and text prompts return nothing.
pub struct InquirePrompter;

impl Prompter for InquirePrompter {
    fn confirm(&self, message: &str) -> bool {
        let message = message.bold().to_string();
        match inquire::Confirm::new(&message).with_default(false).prompt() {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Treating unanswered confirmation as no: {}", e);
                false
            }
        }
    }

    fn prompt_text(&self, message: &str) -> Option<String> {
        let message = message.bold().to_string();
        match inquire::Text::new(&message).prompt() {
            Ok(answer) => Some(answer),
            Err(e) => {
                warn!("No answer to prompt: {}", e);
                None
            }
        }
    }
}
