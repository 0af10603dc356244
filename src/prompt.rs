use crate::config::PromptConfig;
use crate::message::{MessageEntry, Role};

/// Render the text block sent to the generator.
///
/// Lines are the system prompt, one `Label: content` line per entry in
/// `window`, then an open `Assistant:` marker for the model to continue.
///
/// ```
/// use neurochat::config::PromptConfig;
/// use neurochat::message::MessageEntry;
/// use neurochat::prompt::build_prompt;
///
/// let cfg = PromptConfig { system_prompt: "Be nice.".into(), ..PromptConfig::default() };
/// let text = build_prompt(&cfg, &[MessageEntry::user("hi")]);
/// assert_eq!(text, "Be nice.\nUser: hi\nNeuro:");
/// ```
pub fn build_prompt(config: &PromptConfig, window: &[MessageEntry]) -> String {
    let mut lines = Vec::with_capacity(window.len() + 2);
    lines.push(config.system_prompt.clone());
    for entry in window {
        let label = match entry.role {
            Role::User => &config.user_name,
            Role::Assistant => &config.assistant_name,
        };
        lines.push(format!("{label}: {}", entry.content));
    }
    lines.push(format!("{}:", config.assistant_name));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_each_turn_by_role() {
        let cfg = PromptConfig {
            system_prompt: "sys".into(),
            ..PromptConfig::default()
        };
        let window = [
            MessageEntry::user("hello"),
            MessageEntry::assistant("hi there"),
            MessageEntry::user("how are you"),
        ];
        assert_eq!(
            build_prompt(&cfg, &window),
            "sys\nUser: hello\nNeuro: hi there\nUser: how are you\nNeuro:"
        );
    }

    #[test]
    fn empty_system_prompt_still_leads() {
        let text = build_prompt(&PromptConfig::default(), &[MessageEntry::user("x")]);
        assert_eq!(text, "\nUser: x\nNeuro:");
    }

    #[test]
    fn custom_names_are_used() {
        let cfg = PromptConfig {
            assistant_name: "Evil".into(),
            user_name: "Chat".into(),
            ..PromptConfig::default()
        };
        let text = build_prompt(&cfg, &[MessageEntry::user("x")]);
        assert!(text.ends_with("Chat: x\nEvil:"));
    }
}
