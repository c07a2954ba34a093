use docchat_llm_api::{ChatMessage, CompletionRequest};
use docchat_types::{recent_turns, ChatTurn};

/// Persona used when none is configured
pub const DEFAULT_PERSONA: &str =
    "You are a helpful AI assistant. Answer questions clearly, accurately and concisely.";

/// Sentence the model must use when the document lacks the answer
pub const NOT_IN_DOCUMENT: &str = "This information is not in the document.";

/// Fixed parts of every prompt
#[derive(Debug, Clone, PartialEq)]
pub struct PromptSettings {
    pub persona: String,
    /// Language every answer must be written in, if any
    pub language: Option<String>,
}

impl Default for PromptSettings {
    fn default() -> Self {
        Self {
            persona: DEFAULT_PERSONA.to_string(),
            language: None,
        }
    }
}

/// One conversation ready to be sent upstream
#[derive(Debug, Clone)]
pub struct ChatPrompt<'a> {
    settings: &'a PromptSettings,
    context: Option<&'a str>,
    history: &'a [ChatTurn],
    message: &'a str,
}

impl<'a> ChatPrompt<'a> {
    /// Blank contexts count as no context; history keeps only the most recent turns
    pub fn new(
        settings: &'a PromptSettings,
        message: &'a str,
        history: &'a [ChatTurn],
        context: Option<&'a str>,
    ) -> Self {
        Self {
            settings,
            context: context.filter(|c| !c.trim().is_empty()),
            history: recent_turns(history),
            message,
        }
    }

    pub fn context(&self) -> Option<&str> {
        self.context
    }

    pub fn history(&self) -> &[ChatTurn] {
        self.history
    }

    fn language_rule(&self) -> Option<String> {
        self.settings
            .language
            .as_ref()
            .map(|language| format!("Always answer in {}, never in any other language.", language))
    }

    fn grounding_rule(&self) -> String {
        format!(
            "Use ONLY the information in the document. If the answer is not in the document, say \"{}\"",
            NOT_IN_DOCUMENT
        )
    }

    /// System instruction for chat-completion backends
    pub fn system_instruction(&self) -> String {
        let mut instruction = self.settings.persona.clone();
        if let Some(rule) = self.language_rule() {
            instruction.push(' ');
            instruction.push_str(&rule);
        }

        if let Some(context) = self.context {
            instruction.push_str("\n\nAnswer based on the following document content:\n\n");
            instruction.push_str(context);
            instruction.push_str("\n\n");
            instruction.push_str(&self.grounding_rule());
        }

        instruction
    }

    /// System message, history turns, then the new user message
    pub fn to_messages(&self) -> Vec<ChatMessage> {
        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(ChatMessage::system(self.system_instruction()));
        messages.extend(
            self.history
                .iter()
                .map(|turn| ChatMessage::new(turn.role.as_str(), turn.content.clone())),
        );
        messages.push(ChatMessage::user(self.message));
        messages
    }

    /// The whole conversation as one prompt string
    pub fn to_single_prompt(&self) -> String {
        let mut rules = Vec::new();
        if let Some(rule) = self.language_rule() {
            rules.push(rule);
        }
        if self.context.is_some() {
            rules.push(self.grounding_rule());
        } else {
            rules.push("Answer from your general knowledge.".to_string());
        }
        rules.push("Keep answers short and to the point.".to_string());
        rules.push("Always finish your sentences; never stop mid-answer.".to_string());

        let mut prompt = format!("{}\n\nRULES:\n", self.settings.persona);
        for (i, rule) in rules.iter().enumerate() {
            prompt.push_str(&format!("{}. {}\n", i + 1, rule));
        }
        prompt.push('\n');

        if let Some(context) = self.context {
            prompt.push_str("DOCUMENT CONTENT:\n");
            prompt.push_str(context);
            prompt.push_str("\n\n");
        }

        if !self.history.is_empty() {
            prompt.push_str("CONVERSATION HISTORY:\n");
            for turn in self.history {
                prompt.push_str(&format!("{}: {}\n", turn.role.label(), turn.content));
            }
            prompt.push('\n');
        }

        prompt.push_str(&format!("User: {}\nAssistant:", self.message));
        prompt
    }

    pub fn to_request(&self) -> CompletionRequest {
        CompletionRequest {
            messages: self.to_messages(),
            prompt: self.to_single_prompt(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn long_history(n: usize) -> Vec<ChatTurn> {
        (0..n)
            .map(|i| {
                if i % 2 == 0 {
                    ChatTurn::user(format!("question {}", i))
                } else {
                    ChatTurn::assistant(format!("answer {}", i))
                }
            })
            .collect()
    }

    #[test]
    fn test_context_is_verbatim_with_restriction() {
        let settings = PromptSettings::default();
        let context = "Article 5: The warranty lasts 24 months.\n  Indented line.";
        let prompt = ChatPrompt::new(&settings, "How long is the warranty?", &[], Some(context));

        let system = prompt.system_instruction();
        assert!(system.contains(context));
        assert!(system.contains("Use ONLY the information in the document"));
        assert!(system.contains(NOT_IN_DOCUMENT));

        let single = prompt.to_single_prompt();
        assert!(single.contains(&format!("DOCUMENT CONTENT:\n{}\n", context)));
        assert!(single.contains("Use ONLY the information in the document"));
    }

    #[test]
    fn test_no_context_uses_general_knowledge() {
        let settings = PromptSettings::default();
        for context in [None, Some(""), Some("   \n")] {
            let prompt = ChatPrompt::new(&settings, "Hi", &[], context);
            assert_eq!(prompt.context(), None);
            assert_eq!(prompt.system_instruction(), DEFAULT_PERSONA);
            let single = prompt.to_single_prompt();
            assert!(single.contains("Answer from your general knowledge."));
            assert!(!single.contains("DOCUMENT CONTENT"));
        }
    }

    #[test]
    fn test_messages_layout() {
        let settings = PromptSettings::default();
        let history = vec![ChatTurn::user("Hi"), ChatTurn::assistant("Hello!")];
        let messages = ChatPrompt::new(&settings, "How are you?", &history, None).to_messages();

        assert_eq!(
            messages,
            vec![
                ChatMessage::system(DEFAULT_PERSONA),
                ChatMessage::user("Hi"),
                ChatMessage::assistant("Hello!"),
                ChatMessage::user("How are you?"),
            ]
        );
    }

    #[test]
    fn test_history_truncated_to_last_ten() {
        let settings = PromptSettings::default();
        let history = long_history(15);
        let prompt = ChatPrompt::new(&settings, "latest", &history, None);

        assert_eq!(prompt.history().len(), 10);
        let messages = prompt.to_messages();
        // system + 10 turns + new message
        assert_eq!(messages.len(), 12);
        assert_eq!(messages[1].content, "answer 5");
        assert_eq!(messages[10].content, "question 14");

        let single = prompt.to_single_prompt();
        assert!(!single.contains("question 4\n"));
        assert!(single.contains("Assistant: answer 5\n"));
        assert!(single.contains("User: question 14\n"));
    }

    #[test]
    fn test_single_prompt_layout() {
        let settings = PromptSettings {
            persona: "You are a tutor.".to_string(),
            language: Some("Turkish".to_string()),
        };
        let history = vec![ChatTurn::user("Hi"), ChatTurn::assistant("Hello")];
        let prompt = ChatPrompt::new(&settings, "Explain photosynthesis", &history, Some("Plants make sugar."));

        let expected = "You are a tutor.\n\nRULES:\n\
            1. Always answer in Turkish, never in any other language.\n\
            2. Use ONLY the information in the document. If the answer is not in the document, say \"This information is not in the document.\"\n\
            3. Keep answers short and to the point.\n\
            4. Always finish your sentences; never stop mid-answer.\n\n\
            DOCUMENT CONTENT:\nPlants make sugar.\n\n\
            CONVERSATION HISTORY:\nUser: Hi\nAssistant: Hello\n\n\
            User: Explain photosynthesis\nAssistant:";
        assert_eq!(prompt.to_single_prompt(), expected);
    }

    #[test]
    fn test_language_rule_in_system_instruction() {
        let settings = PromptSettings {
            persona: "You are a tutor.".to_string(),
            language: Some("Turkish".to_string()),
        };
        let prompt = ChatPrompt::new(&settings, "Hi", &[], None);
        assert_eq!(
            prompt.system_instruction(),
            "You are a tutor. Always answer in Turkish, never in any other language."
        );
    }
}
