#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMessageRole {
    System,
    User,
    Assistant,
}

impl SessionMessageRole {
    fn as_str(&self) -> &'static str {
        match self {
            SessionMessageRole::System => "system",
            SessionMessageRole::User => "user",
            SessionMessageRole::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone)]
pub struct SessionMessage {
    pub role: SessionMessageRole,
    pub content: String,
}

#[derive(Debug)]
pub enum SessionInput {
    Text(String),
    Messages(Vec<SessionMessage>),
}

pub trait SessionInputProcessor: Send + Sync {
    fn process(
        &self,
        input: &SessionInput,
    ) -> String;
}

/// Plain-text rendering; chat templating belongs to the external
/// tokenizer stack.
pub struct SessionInputProcessorDefault;

impl SessionInputProcessor for SessionInputProcessorDefault {
    fn process(
        &self,
        input: &SessionInput,
    ) -> String {
        match input {
            SessionInput::Text(content) => content.clone(),
            SessionInput::Messages(messages) => messages
                .iter()
                .map(|message| {
                    format!("{}: {}", message.role.as_str(), message.content)
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }
}
