use agentkit_core::{ChatRequest, Message, MessageType};

pub const SYSTEM_PROMPT: &str = "You are a helpful cooking assistant. Provide clear, step-by-step instructions for recipes and cooking techniques when users ask specific questions. Respond only to the current question without referencing previous conversation context.";

/// Words that end a console session.
pub const QUIT_WORDS: [&str; 3] = ["quit", "exit", "bye"];

const VAGUE_TERMS: [&str; 23] = [
    "hello",
    "hi",
    "hey",
    "good morning",
    "good afternoon",
    "good evening",
    "help",
    "assist",
    "support",
    "guide",
    "advice",
    "tips",
    "cook",
    "make",
    "prepare",
    "recipe",
    "food",
    "dish",
    "something",
    "anything",
    "whatever",
    "idk",
    "i don't know",
];

pub fn is_quit(input: &str) -> bool {
    let lower = input.trim().to_lowercase();
    QUIT_WORDS.contains(&lower.as_str())
}

/// Too short, or a greeting or generic ask with no real subject.
///
/// Terms match as substrings, so "this" counts as containing "hi".
pub fn is_vague_input(input: &str) -> bool {
    let lower = input.trim().to_lowercase();
    let words = input.split_whitespace().count();

    if words <= 3 && VAGUE_TERMS.iter().any(|term| lower.contains(term)) {
        return true;
    }
    words < 2
}

/// Follow-up question for input that [`is_vague_input`] flagged.
pub fn clarification_prompt(input: &str) -> &'static str {
    let lower = input.trim().to_lowercase();
    let mentions = |terms: &[&str]| terms.iter().any(|t| lower.contains(t));

    if mentions(&["hello", "hi", "hey"][..]) {
        "Hello! I'm here to help with cooking. What specific dish or cooking technique would you like to learn about?"
    } else if mentions(&["help", "assist"][..]) {
        "I'd be happy to help with cooking! What specific recipe or cooking question do you have?"
    } else if mentions(&["cook", "make", "recipe"][..]) {
        "Great! What specific dish would you like to cook? Please let me know the name of the dish or the main ingredient you want to work with."
    } else {
        "I'd like to help you with cooking! Could you please be more specific about what you'd like to learn or make?"
    }
}

/// Chat history for one console session, sent to the model as a plain
/// `System:/Human:/Assistant:` transcript.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new(SYSTEM_PROMPT)
    }
}

impl Conversation {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        Self {
            messages: vec![Message::system(system_prompt)],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn push_human(&mut self, content: impl Into<String>) {
        self.messages.push(Message::human(content));
    }

    pub fn push_ai(&mut self, content: impl Into<String>) {
        self.messages.push(Message::ai(content));
    }

    pub fn transcript(&self) -> String {
        self.messages
            .iter()
            .filter(|m| m.message_type != MessageType::Tool)
            .map(|m| format!("{}\n", m))
            .collect()
    }

    /// Record the user's turn and build the request carrying the transcript.
    pub fn ask(&mut self, input: &str) -> ChatRequest {
        self.push_human(input);
        ChatRequest::prompt(self.transcript())
    }
}
