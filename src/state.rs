//! Conversation data shared by the app state, the renderer, and the client.

use serde::{Deserialize, Serialize};

/// First message shown when the app starts or the conversation is cleared.
pub const GREETING: &str =
    "Hello! I'm the TravelTour assistant. Ask me about tours, prices, or itineraries.";

/// Shown when the service answers successfully but says nothing.
pub const EMPTY_ANSWER: &str = "(No answer content)";

/// Appended to the thread whenever a request fails.
pub const APOLOGY: &str = "Sorry, something went wrong while processing your request.";

/// Canned questions offered below the input box.
pub const SUGGESTIONS: [&str; 3] = [
    "Find the cheapest tour to Da Nang",
    "Suggest a 3-day 2-night tour under 5 million VND",
    "What does the Pleiku tour include?",
];

/// A chat message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self { role: ChatRole::User, content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self { role: ChatRole::Assistant, content: content.into() }
    }
}

/// The role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub fn label(&self) -> &'static str {
        match self {
            ChatRole::User => "You",
            ChatRole::Assistant => "TravelTour",
        }
    }
}
