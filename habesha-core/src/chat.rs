//! HahuBot Chat
//!
//! Keyword FAQ responder and the transcript model behind the chat widget.

use serde::{Deserialize, Serialize};

pub const BOT_NAME: &str = "HahuBot";

/// Shown when the chat backend cannot be reached
pub const CHAT_SERVICE_ERROR: &str = "Error communicating with the chatbot service.";

/// Shown when the server answers without a reply
pub const EMPTY_REPLY_ERROR: &str = "Received an empty reply from the server.";

/// Placeholder text of the pending bot message
pub const PENDING_TEXT: &str = "...";

/// First message of every conversation
pub fn greeting() -> String {
    format!(
        "Hi! I'm {}. How can I help you today? Ask about Wi-Fi, breakfast, check-out, or attractions.",
        BOT_NAME
    )
}

/// Question topics the FAQ responder recognises
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    Greeting,
    Wifi,
    Breakfast,
    Checkout,
    Attractions,
    Feedback,
    Unknown,
}

const WIFI_KEYWORDS: &[&str] = &["wifi", "wi-fi", "internet", "password", "network"];
const BREAKFAST_KEYWORDS: &[&str] = &["breakfast", "morning meal"];
const CHECKOUT_KEYWORDS: &[&str] = &["check-out", "checkout", "check out", "late departure"];
const ATTRACTION_KEYWORDS: &[&str] = &[
    "attraction",
    "museum",
    "sightseeing",
    "things to do",
    "visit",
    "tour",
    "merkato",
];
const FEEDBACK_KEYWORDS: &[&str] = &["feedback", "complain", "complaint", "suggestion", "review"];
const GREETING_WORDS: &[&str] = &["hi", "hello", "hey", "selam", "salam", "greetings"];

impl Intent {
    /// Classify a message; topics win over greetings ("hi, what's the wifi?")
    pub fn detect(message: &str) -> Self {
        let text = message.trim().to_lowercase();
        let has_any = |keywords: &[&str]| keywords.iter().any(|k| text.contains(k));

        if has_any(WIFI_KEYWORDS) {
            Intent::Wifi
        } else if has_any(BREAKFAST_KEYWORDS) {
            Intent::Breakfast
        } else if has_any(CHECKOUT_KEYWORDS) {
            Intent::Checkout
        } else if has_any(ATTRACTION_KEYWORDS) {
            Intent::Attractions
        } else if has_any(FEEDBACK_KEYWORDS) {
            Intent::Feedback
        } else if text
            .split(|c: char| !c.is_alphanumeric())
            .any(|word| GREETING_WORDS.contains(&word))
        {
            Intent::Greeting
        } else {
            Intent::Unknown
        }
    }

    pub fn reply(&self) -> &'static str {
        match self {
            Intent::Greeting => "Hello there! Nice to chat with you.",
            Intent::Wifi => "The Wi-Fi network is 'HabeshaHub_Guest' and the password is 'Hospitality2025'. Enjoy your stay!",
            Intent::Breakfast => "Breakfast is served daily from 7:00 AM to 10:00 AM in the main dining hall on the ground floor.",
            Intent::Checkout => "Standard check-out time is 11:00 AM. If you need a later check-out, please contact the front desk.",
            Intent::Attractions => "Near the hotel, you can visit the National Museum, Holy Trinity Cathedral, and Merkato market. Ask the concierge for maps and tours!",
            Intent::Feedback => "Thanks for wanting to share feedback! For detailed comments, please use our dedicated Feedback form found in the navigation menu. Is there anything else I can help you find?",
            Intent::Unknown => "Sorry, I didn't quite understand that. I can help with questions about Wi-Fi, breakfast times, check-out, and local attractions. Could you please rephrase?",
        }
    }
}

/// FAQ answer for a message; blank input gets no reply
pub fn faq_reply(message: &str) -> Option<&'static str> {
    if message.trim().is_empty() {
        None
    } else {
        Some(Intent::detect(message).reply())
    }
}

// ============================================
// WIRE TYPES
// ============================================

/// Body of `POST /chat/message`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

/// Response of `POST /chat/message`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub reply: String,
}

// ============================================
// TRANSCRIPT
// ============================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Bot,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    /// The "..." placeholder while a reply is on its way
    pub pending: bool,
}

impl ChatMessage {
    fn new(sender: Sender, text: impl Into<String>) -> Self {
        Self {
            sender,
            text: text.into(),
            pending: false,
        }
    }
}

/// Messages shown in the chat widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
}

impl Default for ChatTranscript {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatTranscript {
    /// A conversation opened with the bot's greeting
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::new(Sender::Bot, greeting())],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_waiting(&self) -> bool {
        self.messages.iter().any(|m| m.pending)
    }

    /// Add the user's message and a pending bot placeholder. Returns the
    /// trimmed text to send, or `None` when the input is blank or a reply
    /// is still pending.
    pub fn begin_send(&mut self, input: &str) -> Option<String> {
        let text = input.trim();
        if text.is_empty() || self.is_waiting() {
            return None;
        }

        self.messages.push(ChatMessage::new(Sender::User, text));
        self.messages.push(ChatMessage {
            sender: Sender::Bot,
            text: PENDING_TEXT.to_string(),
            pending: true,
        });
        Some(text.to_string())
    }

    /// Replace the pending placeholder with the reply or an error
    pub fn resolve(&mut self, result: Result<String, String>) {
        self.messages.retain(|m| !m.pending);

        let message = match result {
            Ok(reply) if !reply.trim().is_empty() => ChatMessage::new(Sender::Bot, reply),
            Ok(_) => ChatMessage::new(Sender::Error, EMPTY_REPLY_ERROR),
            Err(err) if err.is_empty() => ChatMessage::new(Sender::Error, CHAT_SERVICE_ERROR),
            Err(err) => ChatMessage::new(Sender::Error, err),
        };
        self.messages.push(message);
    }

    /// Add a local error, e.g. when the microphone cannot start
    pub fn push_error(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::new(Sender::Error, text));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_intents() {
        assert_eq!(Intent::detect("What is the WiFi password?"), Intent::Wifi);
        assert_eq!(Intent::detect("when is breakfast"), Intent::Breakfast);
        assert_eq!(Intent::detect("What time is check out?"), Intent::Checkout);
        assert_eq!(Intent::detect("Any museum nearby?"), Intent::Attractions);
        assert_eq!(Intent::detect("I have a complaint"), Intent::Feedback);
        assert_eq!(Intent::detect("Hello!"), Intent::Greeting);
        assert_eq!(Intent::detect("Selam"), Intent::Greeting);
        assert_eq!(Intent::detect("Do you have a gym?"), Intent::Unknown);
    }

    #[test]
    fn test_topic_beats_greeting() {
        assert_eq!(Intent::detect("hi, what's the wifi?"), Intent::Wifi);
        // "hi" inside another word is not a greeting
        assert_eq!(Intent::detect("this is odd"), Intent::Unknown);
    }

    #[test]
    fn test_faq_reply() {
        assert_eq!(faq_reply("   "), None);
        assert!(faq_reply("wifi").unwrap().contains("HabeshaHub_Guest"));
    }

    #[test]
    fn test_transcript_starts_with_greeting() {
        let t = ChatTranscript::new();
        assert_eq!(t.messages().len(), 1);
        assert_eq!(t.messages()[0].sender, Sender::Bot);
        assert!(t.messages()[0].text.starts_with("Hi! I'm HahuBot."));
    }

    #[test]
    fn test_send_and_resolve() {
        let mut t = ChatTranscript::new();
        assert_eq!(t.begin_send("  wifi?  ").as_deref(), Some("wifi?"));
        assert!(t.is_waiting());

        // Ignored while waiting
        assert_eq!(t.begin_send("again"), None);
        assert_eq!(t.begin_send(""), None);

        t.resolve(Ok("Network is HabeshaHub_Guest".to_string()));
        assert!(!t.is_waiting());

        let last = t.messages().last().unwrap();
        assert_eq!(last.sender, Sender::Bot);
        assert_eq!(t.messages().len(), 3);
    }

    #[test]
    fn test_resolve_errors() {
        let mut t = ChatTranscript::new();
        t.begin_send("hello");
        t.resolve(Ok("  ".to_string()));
        assert_eq!(t.messages().last().unwrap().text, EMPTY_REPLY_ERROR);

        t.begin_send("hello");
        t.resolve(Err(String::new()));
        let last = t.messages().last().unwrap();
        assert_eq!(last.sender, Sender::Error);
        assert_eq!(last.text, CHAT_SERVICE_ERROR);
    }
}
