use crate::error::ErrorKind;

/// Messages ordered from the mildest to the harshest, the eye picks one
/// according to how far the viewer's score is from its own.
pub const DEFAULT_MESSAGES: [&str; 5] = [
    "I suppose you don't have such bad taste after all.",
    "We disagree, but I can live with that. Barely.",
    "Your taste in movies is a cry for help.",
    "I have seen more discerning opinions written on bathroom walls.",
    "Words cannot express how wrong you are. I'll try anyway: wrong.",
];

#[derive(Debug, Clone, PartialEq)]
pub struct Judge {
    messages: Vec<String>,
}

impl Default for Judge {
    fn default() -> Self {
        Self::with_messages(DEFAULT_MESSAGES.iter().map(|m| m.to_string()).collect())
    }
}

impl Judge {
    pub fn with_messages(messages: Vec<String>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    /// Pick the message for the difference between both scores, the index
    /// is the truncated absolute difference capped at the last message.
    pub fn beratement(&self, eye_score: f64, viewer_score: f64) -> Result<&str, ErrorKind> {
        let last = self.messages.len().checked_sub(1).ok_or(ErrorKind::NoMessages)?;

        let difference = (eye_score - viewer_score).abs();
        if difference.is_nan() {
            return Err(ErrorKind::IndeterminateForm);
        }

        let index = (difference.trunc() as usize).min(last);
        Ok(&self.messages[index])
    }
}
