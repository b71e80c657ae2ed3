use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::workflows::quoting::gateway::{GenerationRequest, GenerativeGateway};

pub const COACH_SYSTEM_INSTRUCTION: &str = "\
You are the \"Energy Coach\" for the EnergyMatch platform. \
You assist both Small/Medium Enterprises (PyMEs) and Homeowners in Colombia. \
Your goal is to educate the user about renewable energy, explain technical terms \
(ROI, kWh, Inverters) in simple Spanish, and suggest efficiency improvements. \
Be friendly, professional, and concise. Always consider the local climate conditions.";

/// Shown when the service answers with an empty candidate set.
pub const COACH_EMPTY_REPLY: &str = "Lo siento, no pude procesar tu consulta en este momento.";
/// Shown when the service cannot be reached at all.
pub const COACH_OFFLINE_REPLY: &str = "Error de conexión con el Asistente Energético.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

impl ChatRole {
    pub const fn label(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only, chronological conversation log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChatTranscript {
    messages: Vec<ChatMessage>,
}

impl ChatTranscript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, role: ChatRole, text: impl Into<String>) {
        self.messages.push(ChatMessage {
            role,
            text: text.into(),
            timestamp: Utc::now(),
        });
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

fn coach_prompt(transcript: &ChatTranscript, message: &str) -> String {
    let mut prompt = String::from(COACH_SYSTEM_INSTRUCTION);
    prompt.push_str("\n\n");
    for entry in transcript.messages() {
        writeln!(prompt, "{}: {}", entry.role.label(), entry.text).expect("write history line");
    }
    writeln!(prompt, "user: {message}").expect("write user line");
    prompt.push_str("assistant:");
    prompt
}

/// One coach turn. The chat never errors: transport failure and empty
/// replies both map to fixed fallback strings.
pub async fn respond<G: GenerativeGateway>(
    gateway: &G,
    transcript: &ChatTranscript,
    message: &str,
) -> String {
    match gateway
        .generate(GenerationRequest::text(coach_prompt(transcript, message)))
        .await
    {
        Ok(reply) if !reply.trim().is_empty() => reply,
        Ok(_) => COACH_EMPTY_REPLY.to_string(),
        Err(err) => {
            warn!(%err, "energy coach unavailable");
            COACH_OFFLINE_REPLY.to_string()
        }
    }
}
