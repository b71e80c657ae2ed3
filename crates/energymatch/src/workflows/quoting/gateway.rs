use async_trait::async_trait;

/// Raw document bytes forwarded inline with a generation request. The
/// document lives only for the duration of the outbound call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineDocument {
    pub data: Vec<u8>,
    pub media_type: String,
}

/// One outbound request to the hosted generative service: a prompt, an
/// optional inline document, and an optional schema hint describing the
/// expected JSON reply shape. When a schema is present the service is asked
/// for a JSON-typed reply; otherwise plain text.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub document: Option<InlineDocument>,
    pub response_schema: Option<serde_json::Value>,
}

impl GenerationRequest {
    pub fn text(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            document: None,
            response_schema: None,
        }
    }

    pub fn with_document(mut self, document: InlineDocument) -> Self {
        self.document = Some(document);
        self
    }

    pub fn with_schema(mut self, schema: serde_json::Value) -> Self {
        self.response_schema = Some(schema);
        self
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error("generative service unreachable: {0}")]
    Transport(String),
    #[error("generative service returned status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("generative service returned no candidates")]
    EmptyReply,
}

/// Seam over the hosted generative API so workflows and tests never touch
/// the wire directly. A single attempt per call; no retry at this layer.
#[async_trait]
pub trait GenerativeGateway: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String, GatewayError>;
}
