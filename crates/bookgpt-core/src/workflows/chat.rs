//! Free-form conversation about a book

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ExtractionError;
use crate::prompt::{require, FieldMap, GenerationRequest, PromptTemplate, TemplateId};

use super::Workflow;

/// Book the user selected; ids arrive as numbers or strings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookRef {
    pub id: Option<serde_json::Value>,
    pub title: String,
    pub author: String,
}

impl BookRef {
    /// Title and author are both present
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty() && !self.author.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub message: Option<String>,
    /// A `book` that is not a usable object is treated as absent
    #[serde(default, deserialize_with = "lenient_book")]
    pub book: Option<BookRef>,
}

fn lenient_book<'de, D>(deserializer: D) -> Result<Option<BookRef>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| serde_json::from_value(v).ok()))
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            book: None,
        }
    }

    pub fn with_book(mut self, book: BookRef) -> Self {
        self.book = Some(book);
        self
    }

    /// The selected book, when it names both title and author
    pub fn book(&self) -> Option<&BookRef> {
        self.book.as_ref().filter(|book| book.is_complete())
    }

    fn persona(&self) -> String {
        match self.book() {
            Some(book) => format!(
                "You are a helpful assistant that analyzes books. The user is asking about \
                 \"{}\" by {}. Provide insightful, detailed analysis based on the book's content, \
                 themes, characters, and literary techniques. Be specific and reference key \
                 elements from the book.",
                book.title, book.author
            ),
            None => "You are a helpful assistant that discusses books and literature. Provide \
                     thoughtful insights about literary works, themes, and analysis."
                .to_string(),
        }
    }
}

impl GenerationRequest for ChatRequest {
    fn missing_fields(&self) -> Vec<String> {
        let mut missing = Vec::new();
        require(&mut missing, "message", self.message.as_deref());
        missing
    }

    fn template_fields(&self) -> FieldMap {
        let mut fields = FieldMap::new();
        fields.insert("persona".to_string(), self.persona());
        fields.insert(
            "message".to_string(),
            self.message.clone().unwrap_or_default(),
        );
        fields
    }
}

#[derive(Debug, Clone)]
pub struct ChatWorkflow {
    template: PromptTemplate,
}

impl ChatWorkflow {
    pub fn new() -> Self {
        Self {
            template: PromptTemplate::new(
                TemplateId::Chat,
                "{{persona}}",
                "User Question: {{message}}",
            ),
        }
    }
}

impl Default for ChatWorkflow {
    fn default() -> Self {
        Self::new()
    }
}

impl Workflow for ChatWorkflow {
    type Input = ChatRequest;
    type Output = String;

    fn name(&self) -> &'static str {
        "chat"
    }

    fn template(&self) -> &PromptTemplate {
        &self.template
    }

    fn extract(&self, raw: &str) -> Result<String, ExtractionError> {
        let reply = raw.trim();
        if reply.is_empty() {
            return Err(ExtractionError::ShapeMismatch("empty reply".to_string()));
        }
        Ok(reply.to_string())
    }

    fn synthesize(&self, input: &ChatRequest) -> String {
        let message = input.message.as_deref().unwrap_or_default();
        match input.book() {
            Some(book) => format!(
                "I'd be happy to help you analyze \"{}\" by {}. Regarding your question: \"{}\" - \
                 This is a great question that touches on important themes in the book. The \
                 author explores this through various narrative techniques and character \
                 development. Would you like me to elaborate on any specific aspect?",
                book.title, book.author, message
            ),
            None => format!(
                "I'd be happy to help you with your question about books and literature: \"{}\". \
                 Could you please specify which book you'd like to discuss?",
                message
            ),
        }
    }
}
