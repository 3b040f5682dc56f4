use std::sync::Arc;
use tracing::instrument;

use crate::application::{stuff_context, RagService, TOP_K};
use crate::domain::ports::{EmbeddingService, IndexRepository, LlmService};
use crate::domain::{DomainError, Message, PromptTemplate};
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::{
    HuggingFaceEmbedding, HuggingFaceLlm, InMemoryVectorStore, JsonIndexRepository,
};

/// Answers health questions from the prebuilt knowledge base.
///
/// Every call reloads the index and rebuilds the retrieval chain; nothing
/// is cached between calls.
pub struct RetrievalAssistant {
    index: Arc<dyn IndexRepository>,
    embedding: Arc<dyn EmbeddingService>,
    llm: Arc<dyn LlmService>,
    prompt: PromptTemplate,
}

impl RetrievalAssistant {
    pub fn new(
        index: Arc<dyn IndexRepository>,
        embedding: Arc<dyn EmbeddingService>,
        llm: Arc<dyn LlmService>,
        prompt: PromptTemplate,
    ) -> Self {
        Self {
            index,
            embedding,
            llm,
            prompt,
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        let settings = &config.config;
        Self::new(
            Arc::new(JsonIndexRepository::new(&settings.rag.index_path)),
            Arc::new(HuggingFaceEmbedding::from_config(&settings.embedding)),
            Arc::new(HuggingFaceLlm::from_config(&settings.llm)),
            config.prompts.assistant.template(),
        )
    }

    /// Runs the retrieval chain for one question.
    #[instrument(skip(self, question), fields(question_len = question.len(), top_k = TOP_K))]
    pub async fn answer(&self, question: &str) -> Result<String, DomainError> {
        let index = self.index.load().await?;
        if index.embedding_model != self.embedding.model() {
            tracing::warn!(
                index_model = %index.embedding_model,
                query_model = %self.embedding.model(),
                "index was built with a different embedding model"
            );
        }

        let store = Arc::new(InMemoryVectorStore::from(index));
        let rag = RagService::new(self.embedding.clone(), store);

        let passages = rag.retrieve(question).await?;
        tracing::debug!(retrieved = passages.len(), "passages retrieved");

        let context = stuff_context(&passages);
        let prompt = self
            .prompt
            .render(&[("context", context.as_str()), ("question", question)])?;

        self.llm.complete(&prompt).await
    }

    /// Chat-turn entry point. `history` is accepted for interface
    /// compatibility and ignored: each reply depends on `message` alone.
    pub async fn respond(&self, message: &str, _history: &[Message]) -> Vec<Message> {
        let content = match self.answer(message).await {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, kind = e.kind(), "assistant turn failed");
                format!("Error: {e}")
            }
        };

        vec![Message::assistant(content)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DocumentChunk, Embedding, MessageRole, VectorIndex};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use uuid::Uuid;

    struct StaticIndex(Option<VectorIndex>);

    #[async_trait]
    impl IndexRepository for StaticIndex {
        async fn load(&self) -> Result<VectorIndex, DomainError> {
            self.0
                .clone()
                .ok_or_else(|| DomainError::not_found("vector index vectorstore/index.json"))
        }

        async fn save(&self, _index: &VectorIndex) -> Result<(), DomainError> {
            Ok(())
        }
    }

    struct AxisEmbedding {
        fail: bool,
    }

    #[async_trait]
    impl EmbeddingService for AxisEmbedding {
        async fn embed(&self, text: &str) -> Result<Embedding, DomainError> {
            if self.fail {
                return Err(DomainError::external("embedding model failed to load"));
            }
            // Questions mentioning sleep point at the first axis.
            Ok(if text.contains("sleep") {
                Embedding::new(vec![1.0, 0.0])
            } else {
                Embedding::new(vec![0.0, 1.0])
            })
        }

        async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Embedding>, DomainError> {
            let mut out = Vec::new();
            for text in texts {
                out.push(self.embed(text).await?);
            }
            Ok(out)
        }

        fn model(&self) -> &str {
            "axis"
        }

        fn dimension(&self) -> usize {
            2
        }
    }

    #[derive(Default)]
    struct CapturingLlm {
        prompts: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LlmService for CapturingLlm {
        async fn complete(&self, prompt: &str) -> Result<String, DomainError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok("Hello! How can I help you today?".to_string())
        }
    }

    fn knowledge_base() -> VectorIndex {
        let mut index = VectorIndex::new("axis", 2);
        let doc = Uuid::new_v4();
        let passages = [
            ("Adults need seven to nine hours of sleep.", [1.0, 0.0]),
            ("A regular bedtime improves sleep quality.", [0.9, 0.1]),
            ("Screens before bed delay sleep onset.", [0.8, 0.2]),
            ("Drink water throughout the day.", [0.0, 1.0]),
        ];
        for (i, (text, vector)) in passages.into_iter().enumerate() {
            index
                .push(DocumentChunk::new(doc, text, i), Embedding::new(vector.to_vec()))
                .unwrap();
        }
        index
    }

    fn assistant(
        index: Option<VectorIndex>,
        fail_embedding: bool,
    ) -> (RetrievalAssistant, Arc<CapturingLlm>) {
        let llm = Arc::new(CapturingLlm::default());
        let assistant = RetrievalAssistant::new(
            Arc::new(StaticIndex(index)),
            Arc::new(AxisEmbedding {
                fail: fail_embedding,
            }),
            llm.clone(),
            PromptTemplate::new("Context: {context}\nQuestion: {question}", &["context", "question"]),
        );
        (assistant, llm)
    }

    #[tokio::test]
    async fn test_hello_yields_single_assistant_message() {
        let (assistant, _) = assistant(Some(knowledge_base()), false);

        let reply = assistant.respond("hello", &[]).await;

        assert_eq!(reply.len(), 1);
        assert_eq!(reply[0].role, MessageRole::Assistant);
        assert!(!reply[0].content.is_empty());
    }

    #[tokio::test]
    async fn test_history_is_ignored() {
        let (assistant, llm) = assistant(Some(knowledge_base()), false);
        let history = vec![
            Message::user("my name is Sam and I have a headache"),
            Message::assistant("I'm sorry to hear that, Sam."),
        ];

        assistant.respond("hello", &history).await;
        assistant.respond("hello", &[]).await;

        let prompts = llm.prompts.lock().unwrap();
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0], prompts[1]);
        assert!(!prompts[0].contains("Sam"));
        assert!(!prompts[0].contains("headache"));
    }

    #[tokio::test]
    async fn test_prompt_contains_top_three_passages() {
        let (assistant, llm) = assistant(Some(knowledge_base()), false);

        assistant.answer("how much sleep do I need?").await.unwrap();

        let prompts = llm.prompts.lock().unwrap();
        let prompt = &prompts[0];
        assert!(prompt.starts_with(
            "Context: Adults need seven to nine hours of sleep.\n\n\
             A regular bedtime improves sleep quality.\n\n\
             Screens before bed delay sleep onset.\n"
        ));
        assert!(!prompt.contains("Drink water"));
        assert!(prompt.ends_with("Question: how much sleep do I need?"));
    }

    #[tokio::test]
    async fn test_missing_index_becomes_error_message() {
        let (assistant, llm) = assistant(None, false);

        let reply = assistant.respond("hello", &[]).await;

        assert_eq!(reply.len(), 1);
        assert_eq!(reply[0].role, MessageRole::Assistant);
        assert!(reply[0].content.starts_with("Error: "));
        assert!(llm.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_embedding_failure_becomes_error_message() {
        let (assistant, _) = assistant(Some(knowledge_base()), true);

        let reply = assistant.respond("hello", &[]).await;

        assert_eq!(reply.len(), 1);
        assert!(reply[0].content.contains("Error"));
        assert!(reply[0].content.contains("embedding model failed to load"));
    }

    #[tokio::test]
    async fn test_empty_message_is_well_defined() {
        let (assistant, llm) = assistant(Some(knowledge_base()), false);

        let reply = assistant.respond("", &[]).await;

        assert_eq!(reply.len(), 1);
        assert!(llm.prompts.lock().unwrap()[0].ends_with("Question: "));
    }

    #[tokio::test]
    async fn test_query_dimension_mismatch_becomes_error_message() {
        let mut index = VectorIndex::new("axis", 3);
        let doc = Uuid::new_v4();
        for (i, text) in ["a", "b", "c", "d"].into_iter().enumerate() {
            index
                .push(DocumentChunk::new(doc, text, i), Embedding::new(vec![1.0, 0.0, 0.0]))
                .unwrap();
        }
        let (assistant, llm) = assistant(Some(index), false);

        let reply = assistant.respond("q", &[]).await;

        assert_eq!(reply.len(), 1);
        assert!(reply[0].content.starts_with("Error: "));
        assert!(reply[0].content.contains("dimension"));
        assert!(llm.prompts.lock().unwrap().is_empty());
    }
}
