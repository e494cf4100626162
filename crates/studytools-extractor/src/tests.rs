//! End-to-end tests for the Generator

#[cfg(test)]
mod tests {
    use crate::{
        extract, Generator, GeneratorConfig, ExtractorError, OutputContract, RecoveryState,
        FLASHCARD_METADATA_SCHEMA, PAPER_SCHEMA,
    };
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::time::Duration;
    use studytools_domain::traits::LlmProvider;
    use studytools_domain::{GenerationRequest, PaperDifficulty};
    use studytools_llm::{LlmError, MockProvider};
    use tokio_test::{assert_err, assert_ok};

    const DECK_JSON: &str = r#"{
        "metadata": {"source": "Paper 1", "subject": "Economics", "level": "A-level", "topics": ["Elasticity"]},
        "flashcards": [
            {"id": "1", "question": "Define price elasticity of demand.", "answer": "Responsiveness of quantity demanded to a change in price.", "difficulty": "easy"},
            {"id": "2", "question": "What does PED > 1 mean?", "answer": "Demand is price elastic.", "topic": "Elasticity"}
        ]
    }"#;

    /// Provider that outlives any sensible timeout and flags when it is done
    #[derive(Default)]
    struct SlowProvider {
        finished: Arc<AtomicBool>,
    }

    impl LlmProvider for SlowProvider {
        type Error = LlmError;

        fn generate(&self, _prompt: &str) -> Result<String, Self::Error> {
            std::thread::sleep(Duration::from_secs(3));
            self.finished.store(true, Ordering::SeqCst);
            Ok(String::new())
        }

        fn generate_structured(&self, prompt: &str, _schema: &str) -> Result<String, Self::Error> {
            self.generate(prompt)
        }

        fn model_name(&self) -> &str {
            "slow"
        }
    }

    #[tokio::test]
    async fn test_full_generation_flow() {
        let llm = MockProvider::new(DECK_JSON).with_model_name("mock-sonnet");
        let generator = Generator::new(llm.clone(), GeneratorConfig::default()).unwrap();

        let request = GenerationRequest::new("Q1. Define   PED.\n\n(2 marks)", 2)
            .with_subject("Economics");
        let deck = assert_ok!(generator.generate_flashcards(request).await);

        assert_eq!(deck.records.len(), 2);
        assert_eq!(deck.recovered_by, RecoveryState::WholeJson);
        assert_eq!(deck.model_name, "mock-sonnet");
        assert_eq!(deck.records[1].topic.as_deref(), Some("Elasticity"));

        let metadata = deck.metadata.unwrap();
        assert_eq!(metadata.subject.as_deref(), Some("Economics"));
        assert_eq!(metadata.topics, vec!["Elasticity"]);

        // One structured call with normalized source text
        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].schema.as_deref(), Some(FLASHCARD_METADATA_SCHEMA));
        assert!(calls[0].prompt.contains("Q1. Define PED. (2 marks)"));
        assert!(calls[0].prompt.contains("create 2 high-quality flashcards"));
        assert!(calls[0].prompt.contains("Economics"));
    }

    #[tokio::test]
    async fn test_delimited_contract_uses_plain_generate() {
        let llm = MockProvider::new("QUESTION: What is GDP?\nANSWER: Total output of an economy.");
        let config = GeneratorConfig {
            contract: OutputContract::Delimited,
            ..Default::default()
        };
        let generator = Generator::new(llm.clone(), config).unwrap();

        let deck = assert_ok!(
            generator
                .generate_flashcards(GenerationRequest::new("National income notes", 1))
                .await
        );
        assert_eq!(deck.recovered_by, RecoveryState::DelimitedText);
        assert_eq!(deck.records[0].id, "1");
        assert_eq!(deck.records[0].question, "What is GDP?");

        let calls = llm.calls();
        assert_eq!(calls.len(), 1);
        assert!(calls[0].schema.is_none());
        assert!(calls[0].prompt.contains("QUESTION:"));
    }

    #[tokio::test]
    async fn test_chatty_response_recovered() {
        let response = "Of course! Here you go:\n```json\n{\"flashcards\": [\n  {\"question\": \"Q1\", \"answer\": \"first\nsecond\"},\n  {\"question\": \"Q2\", \"answer\": \"A2\"},\n]}\n```\nGood luck!";
        let generator =
            Generator::new(MockProvider::new(response), GeneratorConfig::default()).unwrap();

        let deck = assert_ok!(
            generator
                .generate_flashcards(GenerationRequest::new("notes", 2))
                .await
        );
        assert_eq!(deck.recovered_by, RecoveryState::Sanitized);
        assert_eq!(deck.records.len(), 2);
        assert_eq!(deck.records[0].answer, "first second");
        assert_eq!(deck.records[1].id, "2");
    }

    #[tokio::test]
    async fn test_refusal_is_extraction_failure() {
        let generator = Generator::new(
            MockProvider::new("I'm unable to produce flashcards for this content."),
            GeneratorConfig::default(),
        )
        .unwrap();

        let err = assert_err!(
            generator
                .generate_flashcards(GenerationRequest::new("notes", 3))
                .await
        );
        match err {
            ExtractorError::ExtractionFailure { attempted, excerpt } => {
                assert_eq!(attempted.last(), Some(&RecoveryState::DelimitedText));
                assert!(excerpt.starts_with("I'm unable"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let llm = MockProvider::default();
        llm.push_error("upstream unavailable");
        let generator = Generator::new(llm, GeneratorConfig::default()).unwrap();

        let err = assert_err!(
            generator
                .generate_flashcards(GenerationRequest::new("notes", 3))
                .await
        );
        assert!(matches!(err, ExtractorError::Llm(m) if m.contains("upstream unavailable")));
    }

    #[tokio::test]
    async fn test_generation_timeout() {
        let config = GeneratorConfig {
            generation_timeout_secs: 1,
            ..Default::default()
        };
        let generator = Generator::new(SlowProvider::default(), config).unwrap();

        let err = assert_err!(
            generator
                .generate_flashcards(GenerationRequest::new("notes", 3))
                .await
        );
        assert!(matches!(err, ExtractorError::Timeout));
    }

    #[tokio::test]
    async fn test_timed_out_call_keeps_running() {
        let provider = SlowProvider::default();
        let finished = Arc::clone(&provider.finished);
        let config = GeneratorConfig {
            generation_timeout_secs: 1,
            ..Default::default()
        };
        let generator = Generator::new(provider, config).unwrap();

        let err = assert_err!(
            generator
                .generate_flashcards(GenerationRequest::new("notes", 3))
                .await
        );
        assert!(matches!(err, ExtractorError::Timeout));
        assert!(!finished.load(Ordering::SeqCst));

        // Not cancelled: the blocking call still completes on its own
        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(finished.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_source_text_truncated_to_config() {
        let llm = MockProvider::new(DECK_JSON);
        let config = GeneratorConfig {
            max_source_chars: 10,
            ..Default::default()
        };
        let generator = Generator::new(llm.clone(), config).unwrap();

        let text = format!("{}UNSEEN", "x".repeat(10));
        assert_ok!(
            generator
                .generate_flashcards(GenerationRequest::new(text, 2))
                .await
        );
        let prompt = &llm.calls()[0].prompt;
        assert!(prompt.contains("xxxxxxxxxx"));
        assert!(!prompt.contains("UNSEEN"));
    }

    #[tokio::test]
    async fn test_regenerate_paper() {
        let response = r#"{"title": "Mock Paper", "questions": [
            {"question": "Explain one cause of inflation.", "marks": 4},
            {"question": "Evaluate the use of interest rates to control inflation.", "marks": 12}
        ]}"#;
        let llm = MockProvider::new(response);
        let generator = Generator::new(llm.clone(), GeneratorConfig::default()).unwrap();

        let generated = assert_ok!(
            generator
                .regenerate_paper("1. Explain inflation (4)\n2. Discuss (12)", PaperDifficulty::Harder)
                .await
        );
        assert_eq!(generated.difficulty, PaperDifficulty::Harder);
        assert_eq!(generated.paper.title.as_deref(), Some("Mock Paper"));
        assert_eq!(generated.paper.questions.len(), 2);
        assert_eq!(generated.paper.total_marks(), 16);

        let calls = llm.calls();
        assert_eq!(calls[0].schema.as_deref(), Some(PAPER_SCHEMA));
        assert!(calls[0].prompt.contains("harder"));
    }

    #[tokio::test]
    async fn test_regenerate_paper_rejects_empty_text() {
        let llm = MockProvider::default();
        let generator = Generator::new(llm.clone(), GeneratorConfig::default()).unwrap();

        let err = assert_err!(generator.regenerate_paper("  ", PaperDifficulty::Same).await);
        assert!(matches!(err, ExtractorError::InvalidArgument(_)));
        assert_eq!(llm.call_count(), 0);
    }

    #[test]
    fn test_extract_is_deterministic() {
        let first = extract(DECK_JSON).unwrap();
        let second = extract(DECK_JSON).unwrap();
        assert_eq!(first, second);
    }
}
