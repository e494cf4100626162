//! StudyTools Domain Layer
//!
//! Value types shared by every other crate in the workspace. The only external
//! dependency is `uuid`, used for artifact identifiers.
//!
//! ## Key Concepts
//!
//! - **SourceDocument**: text extracted from an uploaded past paper
//! - **GenerationRequest**: what the caller wants generated from that text
//! - **FlashcardRecord**: a validated question/answer pair
//! - **ExamPaper**: a regenerated exam paper, an ordered list of questions
//! - **LlmProvider**: the boundary to the external text-generation service
//!
//! Nothing in this crate performs I/O. Implementations of the provider trait
//! live in `studytools-llm`.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod artifact;
pub mod flashcard;
pub mod paper;
pub mod request;
pub mod source;
pub mod traits;

// Re-exports for convenience
pub use artifact::ArtifactId;
pub use flashcard::{CardDifficulty, DeckMetadata, FlashcardRecord};
pub use paper::{ExamPaper, ExamQuestion, PaperDifficulty};
pub use request::GenerationRequest;
pub use source::SourceDocument;
