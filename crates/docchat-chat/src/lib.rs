//! Chat dispatching for docchat
//!
//! Chooses an upstream provider under a soft daily quota, builds the prompt
//! and fails over to the other provider once when the first call fails.

pub mod clock;
pub mod dispatcher;
pub mod document;
pub mod error;
pub mod prompt;
pub mod usage;

pub use clock::{Clock, ManualClock, SystemClock};
pub use dispatcher::{Attempt, AttemptResult, DispatchOutcome, Dispatcher, ProviderSlot, SlotRole};
pub use document::{ingest_pdf, ExtractedDocument, MIN_EXTRACTED_CHARS, PDF_MIME_TYPE};
pub use error::{ConfigError, DispatchError, IngestError, ProviderFailure};
pub use prompt::{ChatPrompt, PromptSettings, DEFAULT_PERSONA, NOT_IN_DOCUMENT};
pub use usage::{InMemoryUsageStore, UsageStore};
