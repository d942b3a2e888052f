// listshare/src/ingest/mod.rs

//! Turning free text into items through an external text generator.
//!
//! The generator's reply is untrusted: it is stripped of code fences, parsed
//! as a JSON array (the only hard gate) and then normalized element by
//! element with safe defaults.

pub mod generator;
pub mod parse;
pub mod pipeline;
pub mod prompts;

pub use generator::{GenerationReply, TextGenerator, UnconfiguredGenerator};
pub use parse::{
  normalize_batch, normalize_element, parse_category_reply, parse_generated_batch, strip_code_fences, GeneratedItem,
  DEFAULT_GENERATED_PRICE, MAX_GENERATED_ITEMS, MAX_PROMPT_CHARS,
};
pub use pipeline::{BulkGenerateCtx, IngestionConfig, IngestionPipeline};
