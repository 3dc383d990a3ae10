//! LLM Client Layer - Gemini API integration with structured JSON output
//!
//! This module provides:
//! - Message types for LLM communication
//! - LlmClient trait for API abstraction
//! - GeminiClient implementation
//! - MockLlmClient for tests

pub mod client;
pub mod gemini;
pub mod types;

pub use client::{LlmClient, MockLlmClient};
pub use gemini::{GeminiClient, GeminiConfig};
pub use types::{CompletionRequest, CompletionResponse, Message, Role, StopReason, Usage};
