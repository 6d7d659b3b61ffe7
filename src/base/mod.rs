//! Core components, types, and utilities for the support bot.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - Prompt templates and fixed reply texts for LLM interactions.
//! - Common types and result handling.

pub mod config;
pub mod prompts;
pub mod types;
