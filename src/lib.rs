//! quizsolver - automated solver for chained natural-language quiz tasks.
//!
//! The crate exposes a small HTTP API (`api`) that forwards incoming quiz
//! URLs to the solve engine (`solver`), which fetches the task page, asks a
//! language model for an answer and a submission endpoint (`llm`), posts the
//! answer, and follows any chained task URL the grader hands back.

pub mod api;
pub mod config;
pub mod llm;
pub mod solver;
