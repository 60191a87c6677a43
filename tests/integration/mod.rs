//! Integration tests for the analysis pipeline
//!
//! These tests use wiremock to stand up both the crawled site and the
//! moderation backend, and drive `analyze_website` end-to-end.

mod pipeline_tests;
