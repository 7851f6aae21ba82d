//! Tests for template engine
//!
//! Organized into focused submodules per engine stage.

use super::*;

// Test helper functions
mod helpers;

// TokenStream tests
mod tokenstream;


// Rendering tests
mod render_basic;

// Error and edge case tests
mod errors;
