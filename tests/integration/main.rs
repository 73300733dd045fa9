//! Integration tests across all layers
//!
//! End-to-end frame loops and cache consistency properties.
