//! Cross-crate integration tests for badgekit. See `tests/`.
