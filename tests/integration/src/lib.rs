//! End-to-end pipeline tests for the scrgen workspace live in `tests/`.
