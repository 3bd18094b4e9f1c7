//! Shared test utilities for bl-registry unit tests.
