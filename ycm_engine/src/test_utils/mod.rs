//! Helpers for integration tests: throwaway SQLite databases and a small seeded fleet.
pub mod prepare_env;
pub mod seed;
