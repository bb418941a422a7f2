//! # Storage Layer
//!
//! Snapshot persistence for the CLI harness. Tasks live in a single
//! JSONL file (one task per line) that the commands read fully into
//! memory before handing the engine a snapshot, and rewrite atomically
//! when asked to persist corrections.
//!
//! The engine itself never touches this layer; it operates on whatever
//! task slice it is given.

mod jsonl;

pub use jsonl::TaskStore;
