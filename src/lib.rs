// THEORY:
// This file is the main entry point for the `chroma_swap` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the
// public API that will be exposed to external consumers (an image converter
// binary, a camera/player integration, a web front end).
//
// The primary goal is to export the `StreamPipeline` and its associated data
// structures (`PipelineConfig`, `TickReport`, the frame processor and its
// progress counter) as the clean, high-level interface for the engine, while
// the internal building blocks live under `core_modules`.

pub mod core_modules;
pub mod error;
pub mod pipeline;
