//! Jump from a gRPC client stub call to its server-side implementation.
//!
//! Binary crate entry point. All CLI logic is in the `cli` module.

// mimalloc as global allocator: index builds allocate many small strings.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

mod cli;
mod definitions;
mod error;

pub use error::NavError;

fn main() {
    cli::run();
}

// ─── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
#[path = "main_tests.rs"]
mod tests;
