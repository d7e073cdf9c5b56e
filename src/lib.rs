// Library surface for headless/integration tests and reuse.
// Terminal setup and CLI wiring stay in main.rs.
pub mod bracket;
pub mod exercise;
pub mod records;
pub mod runtime;
pub mod scoring;
pub mod session;
pub mod settings;
pub mod stats;
pub mod tournament;
pub mod ui;
pub mod util;
