//! CLI command implementations for `toolbox`.
//!
//! - **`list`**: Display every registered tool
//! - **`describe`**: Show a tool's description and input/output schemas
//! - **`call`**: Invoke a tool directly with JSON input
//!
//! Each module exports an `*Args` struct implementing `clap::Args` and a `run`
//! function taking the registry built at startup.

pub mod call;
pub mod describe;
pub mod list;
