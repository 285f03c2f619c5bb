//! Output generation for the assembled digest.
//!
//! # Submodules
//!
//! - [`markdown`]: renders the digest document and writes it to disk
//! - [`json`]: writes the same digest as JSON for API consumption
//!
//! # Output Structure
//!
//! ```text
//! digest_dir/
//! ├── 2025-05-06_morning.md
//! └── 2025-05-06_evening.md
//!
//! json_output_dir/
//! └── 2025-05-06/
//!     ├── morning.json
//!     └── evening.json
//! ```

pub mod json;
pub mod markdown;
