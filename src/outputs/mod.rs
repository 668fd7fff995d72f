//! Output generation beyond the per-article text files.
//!
//! # Submodules
//!
//! - [`json`]: Writes the [`RunSummary`](crate::models::RunSummary) as JSON
//!
//! # Output Structure
//!
//! ```text
//! output_folder/
//! ├── 3f2b…-hello-world.txt   # one file per article
//! └── 9c41…-go-fast.txt
//!
//! summary.json                # only with --summary-json
//! ```

pub mod json;
