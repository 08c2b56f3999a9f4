//! Dependency resolution and build-context assembly for monoprune.
//!
//! # Pipeline
//!
//! ```text
//! monoprune --scope <service>
//!   1. Layout       ── nx.json workspaceLayout → services/ + libs/
//!   2. Check        ── <services>/<service> must exist
//!   3. Output       ── out/ cleared (or reused with a warning)
//!   4. Manifest     ── <services>/<service>/project.json
//!   5. Dependencies ── implicitDependencies + sentinel (nx-python)
//!   6. Copy         ── each library, then the service, into out/
//!   7. Workspace    ── package.json, pnpm-lock.yaml, nx.json, tsconfig.base.json
//! ```
//!
//! # Output layout
//!
//! - **flat** (default): `out/libs/..`, `out/services/..`, manifest files in `out/`
//! - **split**: code under `out/full/`, manifest files under `out/nx/`
//!
//! Directories named `node_modules`, `out`, `dist`, `venv` or `.venv` are
//! never copied.

pub mod assemble;
pub mod deps;
pub mod materialize;

pub use assemble::{AssembleOptions, ContextAssembler, ContextError, ContextReport};
pub use materialize::{CopyStats, CopyUnit, ExcludeSet, MaterializeError, copy_tree};
