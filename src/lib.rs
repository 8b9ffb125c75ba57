//! Tokens Table Patcher: accessibility patches for the tokens table component
//!
//! Rewrites `web/default/src/components/TokensTable.js` with an ordered list
//! of exact literal substitutions. The built-in rules add `aria-label`
//! attributes and fallback label text to each row action, and move token
//! deletion behind a click-to-open confirmation popup.
//!
//! # Architecture
//!
//! Every change is a [`Rule`]: an exact `(old, new)` pair. A [`Patcher`]
//! reads the [`Artifact`] once, applies its [`RuleSet`] in order (each rule
//! sees the output of the previous one), and writes the buffer back once.
//!
//! # Safety
//!
//! - Rules that do not match never abort a run, but every rule is reported
//!   in the [`PatchReport`] as applied, already applied, or skipped
//! - Skipped rules carry a drift hint pointing at the nearest line
//! - Atomic file writes (tempfile + fsync + rename)
//! - Writes are refused if the file changed since it was read
//! - Workspace boundary enforcement
//! - Idempotent: a second run changes nothing
//!
//! # Example
//!
//! ```no_run
//! use tokens_table_patcher::{Patcher, PatchStatus};
//!
//! let report = Patcher::tokens_table()
//!     .run("web/default/src/components/TokensTable.js")?;
//!
//! if report.status() != PatchStatus::Complete {
//!     eprintln!("{report}");
//! }
//! # Ok::<(), tokens_table_patcher::PatchError>(())
//! ```

pub mod artifact;
pub mod config;
pub mod diff;
pub mod drift;
pub mod patcher;
pub mod report;
pub mod rule;
pub mod safety;
pub mod tokens_table;

// Re-exports
pub use artifact::{Artifact, LineEnding, PatchError};
pub use config::{load_from_path, load_from_str, ConfigError, ValidationError};
pub use drift::DriftHint;
pub use patcher::{run, PatchOutcome, Patcher};
pub use report::{PatchReport, PatchStatus, RuleReport};
pub use rule::{Rule, RuleOutcome, RuleSet};
pub use safety::{SafetyError, WorkspaceGuard};
