// TeamSync - Core Library
// Exposes the draw/grouping core for the CLI, the TUI, and tests

pub mod error;
pub mod participant;
pub mod parser;
pub mod random;
pub mod shuffle;
pub mod draw;
pub mod group;
pub mod roster;
pub mod export;
pub mod session;
pub mod cli;
pub mod logging;

// Re-export commonly used types
pub use error::{DrawError, ExportError, GroupError, ImportError};
pub use participant::Participant;
pub use parser::{parse_names, load_names_from_file, decode_text, FileKind};
pub use random::{IndexSource, RngSource, ScriptedSource, source_for};
pub use shuffle::shuffle;
pub use draw::{DrawController, DrawPhase, Spin, SPIN_INTERVAL, SPIN_TICKS};
pub use group::{partition, GroupSize, Grouping, DEFAULT_GROUP_SIZE};
pub use roster::{
    find_duplicate_names, remove_duplicate_names, duplicate_summary, sample_roster,
};
pub use export::{
    groups_to_csv, export_payload, export_file_name, write_export, UTF8_BOM,
};
pub use session::{ImportOutcome, ImportTicket, Mode, Session};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
