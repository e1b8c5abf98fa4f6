// Session - explicit application state for the presentation layer
//
// The TUI (or any other host) keeps one Session, mutates it through these
// methods on each event and re-renders from it. Nothing here is global.

use crate::draw::{DrawController, Spin};
use crate::error::{DrawError, ExportError, GroupError, ImportError};
use crate::export::write_export;
use crate::group::{GroupSize, Grouping};
use crate::parser::{load_names_from_file, parse_names};
use crate::participant::{names, Participant};
use crate::random::IndexSource;
use crate::roster::{find_duplicate_names, remove_duplicate_names, sample_roster};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Shown in the draw panel before anything has been drawn
pub const DRAW_PLACEHOLDER: &str = "?";

// ============================================================================
// MODE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Input,
    Draw,
    Group,
}

impl Mode {
    pub fn next(&self) -> Self {
        match self {
            Mode::Input => Mode::Draw,
            Mode::Draw => Mode::Group,
            Mode::Group => Mode::Input,
        }
    }

    pub fn previous(&self) -> Self {
        match self {
            Mode::Input => Mode::Group,
            Mode::Draw => Mode::Input,
            Mode::Group => Mode::Draw,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Mode::Input => "Participants",
            Mode::Draw => "Lucky Draw",
            Mode::Group => "Groups",
        }
    }

    /// Draw and Group only make sense once there is a list
    pub fn requires_participants(&self) -> bool {
        !matches!(self, Mode::Input)
    }
}

// ============================================================================
// IMPORT TICKETS
// ============================================================================

/// Identifies one file read; only the most recent ticket is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImportTicket(u64);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    /// List replaced with this many participants
    Applied(usize),

    /// A newer import started before this one finished; result dropped
    Superseded,

    /// Import failed; the message is also stored as the session error
    Failed(String),
}

// ============================================================================
// SESSION
// ============================================================================

#[derive(Debug, Clone)]
pub struct Session {
    mode: Mode,
    input_text: String,
    participants: Vec<Participant>,
    draw: DrawController,
    spin: Option<Spin>,
    draw_display: String,
    grouping: Option<Grouping>,
    group_size: GroupSize,
    error: Option<String>,
    status: Option<String>,
    import_generation: u64,
}

impl Default for Session {
    fn default() -> Self {
        Session {
            mode: Mode::Input,
            input_text: String::new(),
            participants: Vec::new(),
            draw: DrawController::default(),
            spin: None,
            draw_display: DRAW_PLACEHOLDER.to_string(),
            grouping: None,
            group_size: GroupSize::default(),
            error: None,
            status: None,
            import_generation: 0,
        }
    }
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------------

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn input_text(&self) -> &str {
        &self.input_text
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn has_participants(&self) -> bool {
        !self.participants.is_empty()
    }

    pub fn draw_controller(&self) -> &DrawController {
        &self.draw
    }

    pub fn is_spinning(&self) -> bool {
        self.spin.is_some()
    }

    /// Name currently shown in the draw panel
    pub fn draw_display(&self) -> &str {
        &self.draw_display
    }

    pub fn grouping(&self) -> Option<&Grouping> {
        self.grouping.as_ref()
    }

    pub fn group_size(&self) -> GroupSize {
        self.group_size
    }

    /// Inline import error, if the last import failed
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn duplicates(&self) -> Vec<String> {
        find_duplicate_names(&self.participants)
    }

    // ------------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------------

    /// Switch mode; refused (returns false) for Draw/Group with an empty list
    pub fn set_mode(&mut self, mode: Mode) -> bool {
        if mode.requires_participants() && !self.has_participants() {
            debug!(?mode, "mode change refused: no participants");
            return false;
        }
        if mode != self.mode {
            // Status lines belong to the page that produced them
            self.status = None;
        }
        self.mode = mode;
        true
    }

    pub fn next_mode(&mut self) {
        let target = self.mode.next();
        if !self.set_mode(target) {
            self.mode = Mode::Input;
        }
    }

    pub fn previous_mode(&mut self) {
        let target = self.mode.previous();
        if !self.set_mode(target) {
            self.mode = Mode::Input;
        }
    }

    // ------------------------------------------------------------------------
    // List input
    // ------------------------------------------------------------------------

    /// Replace the text box content and reparse it
    pub fn set_input_text(&mut self, text: impl Into<String>) {
        self.input_text = text.into();
        let parsed = parse_names(&self.input_text);
        self.replace_participants(parsed);
        self.error = None;
    }

    /// Start a file read; any earlier unfinished read becomes stale
    pub fn begin_import(&mut self) -> ImportTicket {
        self.import_generation += 1;
        ImportTicket(self.import_generation)
    }

    /// Apply a finished read if it is still the latest one
    pub fn complete_import(
        &mut self,
        ticket: ImportTicket,
        result: Result<Vec<Participant>, ImportError>,
    ) -> ImportOutcome {
        if ticket.0 != self.import_generation {
            debug!(ticket = ticket.0, latest = self.import_generation, "dropping superseded import");
            return ImportOutcome::Superseded;
        }

        match result {
            Ok(participants) => {
                let count = participants.len();
                self.input_text = joined_names(&participants);
                self.replace_participants(participants);
                self.error = None;
                self.status = Some(format!("Imported {} participants", count));
                ImportOutcome::Applied(count)
            }
            Err(e) => {
                warn!(error = %e, "import failed");
                let message = e.user_message();
                self.error = Some(message.clone());
                ImportOutcome::Failed(message)
            }
        }
    }

    /// Read a .csv/.txt file and replace the list with its names
    pub fn import_file(&mut self, path: &Path) -> ImportOutcome {
        let ticket = self.begin_import();
        let result = load_names_from_file(path);
        self.complete_import(ticket, result)
    }

    pub fn clear(&mut self) {
        self.input_text.clear();
        self.replace_participants(Vec::new());
        self.error = None;
        self.status = None;
        self.mode = Mode::Input;
    }

    pub fn load_sample(&mut self) {
        self.set_input_text(sample_roster());
    }

    /// Keep the first participant per name and rewrite the text box to match
    pub fn remove_duplicates(&mut self) {
        let unique = remove_duplicate_names(&self.participants);
        let removed = self.participants.len() - unique.len();

        self.input_text = joined_names(&unique);
        self.replace_participants(unique);
        info!(removed, "removed duplicate names");
        self.status = Some(format!("Removed {} duplicate entries", removed));
    }

    fn replace_participants(&mut self, participants: Vec<Participant>) {
        self.participants = participants;
        self.draw.set_participants(self.participants.clone());
        self.spin = None;
        self.draw_display = DRAW_PLACEHOLDER.to_string();
        self.grouping = None;
    }

    // ------------------------------------------------------------------------
    // Draw
    // ------------------------------------------------------------------------

    /// Begin an animated draw; call `advance_spin` on every frame tick
    pub fn start_draw(&mut self) -> Result<(), DrawError> {
        self.draw.begin_draw()?;
        self.spin = Some(Spin::default());
        self.status = None;
        Ok(())
    }

    /// Advance the spin by one frame. Returns the winner once the final frame
    /// has passed and the real selection has been made.
    pub fn advance_spin<R>(&mut self, rng: &mut R) -> Option<Participant>
    where
        R: IndexSource + ?Sized,
    {
        let spin = self.spin.as_mut()?;

        let pool = self.draw.remaining_pool();
        if let Some(frame) = spin.tick(&pool, rng) {
            self.draw_display = frame.to_string();
        }
        if !spin.is_finished() {
            return None;
        }

        self.spin = None;
        let result = self.draw.finish_draw(rng).map(Participant::clone);
        self.settle_draw(result).ok()
    }

    /// Draw immediately without the spin
    pub fn draw_now<R>(&mut self, rng: &mut R) -> Result<Participant, DrawError>
    where
        R: IndexSource + ?Sized,
    {
        let result = self.draw.draw(rng).map(Participant::clone);
        self.settle_draw(result)
    }

    fn settle_draw(
        &mut self,
        result: Result<Participant, DrawError>,
    ) -> Result<Participant, DrawError> {
        match &result {
            Ok(winner) => {
                self.draw_display = winner.name.clone();
                self.status = if self.draw.is_exhausted() {
                    Some("Everyone has won!".to_string())
                } else {
                    None
                };
            }
            Err(e) => self.status = Some(e.to_string()),
        }
        result
    }

    pub fn reset_draw(&mut self) {
        self.draw.reset();
        self.spin = None;
        self.draw_display = DRAW_PLACEHOLDER.to_string();
        self.status = None;
    }

    pub fn toggle_repeats(&mut self) {
        let allow = !self.draw.allow_repeats();
        self.draw.set_allow_repeats(allow);
        debug!(allow_repeats = allow, "repeat policy changed");
    }

    // ------------------------------------------------------------------------
    // Groups
    // ------------------------------------------------------------------------

    pub fn set_group_size(&mut self, size: GroupSize) {
        self.group_size = size;
    }

    /// Raw text from a size field, clamped to at least 1
    pub fn set_group_size_input(&mut self, raw: &str) {
        self.group_size = GroupSize::from_input(raw);
    }

    /// Reshuffle and regroup from scratch, discarding any previous grouping
    pub fn generate_groups<R>(&mut self, rng: &mut R) -> Result<&Grouping, GroupError>
    where
        R: IndexSource + ?Sized,
    {
        let grouping = Grouping::generate(&self.participants, self.group_size, rng)?;
        Ok(&*self.grouping.insert(grouping))
    }

    pub fn export_groups(&mut self, dir: &Path, date: NaiveDate) -> Result<PathBuf, ExportError> {
        let grouping = self.grouping.as_ref().ok_or(ExportError::NothingToExport)?;
        let path = write_export(dir, &grouping.groups, date)?;
        self.status = Some(format!("Exported to {}", path.display()));
        Ok(path)
    }
}

fn joined_names(participants: &[Participant]) -> String {
    names(participants).join("\n")
}
