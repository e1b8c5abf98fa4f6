// 🎲 Draw Controller - single-winner draws from a static or shrinking pool
//
// Phases: Idle -> Drawing -> Idle. Drawing only exists for hosts that show a
// spin animation; the selection itself is always one uniform pick.

use crate::error::DrawError;
use crate::participant::Participant;
use crate::random::IndexSource;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

/// Number of cosmetic spin frames before the result is revealed
pub const SPIN_TICKS: u32 = 20;

/// Delay between spin frames
pub const SPIN_INTERVAL: Duration = Duration::from_millis(80);

// ============================================================================
// DRAW PHASE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrawPhase {
    #[default]
    Idle,
    Drawing,
}

// ============================================================================
// DRAW CONTROLLER
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct DrawController {
    participants: Vec<Participant>,

    /// Most recent winner first
    winners: Vec<Participant>,

    allow_repeats: bool,
    phase: DrawPhase,
}

impl DrawController {
    pub fn new(participants: Vec<Participant>) -> Self {
        DrawController {
            participants,
            ..Default::default()
        }
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn winners(&self) -> &[Participant] {
        &self.winners
    }

    pub fn allow_repeats(&self) -> bool {
        self.allow_repeats
    }

    pub fn phase(&self) -> DrawPhase {
        self.phase
    }

    /// Participants eligible for the next draw.
    ///
    /// With repeats allowed this is the full list; otherwise it is
    /// `participants - winners` keyed by id, in participant order.
    pub fn remaining_pool(&self) -> Vec<&Participant> {
        if self.allow_repeats {
            return self.participants.iter().collect();
        }

        let won: HashSet<Uuid> = self.winners.iter().map(|w| w.id).collect();
        self.participants
            .iter()
            .filter(|p| !won.contains(&p.id))
            .collect()
    }

    pub fn pool_size(&self) -> usize {
        self.remaining_pool().len()
    }

    pub fn is_exhausted(&self) -> bool {
        self.pool_size() == 0
    }

    /// Whether the draw action should be enabled
    pub fn can_draw(&self) -> bool {
        self.phase == DrawPhase::Idle && !self.is_exhausted()
    }

    /// Pick one winner in a single synchronous step
    pub fn draw<R>(&mut self, rng: &mut R) -> Result<&Participant, DrawError>
    where
        R: IndexSource + ?Sized,
    {
        self.begin_draw()?;
        self.finish_draw(rng)
    }

    /// Enter the Drawing phase (animated hosts call this, spin, then finish)
    pub fn begin_draw(&mut self) -> Result<(), DrawError> {
        if self.phase == DrawPhase::Drawing {
            return Err(DrawError::InProgress);
        }
        if self.is_exhausted() {
            debug!("draw rejected: pool empty");
            return Err(DrawError::PoolEmpty);
        }
        self.phase = DrawPhase::Drawing;
        Ok(())
    }

    /// Select the winner and return to Idle
    pub fn finish_draw<R>(&mut self, rng: &mut R) -> Result<&Participant, DrawError>
    where
        R: IndexSource + ?Sized,
    {
        self.phase = DrawPhase::Idle;

        let winner = {
            let pool = self.remaining_pool();
            if pool.is_empty() {
                return Err(DrawError::PoolEmpty);
            }
            pool[rng.index_below(pool.len())].clone()
        };

        info!(
            winner = %winner.name,
            draw_number = self.winners.len() + 1,
            "drew winner"
        );
        self.winners.insert(0, winner);
        Ok(&self.winners[0])
    }

    /// Clear winners and restore the full pool
    pub fn reset(&mut self) {
        self.winners.clear();
        self.phase = DrawPhase::Idle;
    }

    pub fn set_allow_repeats(&mut self, allow: bool) {
        self.allow_repeats = allow;
    }

    /// Replace the source list; previous winners no longer apply
    pub fn set_participants(&mut self, participants: Vec<Participant>) {
        self.participants = participants;
        self.reset();
    }
}

// ============================================================================
// SPIN (cosmetic)
// ============================================================================

/// Bounded sequence of random display frames shown before a result.
///
/// Frames are picked independently of the final selection, which is made
/// by `DrawController::finish_draw` after the last tick.
#[derive(Debug, Clone)]
pub struct Spin {
    ticks_left: u32,
    current: Option<String>,
}

impl Spin {
    pub fn new(ticks: u32) -> Self {
        Spin {
            ticks_left: ticks,
            current: None,
        }
    }

    /// Advance one frame and return the name to show
    pub fn tick<R>(&mut self, pool: &[&Participant], rng: &mut R) -> Option<&str>
    where
        R: IndexSource + ?Sized,
    {
        if self.ticks_left == 0 {
            return self.current.as_deref();
        }
        // An empty pool still uses up the frame so the spin always ends
        self.ticks_left -= 1;
        if !pool.is_empty() {
            self.current = Some(pool[rng.index_below(pool.len())].name.clone());
        }
        self.current.as_deref()
    }

    pub fn is_finished(&self) -> bool {
        self.ticks_left == 0
    }

    pub fn current(&self) -> Option<&str> {
        self.current.as_deref()
    }
}

impl Default for Spin {
    fn default() -> Self {
        Spin::new(SPIN_TICKS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_names;
    use crate::random::{RngSource, ScriptedSource};

    fn controller(names: &str) -> DrawController {
        DrawController::new(parse_names(names))
    }

    #[test]
    fn test_draw_without_repeats_exhausts_pool() {
        let mut draw = controller("A,B,C,D,E");
        let mut rng = RngSource::seeded(11);

        for expected_left in (0..5).rev() {
            draw.draw(&mut rng).unwrap();
            assert_eq!(draw.pool_size(), expected_left);
        }

        assert!(draw.is_exhausted());
        assert_eq!(draw.draw(&mut rng).unwrap_err(), DrawError::PoolEmpty);
        assert_eq!(draw.winners().len(), 5);
    }

    #[test]
    fn test_no_repeat_winners_are_distinct() {
        let mut draw = controller("A,B,C,D,E,F");
        let mut rng = RngSource::seeded(5);

        while draw.can_draw() {
            draw.draw(&mut rng).unwrap();
        }

        let ids: HashSet<Uuid> = draw.winners().iter().map(|w| w.id).collect();
        assert_eq!(ids.len(), 6);
    }

    #[test]
    fn test_repeats_never_shrink_pool() {
        let mut draw = controller("A,B,C");
        draw.set_allow_repeats(true);
        let mut rng = RngSource::seeded(3);

        for _ in 0..50 {
            draw.draw(&mut rng).unwrap();
            assert_eq!(draw.pool_size(), 3);
        }
        assert_eq!(draw.winners().len(), 50);
    }

    #[test]
    fn test_duplicate_names_are_separate_entries() {
        // Two "Alice" entries have distinct ids, so both can win
        let mut draw = controller("Alice,Alice");
        let mut rng = ScriptedSource::always_first();

        assert_eq!(draw.draw(&mut rng).unwrap().name, "Alice");
        assert_eq!(draw.draw(&mut rng).unwrap().name, "Alice");
        assert!(draw.is_exhausted());
    }

    #[test]
    fn test_winners_most_recent_first() {
        let mut draw = controller("A,B,C");
        let mut rng = ScriptedSource::always_first();

        draw.draw(&mut rng).unwrap(); // A
        draw.draw(&mut rng).unwrap(); // B

        let names: Vec<_> = draw.winners().iter().map(|w| w.name.as_str()).collect();
        assert_eq!(names, vec!["B", "A"]);
    }

    #[test]
    fn test_draw_on_empty_list_rejected() {
        let mut draw = DrawController::default();
        let mut rng = RngSource::seeded(1);

        assert!(!draw.can_draw());
        assert_eq!(draw.draw(&mut rng).unwrap_err(), DrawError::PoolEmpty);
        assert_eq!(draw.phase(), DrawPhase::Idle);
    }

    #[test]
    fn test_reset_restores_full_pool() {
        let mut draw = controller("A,B");
        let mut rng = RngSource::seeded(1);
        draw.draw(&mut rng).unwrap();
        draw.draw(&mut rng).unwrap();
        assert!(draw.is_exhausted());

        draw.reset();

        assert!(draw.winners().is_empty());
        assert_eq!(draw.pool_size(), 2);
    }

    #[test]
    fn test_disabling_repeats_excludes_past_winners() {
        let mut draw = controller("A,B,C");
        draw.set_allow_repeats(true);
        let mut rng = ScriptedSource::always_first();
        draw.draw(&mut rng).unwrap();
        draw.draw(&mut rng).unwrap();

        draw.set_allow_repeats(false);

        let pool: Vec<_> = draw.remaining_pool().iter().map(|p| p.name.clone()).collect();
        assert_eq!(pool, vec!["B", "C"]);
    }

    #[test]
    fn test_begin_twice_is_in_progress() {
        let mut draw = controller("A,B");
        draw.begin_draw().unwrap();

        assert_eq!(draw.begin_draw().unwrap_err(), DrawError::InProgress);
        assert!(!draw.can_draw());

        let mut rng = RngSource::seeded(9);
        draw.finish_draw(&mut rng).unwrap();
        assert_eq!(draw.phase(), DrawPhase::Idle);
        assert!(draw.can_draw());
    }

    #[test]
    fn test_set_participants_resets_winners() {
        let mut draw = controller("A,B");
        let mut rng = RngSource::seeded(1);
        draw.draw(&mut rng).unwrap();

        draw.set_participants(parse_names("X,Y,Z"));

        assert!(draw.winners().is_empty());
        assert_eq!(draw.pool_size(), 3);
    }

    #[test]
    fn test_draw_is_roughly_uniform() {
        let participants = parse_names("A,B,C,D");
        let mut rng = RngSource::seeded(2024);
        let mut counts = [0usize; 4];

        for _ in 0..4000 {
            let mut draw = DrawController::new(participants.clone());
            let winner = draw.draw(&mut rng).unwrap().id;
            let idx = participants.iter().position(|p| p.id == winner).unwrap();
            counts[idx] += 1;
        }

        for count in counts {
            assert!((800..1200).contains(&count), "skewed counts: {:?}", counts);
        }
    }

    #[test]
    fn test_spin_runs_fixed_ticks() {
        let participants = parse_names("A,B,C");
        let pool: Vec<&Participant> = participants.iter().collect();
        let mut spin = Spin::new(3);
        let mut rng = RngSource::seeded(4);

        for _ in 0..3 {
            assert!(!spin.is_finished());
            assert!(spin.tick(&pool, &mut rng).is_some());
        }
        assert!(spin.is_finished());

        // Extra ticks keep the last frame
        let last = spin.current().map(str::to_string);
        assert_eq!(spin.tick(&pool, &mut rng).map(str::to_string), last);
    }

    #[test]
    fn test_spin_with_empty_pool_still_finishes() {
        let mut spin = Spin::new(2);
        let mut rng = ScriptedSource::always_first();

        assert!(spin.tick(&[], &mut rng).is_none());
        assert!(spin.tick(&[], &mut rng).is_none());
        assert!(spin.is_finished());
    }

    #[test]
    fn test_default_spin_length() {
        let spin = Spin::default();
        assert!(!spin.is_finished());
        assert_eq!(spin.ticks_left, SPIN_TICKS);
    }
}
