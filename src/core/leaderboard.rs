use crate::core::run::Run;
use crate::core::store::RunStore;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Medal {
    #[strum(serialize = "🥇")]
    Gold,
    #[strum(serialize = "🥈")]
    Silver,
    #[strum(serialize = "🥉")]
    Bronze,
}

impl Medal {
    pub fn for_position(position: usize) -> Option<Medal> {
        match position {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }
}

// A displayed leaderboard row. `position` is only for display and may differ
// from the run's stored placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Standing {
    pub position: usize,
    pub medal: Option<Medal>,
    pub run: Run,
}

impl Standing {
    fn new(position: usize, run: Run) -> Self {
        Standing {
            position,
            medal: Medal::for_position(position),
            run,
        }
    }
}

/// Read-only projections of a game board.
pub struct LeaderboardView<'store> {
    store: &'store RunStore,
}

impl<'store> LeaderboardView<'store> {
    pub fn new(store: &'store RunStore) -> Self {
        LeaderboardView { store }
    }

    /// The board as stored, positions are the placements.
    pub fn full_leaderboard(&self, game: &str) -> Vec<Standing> {
        self.store
            .board(game)
            .unwrap_or_default()
            .iter()
            .map(|run| Standing::new(run.placement, run.clone()))
            .collect()
    }

    /// One row per contributor (their fastest run), numbered 1..=k.
    pub fn best_per_contributor_leaderboard(&self, game: &str) -> Vec<Standing> {
        self.store
            .best_per_contributor(game)
            .into_iter()
            .enumerate()
            .map(|(idx, run)| Standing::new(idx + 1, run))
            .collect()
    }
}
