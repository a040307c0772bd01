use crate::core::run::{Contributor, GameTitle, Run};
use crate::core::time::RunTime;
use crate::error::{BotError, BotResult};
use crate::storage::Persistence;
use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::ops::Deref;
use tracing::{error, info, warn};

/// Runs of a single game, sorted by time with dense placements 1..=n.
pub type GameBoard = Vec<Run>;

type Boards = IndexMap<GameTitle, GameBoard>;

/// Game title => ranked runs, in order of first appearance. Never holds an empty board.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog(Boards);

impl Catalog {
    /// Merge keys differing only by case, re-rank every board and drop empty ones.
    /// Used on freshly deserialized documents, which may have been edited by hand.
    fn normalized(self) -> Catalog {
        let mut boards = Boards::new();
        for (title, runs) in self.0 {
            boards
                .entry(GameTitle::normalize(title.as_str()))
                .or_default()
                .extend(runs);
        }
        boards.retain(|title, board| !title.is_empty() && !board.is_empty());
        boards.values_mut().for_each(|board| rank(board));
        Catalog(boards)
    }
}

impl Deref for Catalog {
    type Target = Boards;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Owner of the catalog. Every mutation re-ranks the affected board and
/// writes the whole catalog through the persistence layer.
pub struct RunStore {
    catalog: Catalog,
    storage: Box<dyn Persistence>,
}

impl RunStore {
    /// Load the previous state, or start from an empty catalog if there is none
    /// or it can't be read.
    pub fn load(storage: Box<dyn Persistence>) -> RunStore {
        let catalog = match storage.load() {
            Ok(Some(catalog)) => {
                let catalog = catalog.normalized();
                info!("Loaded {} game board(s) from storage.", catalog.len());
                catalog
            }
            Ok(None) => {
                info!("No previous state found, starting with an empty catalog.");
                Catalog::default()
            }
            Err(e) => {
                warn!("{e}. Starting with an empty catalog.");
                Catalog::default()
            }
        };

        RunStore { catalog, storage }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Record a run and return its resulting placement.
    pub fn submit(
        &mut self,
        game: &str,
        time: &str,
        contributor: &Contributor,
    ) -> BotResult<usize> {
        // Validate before touching anything.
        let time = RunTime::parse(time)?;
        let title = GameTitle::normalize(game);
        if title.is_empty() {
            return Err(BotError::EmptyGameTitle);
        }

        let board = self.catalog.0.entry(title.clone()).or_default();
        board.push(Run::new(time.clone(), contributor.clone()));
        rank(board);

        // Stable sort: the new run is the last one with that time.
        let placement = board
            .iter()
            .rposition(|r| r.time == time)
            .map(|idx| idx + 1)
            .unwrap_or(board.len());

        info!("New run for {title}: {time} by {contributor}, placed {placement}.");
        self.flush();
        Ok(placement)
    }

    /// Remove the run at `placement`, only if it belongs to `contributor`.
    pub fn remove(
        &mut self,
        game: &str,
        placement: usize,
        contributor: &Contributor,
    ) -> BotResult<()> {
        let title = GameTitle::normalize(game);
        let board = self.catalog.0.get_mut(&title).ok_or(BotError::NotFound)?;

        let idx = board
            .iter()
            .position(|r| r.placement == placement && &r.contributor == contributor)
            .ok_or(BotError::NotFound)?;

        let removed = board.remove(idx);
        rank(board);
        if board.is_empty() {
            // keep the order of the other games
            self.catalog.0.shift_remove(&title);
        }

        info!(
            "Removed run {} by {} from {title} (was placed {}).",
            removed.time, removed.contributor, removed.placement
        );
        self.flush();
        Ok(())
    }

    pub fn board(&self, game: &str) -> Option<&[Run]> {
        self.catalog
            .get(&GameTitle::normalize(game))
            .map(|board| board.as_slice())
    }

    /// Fastest run of each contributor, ordered by time.
    pub fn best_per_contributor(&self, game: &str) -> Vec<Run> {
        // Boards are sorted, so the first run seen for a contributor is their best.
        self.board(game)
            .unwrap_or_default()
            .iter()
            .unique_by(|r| r.contributor.clone())
            .cloned()
            .collect()
    }

    /// All runs of a contributor, by game then placement.
    pub fn runs_by_contributor(&self, contributor: &Contributor) -> Vec<(GameTitle, Run)> {
        self.catalog
            .iter()
            .flat_map(|(title, board)| {
                board
                    .iter()
                    .filter(|r| &r.contributor == contributor)
                    .map(move |r| (title.clone(), r.clone()))
            })
            .collect()
    }

    pub fn list_games(&self) -> Vec<GameTitle> {
        self.catalog.keys().cloned().collect()
    }

    // A failed save keeps the in-memory state, the next successful flush catches up.
    fn flush(&self) {
        if let Err(e) = self.storage.save(&self.catalog) {
            error!("{e}");
        }
    }
}

/// Sort by time (stable, ties keep insertion order) and renumber placements.
fn rank(board: &mut GameBoard) {
    board.sort_by_key(|r| r.time.to_millis());
    board
        .iter_mut()
        .enumerate()
        .for_each(|(idx, run)| run.placement = idx + 1);
}
