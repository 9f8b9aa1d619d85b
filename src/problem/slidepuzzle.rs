use super::{zero_heuristic, Catalog, Lines};
use crate::error::SearchError;
use crate::state::State;

use anyhow::Context;
use std::fmt;
use std::path::Path;
use std::rc::Rc;
use std::str::FromStr;
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    pub r: usize,
    pub c: usize,
}

impl Coordinate {
    pub fn new(r: usize, c: usize) -> Self {
        Coordinate { r, c }
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(R:{}, C:{})", self.r, self.c)
    }
}

/// An `n x n` sliding tile board. Tile `0` is the blank.
///
/// The goal places the blank in the top-left corner followed by the tiles in
/// row-major order. An action names the coordinate of the tile that slides
/// into the blank.
#[derive(Debug, Clone)]
pub struct SlidePuzzleState {
    size: usize,
    tiles: Rc<[u16]>,
    blank: Coordinate,
}

impl SlidePuzzleState {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read slide puzzle {}", path.display()))?;
        let state: SlidePuzzleState = text
            .parse()
            .with_context(|| format!("error with slide puzzle {}", path.display()))?;
        if !state.is_solvable() {
            warn!("slide puzzle {} has no solution", path.display());
        }
        Ok(state)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn blank(&self) -> Coordinate {
        self.blank
    }

    pub fn tile(&self, at: Coordinate) -> u16 {
        self.tiles[at.r * self.size + at.c]
    }

    fn inversions(&self) -> usize {
        let tiles: Vec<u16> = self.tiles.iter().copied().filter(|t| *t != 0).collect();
        tiles
            .iter()
            .enumerate()
            .map(|(i, a)| tiles[i + 1..].iter().filter(|b| a > b).count())
            .sum()
    }

    /// Whether the goal is reachable, from inversion parity.
    pub fn is_solvable(&self) -> bool {
        let inversions = self.inversions();
        if self.size % 2 == 1 {
            inversions % 2 == 0
        } else {
            (inversions + self.blank.r) % 2 == 0
        }
    }

    fn neighbor(&self, dr: isize, dc: isize) -> Option<Coordinate> {
        let r = self.blank.r.checked_add_signed(dr).filter(|r| *r < self.size)?;
        let c = self.blank.c.checked_add_signed(dc).filter(|c| *c < self.size)?;
        Some(Coordinate { r, c })
    }
}

impl FromStr for SlidePuzzleState {
    type Err = SearchError;

    /// Board size on the first line, then one row of tiles per line.
    fn from_str(text: &str) -> Result<Self, SearchError> {
        let mut lines = Lines::new(text);
        let size = lines
            .next_line("board size")?
            .parse::<usize>()
            .ok()
            .filter(|n| {
                *n > 0 && n.checked_mul(*n).is_some_and(|cells| cells <= usize::from(u16::MAX))
            })
            .ok_or_else(|| lines.error("board size must be a positive integer"))?;

        let cells = size * size;
        let mut tiles = Vec::with_capacity(cells);
        let mut seen = vec![false; cells];
        for _ in 0..size {
            let row: Vec<u16> = lines.numbers("board row")?;
            if row.len() != size {
                return Err(lines.error(format!("expected {size} tiles, found {}", row.len())));
            }
            for tile in &row {
                match seen.get_mut(usize::from(*tile)) {
                    Some(slot) if !*slot => *slot = true,
                    Some(_) => return Err(lines.error(format!("tile {tile} appears twice"))),
                    None => {
                        return Err(lines.error(format!("tile {tile} is outside 0..{cells}")))
                    }
                }
            }
            tiles.extend(row);
        }

        let blank = tiles.iter().position(|t| *t == 0).unwrap_or_default();
        Ok(SlidePuzzleState {
            size,
            tiles: tiles.into(),
            blank: Coordinate::new(blank / size, blank % size),
        })
    }
}

impl State for SlidePuzzleState {
    type Action = Coordinate;
    type Feature = Rc<[u16]>;

    fn feature(&self) -> Rc<[u16]> {
        Rc::clone(&self.tiles)
    }

    fn is_goal(&self) -> bool {
        self.tiles.iter().enumerate().all(|(i, t)| usize::from(*t) == i)
    }

    fn legal_actions(&self) -> Vec<Coordinate> {
        [(0, 1), (-1, 0), (0, -1), (1, 0)]
            .into_iter()
            .filter_map(|(dr, dc)| self.neighbor(dr, dc))
            .collect()
    }

    fn is_legal_action(&self, action: &Coordinate) -> bool {
        action.r < self.size
            && action.c < self.size
            && action.r.abs_diff(self.blank.r) + action.c.abs_diff(self.blank.c) == 1
    }

    fn transition(&self, action: &Coordinate) -> (Self, f64) {
        let mut tiles = self.tiles.to_vec();
        tiles.swap(
            self.blank.r * self.size + self.blank.c,
            action.r * self.size + action.c,
        );
        (
            SlidePuzzleState {
                size: self.size,
                tiles: tiles.into(),
                blank: *action,
            },
            1.0,
        )
    }

    fn describe_action(&self, action: &Coordinate) -> String {
        format!("Moved tile {}", self.tile(*action))
    }
}

impl fmt::Display for SlidePuzzleState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = (self.size * self.size - 1).to_string().len();
        for row in self.tiles.chunks(self.size) {
            let cells: Vec<String> = row
                .iter()
                .map(|t| match t {
                    0 => format!("{:>width$}", "."),
                    t => format!("{t:>width$}"),
                })
                .collect();
            writeln!(f, "{}", cells.join(" "))?;
        }
        Ok(())
    }
}

fn hamming(state: &SlidePuzzleState) -> f64 {
    state
        .tiles
        .iter()
        .enumerate()
        .filter(|(i, t)| **t != 0 && usize::from(**t) != *i)
        .count() as f64
}

fn manhattan(state: &SlidePuzzleState) -> f64 {
    let n = state.size;
    state
        .tiles
        .iter()
        .enumerate()
        .filter(|(_, t)| **t != 0)
        .map(|(i, t)| {
            let t = usize::from(*t);
            (i / n).abs_diff(t / n) + (i % n).abs_diff(t % n)
        })
        .sum::<usize>() as f64
}

pub const HEURISTICS: Catalog<SlidePuzzleState> = &[
    ("zero", zero_heuristic::<SlidePuzzleState>),
    ("hamming", hamming),
    ("manhattan", manhattan),
];
