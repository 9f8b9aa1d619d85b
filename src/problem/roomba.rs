use super::{zero_heuristic, Catalog, Lines};
use crate::error::SearchError;
use crate::state::State;

use anyhow::Context;
use std::fmt;
use std::path::Path;
use std::rc::Rc;
use std::str::FromStr;

pub type Coordinate = (usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Terrain {
    Floor,
    Carpet,
    Wall,
    DirtyFloor,
    DirtyCarpet,
}

impl Terrain {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "." => Some(Terrain::Floor),
            "~" => Some(Terrain::Carpet),
            "#" => Some(Terrain::Wall),
            "?" => Some(Terrain::DirtyFloor),
            "+" => Some(Terrain::DirtyCarpet),
            _ => None,
        }
    }

    pub fn symbol(self) -> char {
        match self {
            Terrain::Floor => '.',
            Terrain::Carpet => '~',
            Terrain::Wall => '#',
            Terrain::DirtyFloor => '?',
            Terrain::DirtyCarpet => '+',
        }
    }

    /// Cost of moving onto this terrain.
    pub fn cost(self) -> f64 {
        match self {
            Terrain::Floor | Terrain::DirtyFloor => 1.0,
            Terrain::Carpet | Terrain::DirtyCarpet => 2.0,
            Terrain::Wall => 0.0,
        }
    }

    pub fn is_dirty(self) -> bool {
        matches!(self, Terrain::DirtyFloor | Terrain::DirtyCarpet)
    }

    pub fn cleaned(self) -> Self {
        match self {
            Terrain::DirtyFloor => Terrain::Floor,
            Terrain::DirtyCarpet => Terrain::Carpet,
            other => other,
        }
    }

    fn dirtied(self) -> Self {
        match self {
            Terrain::Floor => Terrain::DirtyFloor,
            Terrain::Carpet => Terrain::DirtyCarpet,
            other => other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    East,
    South,
    West,
    North,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::North,
    ];

    fn delta(self) -> (isize, isize) {
        match self {
            Direction::East => (0, 1),
            Direction::South => (1, 0),
            Direction::West => (0, -1),
            Direction::North => (-1, 0),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Static layout shared by every state of one problem.
#[derive(Debug)]
pub struct RoombaGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Terrain>,
    dirt: Vec<Coordinate>,
}

impl RoombaGrid {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn terrain(&self, (r, c): Coordinate) -> Terrain {
        self.cells[r * self.cols + c]
    }

    /// Dirty cells as loaded, in row-major order.
    pub fn dirt(&self) -> &[Coordinate] {
        &self.dirt
    }

    /// Destination of a move, unless it leaves the grid or hits a wall.
    pub fn step(&self, (r, c): Coordinate, direction: Direction) -> Option<Coordinate> {
        let (dr, dc) = direction.delta();
        let r = r.checked_add_signed(dr).filter(|r| *r < self.rows)?;
        let c = c.checked_add_signed(dc).filter(|c| *c < self.cols)?;
        (self.terrain((r, c)) != Terrain::Wall).then_some((r, c))
    }

    fn moves(&self, position: Coordinate) -> Vec<Direction> {
        Direction::ALL
            .into_iter()
            .filter(|direction| self.step(position, *direction).is_some())
            .collect()
    }

    fn render(&self, position: Coordinate, draw: impl Fn(Coordinate) -> Terrain) -> String {
        let mut out = String::with_capacity(self.rows * (self.cols + 1));
        for r in 0..self.rows {
            for c in 0..self.cols {
                out.push(if (r, c) == position {
                    'X'
                } else {
                    draw((r, c)).symbol()
                });
            }
            out.push('\n');
        }
        out
    }
}

/// Parses the shared layout format:
///
/// ```text
/// 3 4
/// 0 0
/// . . ~ .
/// . # ~ ?
/// . . . .
/// ```
///
/// Grid size, starting row and column, then one row of terrain tokens per
/// line.
fn parse_layout(text: &str) -> Result<(RoombaGrid, Coordinate), SearchError> {
    let mut lines = Lines::new(text);
    let size: Vec<usize> = lines.numbers("grid size")?;
    let size_line = lines.line();
    let [rows, cols] = size[..] else {
        return Err(lines.error("grid size needs `rows cols`"));
    };
    let start: Vec<usize> = lines.numbers("start position")?;
    let start_line = lines.line();
    let [start_r, start_c] = start[..] else {
        return Err(lines.error("start position needs `row col`"));
    };

    if rows.checked_mul(cols).is_none() {
        return Err(SearchError::malformed(
            size_line,
            format!("grid size {rows} x {cols} is too large"),
        ));
    }

    // Grows with the rows actually read, never from the header alone.
    let mut cells = Vec::new();
    for _ in 0..rows {
        let line = lines.next_line("grid row")?;
        let row = line
            .split_whitespace()
            .map(|token| {
                Terrain::parse(token).ok_or_else(|| lines.error(format!("unknown terrain {token:?}")))
            })
            .collect::<Result<Vec<_>, _>>()?;
        if row.len() != cols {
            return Err(lines.error(format!("expected {cols} cells, found {}", row.len())));
        }
        cells.extend(row);
    }

    if start_r >= rows || start_c >= cols {
        return Err(SearchError::malformed(start_line, "start position outside the grid"));
    }
    if cells[start_r * cols + start_c] == Terrain::Wall {
        return Err(SearchError::malformed(start_line, "start position is a wall"));
    }

    let dirt = (0..rows)
        .flat_map(|r| (0..cols).map(move |c| (r, c)))
        .filter(|(r, c)| cells[r * cols + c].is_dirty())
        .collect();

    Ok((
        RoombaGrid {
            rows,
            cols,
            cells,
            dirt,
        },
        (start_r, start_c),
    ))
}

fn read_problem(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path)
        .with_context(|| format!("failed to read roomba problem {}", path.display()))
}

fn manhattan((r1, c1): Coordinate, (r2, c2): Coordinate) -> usize {
    r1.abs_diff(r2) + c1.abs_diff(c2)
}

/// Robot routing to any one dirty cell.
#[derive(Debug, Clone)]
pub struct RoombaRouteState {
    grid: Rc<RoombaGrid>,
    position: Coordinate,
}

impl RoombaRouteState {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        read_problem(path)?
            .parse()
            .with_context(|| format!("error with roomba problem {}", path.display()))
    }

    pub fn grid(&self) -> &RoombaGrid {
        &self.grid
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }
}

impl FromStr for RoombaRouteState {
    type Err = SearchError;

    fn from_str(text: &str) -> Result<Self, SearchError> {
        let (grid, position) = parse_layout(text)?;
        Ok(RoombaRouteState {
            grid: Rc::new(grid),
            position,
        })
    }
}

impl State for RoombaRouteState {
    type Action = Direction;
    type Feature = Coordinate;

    fn feature(&self) -> Coordinate {
        self.position
    }

    fn is_goal(&self) -> bool {
        self.grid.terrain(self.position).is_dirty()
    }

    fn legal_actions(&self) -> Vec<Direction> {
        self.grid.moves(self.position)
    }

    fn is_legal_action(&self, action: &Direction) -> bool {
        self.grid.step(self.position, *action).is_some()
    }

    fn transition(&self, action: &Direction) -> (Self, f64) {
        let position = self.grid.step(self.position, *action).unwrap_or(self.position);
        (
            RoombaRouteState {
                grid: Rc::clone(&self.grid),
                position,
            },
            self.grid.terrain(position).cost(),
        )
    }

    fn describe_action(&self, action: &Direction) -> String {
        action.to_string()
    }
}

impl fmt::Display for RoombaRouteState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.grid.render(self.position, |cell| self.grid.terrain(cell)))
    }
}

/// Robot that must clean every dirty cell.
///
/// The layout is stored clean and the remaining dirt is tracked per state, so
/// a state's identity is its position plus the cells still dirty.
#[derive(Debug, Clone)]
pub struct SpotlessRoombaState {
    grid: Rc<RoombaGrid>,
    position: Coordinate,
    dirty: Rc<[Coordinate]>,
}

impl SpotlessRoombaState {
    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        read_problem(path)?
            .parse()
            .with_context(|| format!("error with spotless roomba problem {}", path.display()))
    }

    pub fn grid(&self) -> &RoombaGrid {
        &self.grid
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    /// Cells still dirty, in row-major order.
    pub fn dirty(&self) -> &[Coordinate] {
        &self.dirty
    }
}

impl FromStr for SpotlessRoombaState {
    type Err = SearchError;

    fn from_str(text: &str) -> Result<Self, SearchError> {
        let (mut grid, position) = parse_layout(text)?;
        // The robot cleans the cell it starts on.
        let dirty: Rc<[Coordinate]> = grid
            .dirt
            .iter()
            .copied()
            .filter(|cell| *cell != position)
            .collect();
        for cell in grid.cells.iter_mut() {
            *cell = cell.cleaned();
        }
        Ok(SpotlessRoombaState {
            grid: Rc::new(grid),
            position,
            dirty,
        })
    }
}

impl State for SpotlessRoombaState {
    type Action = Direction;
    type Feature = (Coordinate, Rc<[Coordinate]>);

    fn feature(&self) -> Self::Feature {
        (self.position, Rc::clone(&self.dirty))
    }

    fn is_goal(&self) -> bool {
        self.dirty.is_empty()
    }

    fn legal_actions(&self) -> Vec<Direction> {
        self.grid.moves(self.position)
    }

    fn is_legal_action(&self, action: &Direction) -> bool {
        self.grid.step(self.position, *action).is_some()
    }

    fn transition(&self, action: &Direction) -> (Self, f64) {
        let position = self.grid.step(self.position, *action).unwrap_or(self.position);
        let dirty = if self.dirty.contains(&position) {
            self.dirty.iter().copied().filter(|cell| *cell != position).collect()
        } else {
            Rc::clone(&self.dirty)
        };
        (
            SpotlessRoombaState {
                grid: Rc::clone(&self.grid),
                position,
                dirty,
            },
            self.grid.terrain(position).cost(),
        )
    }

    fn describe_action(&self, action: &Direction) -> String {
        action.to_string()
    }
}

impl fmt::Display for SpotlessRoombaState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.grid.render(self.position, |cell| {
            let terrain = self.grid.terrain(cell);
            if self.dirty.contains(&cell) {
                terrain.dirtied()
            } else {
                terrain
            }
        }))
    }
}

fn route_manhattan(state: &RoombaRouteState) -> f64 {
    state
        .grid
        .dirt
        .iter()
        .map(|cell| manhattan(state.position, *cell))
        .min()
        .unwrap_or(0) as f64
}

pub const ROUTE_HEURISTICS: Catalog<RoombaRouteState> = &[
    ("zero", zero_heuristic::<RoombaRouteState>),
    ("manhattan", route_manhattan),
];

fn remaining(state: &SpotlessRoombaState) -> f64 {
    state.dirty.len() as f64
}

fn closest(state: &SpotlessRoombaState) -> f64 {
    state
        .dirty
        .iter()
        .map(|cell| manhattan(state.position, *cell))
        .min()
        .unwrap_or(0) as f64
}

fn farthest(state: &SpotlessRoombaState) -> f64 {
    state
        .dirty
        .iter()
        .map(|cell| manhattan(state.position, *cell))
        .max()
        .unwrap_or(0) as f64
}

fn closest_plus_count(state: &SpotlessRoombaState) -> f64 {
    closest(state) + (remaining(state) - 1.0).max(0.0)
}

fn bounding_box(state: &SpotlessRoombaState) -> f64 {
    let Some(&(first_r, first_c)) = state.dirty.first() else {
        return 0.0;
    };
    let (mut min_r, mut max_r, mut min_c, mut max_c) = (first_r, first_r, first_c, first_c);
    for &(r, c) in state.dirty.iter() {
        min_r = min_r.min(r);
        max_r = max_r.max(r);
        min_c = min_c.min(c);
        max_c = max_c.max(c);
    }
    ((max_r - min_r) + (max_c - min_c)) as f64
}

fn closest_plus_bounding_box(state: &SpotlessRoombaState) -> f64 {
    closest(state) + bounding_box(state)
}

// Each dirty cell past the closest one weighs the grid's rows plus columns.
fn closest_plus_count_weighted(state: &SpotlessRoombaState) -> f64 {
    let weight = (state.grid.rows + state.grid.cols) as f64;
    closest(state) + weight * (remaining(state) - 1.0).max(0.0)
}

fn max_of_all(state: &SpotlessRoombaState) -> f64 {
    closest(state) + bounding_box(state).max(remaining(state) - 1.0)
}

pub const SPOTLESS_HEURISTICS: Catalog<SpotlessRoombaState> = &[
    ("zero", zero_heuristic::<SpotlessRoombaState>),
    ("remaining", remaining),
    ("closest", closest),
    ("farthest", farthest),
    ("closest-plus-count", closest_plus_count),
    ("closest-plus-count-weighted", closest_plus_count_weighted),
    ("bounding-box", bounding_box),
    ("closest-plus-bounding-box", closest_plus_bounding_box),
    ("max-of-all", max_of_all),
];
