/// Distance of a cell the search has not reached.
pub const UNREACHED: u32 = u32::MAX;

/// One grid position together with the transient fields a search writes into it.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
    pub is_start: bool,
    pub is_finish: bool,
    pub is_wall: bool,
    /// Cell is in the closed set.
    pub is_visited: bool,
    /// Cell has been discovered and sits in the frontier.
    pub in_open_set: bool,
    /// Accumulated cost from the start (g).
    pub distance: u32,
    /// Estimated remaining cost to the finish (h).
    pub heuristic: u32,
    /// Ranking score (f).
    pub score: f64,
    /// Back-reference used for path reconstruction.
    pub previous: Option<usize>,
}

impl Cell {
    pub fn new(row: usize, col: usize) -> Self {
        Cell {
            row,
            col,
            is_start: false,
            is_finish: false,
            is_wall: false,
            is_visited: false,
            in_open_set: false,
            distance: UNREACHED,
            heuristic: UNREACHED,
            score: f64::INFINITY,
            previous: None,
        }
    }

    pub fn is_endpoint(&self) -> bool {
        self.is_start || self.is_finish
    }

    /// Clears the search fields, leaving wall and endpoint flags alone.
    pub fn reset_transient(&mut self) {
        self.is_visited = false;
        self.in_open_set = false;
        self.distance = UNREACHED;
        self.heuristic = UNREACHED;
        self.score = f64::INFINITY;
        self.previous = None;
    }

    /// Whether every search field holds its reset value.
    pub fn is_clean(&self) -> bool {
        !self.is_visited
            && !self.in_open_set
            && self.distance == UNREACHED
            && self.heuristic == UNREACHED
            && self.score == f64::INFINITY
            && self.previous.is_none()
    }
}
