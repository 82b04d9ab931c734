use std::{cmp::Ordering, cmp::Reverse, collections::BinaryHeap};

use super::{Step, StepTrace, run_search};
use crate::error::Result;
use crate::grid::{Grid, NeighborOrder};

/// How the open set is ordered by the best-first searches.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Ranking {
    /// `f = g + weight * h`. With `prefer_closer`, equal `f` goes to the lower `h` (A*);
    /// without it, to the cell that entered the open set first (simplified JPS).
    Score { weight: f64, prefer_closer: bool },
    /// `f = h`, the greedy best-first ordering.
    Heuristic,
}

impl Ranking {
    fn score(self, g: u32, h: u32) -> f64 {
        match self {
            Ranking::Score { weight, .. } => g as f64 + weight * h as f64,
            Ranking::Heuristic => h as f64,
        }
    }

    fn tie_break(self, h: u32) -> u32 {
        match self {
            Ranking::Score {
                prefer_closer: true,
                ..
            } => h,
            _ => 0,
        }
    }
}

/// Open set entry. Ordered by score, then tie-break, then insertion order.
struct TrackedCell {
    score: f64,
    tie_break: u32,
    seq: usize,
    index: usize,
}

impl Ord for TrackedCell {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then(self.tie_break.cmp(&other.tie_break))
            .then(self.seq.cmp(&other.seq))
    }
}

impl PartialOrd for TrackedCell {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for TrackedCell {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for TrackedCell {}

/// Min-heap of open cells. A cell keeps the insertion order of its first
/// entry when it is pushed again with an improved score.
struct OpenSet {
    heap: BinaryHeap<Reverse<TrackedCell>>,
    entered: Vec<Option<usize>>,
    next_seq: usize,
}

impl OpenSet {
    fn new(len: usize) -> Self {
        OpenSet {
            heap: BinaryHeap::new(),
            entered: vec![None; len],
            next_seq: 0,
        }
    }

    fn push(&mut self, index: usize, score: f64, tie_break: u32) {
        let seq = match self.entered[index] {
            Some(seq) => seq,
            None => {
                let seq = self.next_seq;
                self.entered[index] = Some(seq);
                self.next_seq += 1;
                seq
            }
        };
        self.heap.push(Reverse(TrackedCell {
            score,
            tie_break,
            seq,
            index,
        }));
    }

    fn pop(&mut self) -> Option<TrackedCell> {
        self.heap.pop().map(|Reverse(entry)| entry)
    }
}

/// Best-first search over an explicit open set, shared by A*, greedy
/// best-first and the simplified jump point search.
///
/// The jump point variant does no jump pruning: it is a four-directional
/// A* ranked by `f` alone.
///
/// A neighbor is relaxed only when its accumulated cost `g` strictly
/// improves, whatever the ranking. A cell is added to the open set only if
/// it is not already flagged `in_open_set`; an improved cell that is already
/// open gets a fresh heap entry carrying its original insertion order, and
/// the old entry is skipped as stale.
pub fn solve_best_first(grid: &mut Grid, ranking: Ranking) -> Result<StepTrace> {
    run_search(grid, |grid, start, finish, trace| {
        let h = grid.manhattan(start, finish);
        let cell = &mut grid[start];
        cell.distance = 0;
        cell.heuristic = h;
        cell.score = ranking.score(0, h);
        cell.in_open_set = true;

        let score = cell.score;
        let mut open = OpenSet::new(grid.len());
        open.push(start, score, ranking.tie_break(h));

        while let Some(entry) = open.pop() {
            let current = entry.index;
            let cell = &mut grid[current];
            if !cell.in_open_set || cell.score.total_cmp(&entry.score) != Ordering::Equal {
                continue;
            }
            cell.in_open_set = false;

            if current == finish {
                break;
            }
            if cell.is_visited || cell.is_wall {
                continue;
            }
            cell.is_visited = true;
            trace.push(Step::Visited { index: current });

            let tentative = cell.distance + 1;
            for neighbor in grid.neighbors(current, NeighborOrder::Vertical) {
                let h = grid.manhattan(neighbor, finish);
                let cell = &mut grid[neighbor];
                if cell.is_wall || cell.is_visited || tentative >= cell.distance {
                    continue;
                }
                let previous_score = cell.score;
                cell.previous = Some(current);
                cell.distance = tentative;
                cell.heuristic = h;
                cell.score = ranking.score(tentative, h);

                if !cell.in_open_set || cell.score.total_cmp(&previous_score) != Ordering::Equal
                {
                    cell.in_open_set = true;
                    open.push(neighbor, cell.score, ranking.tie_break(h));
                }
                trace.push(Step::Updated { index: neighbor });
            }
        }
    })
}
