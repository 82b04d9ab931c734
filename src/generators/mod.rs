use std::str::FromStr;

use rand::{SeedableRng, rngs::StdRng};

mod kruskal;
mod random;
mod recur_backtrack;
mod recur_div;

use kruskal::randomized_kruskal;
use random::random_walls;
use recur_backtrack::recursive_backtrack;
use recur_div::recursive_division;

use crate::error::{Error, Result};
use crate::grid::{Grid, NeighborOrder};

/// Get a random number generator, optionally seeded for reproducibility.
pub fn get_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_os_rng(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generator {
    Random,
    RecurDiv,
    RecurBacktrack,
    Kruskal,
}

impl Generator {
    pub const ALL: [Generator; 4] = [
        Generator::Random,
        Generator::RecurDiv,
        Generator::RecurBacktrack,
        Generator::Kruskal,
    ];

    /// Selector name used on the command line and in configuration.
    pub fn name(self) -> &'static str {
        match self {
            Generator::Random => "random",
            Generator::RecurDiv => "recursive-division",
            Generator::RecurBacktrack => "recursive-backtracking",
            Generator::Kruskal => "kruskals",
        }
    }
}

impl std::fmt::Display for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Generator::Random => write!(f, "Random Obstacles"),
            Generator::RecurDiv => write!(f, "Recursive Division"),
            Generator::RecurBacktrack => write!(f, "Recursive Backtracking"),
            Generator::Kruskal => write!(f, "Kruskal's Algorithm"),
        }
    }
}

impl FromStr for Generator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().to_ascii_lowercase();
        Generator::ALL
            .into_iter()
            .find(|generator| generator.name() == s)
            .ok_or(Error::UnknownSelector {
                kind: "generator",
                value: s,
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerateOptions {
    /// Probability that the random generator walls a cell.
    pub obstacle_weight: f64,
    pub seed: Option<u64>,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            obstacle_weight: 30.0 / 130.0,
            seed: None,
        }
    }
}

/// Insertion-ordered set of wall indices that never admits an endpoint.
/// Removing an index and inserting it again moves it to the end.
pub(crate) struct WallSet {
    order: Vec<usize>,
    /// Position in `order` of each index currently in the set
    slot: Vec<Option<usize>>,
    endpoint: Vec<bool>,
}

impl WallSet {
    pub(crate) fn new(grid: &Grid) -> Self {
        WallSet {
            order: Vec::new(),
            slot: vec![None; grid.len()],
            endpoint: grid.cells().iter().map(|cell| cell.is_endpoint()).collect(),
        }
    }

    pub(crate) fn insert(&mut self, index: usize) -> bool {
        if self.endpoint[index] || self.slot[index].is_some() {
            return false;
        }
        self.slot[index] = Some(self.order.len());
        self.order.push(index);
        true
    }

    pub(crate) fn remove(&mut self, index: usize) -> bool {
        self.slot[index].take().is_some()
    }

    pub(crate) fn contains(&self, index: usize) -> bool {
        self.slot[index].is_some()
    }

    pub(crate) fn is_endpoint(&self, index: usize) -> bool {
        self.endpoint[index]
    }

    pub(crate) fn into_vec(self) -> Vec<usize> {
        let slot = self.slot;
        self.order
            .into_iter()
            .enumerate()
            .filter(|&(position, index)| slot[index] == Some(position))
            .map(|(_, index)| index)
            .collect()
    }
}

/// Wall the outer frame of the grid, in row-major order.
pub(crate) fn add_border_walls(grid: &Grid, walls: &mut WallSet) {
    (0..grid.len())
        .filter(|&index| grid.is_boundary(index))
        .for_each(|index| {
            walls.insert(index);
        });
}

/// Wall every interior cell, in row-major order.
pub(crate) fn fill_interior(grid: &Grid, walls: &mut WallSet) {
    (0..grid.len())
        .filter(|&index| !grid.is_boundary(index))
        .for_each(|index| {
            walls.insert(index);
        });
}

/// Open a passage to every endpoint the maze left boxed in. The first
/// interior neighbor that touches another open cell is cleared.
pub(crate) fn connect_endpoints(grid: &Grid, walls: &mut WallSet) {
    let endpoints: Vec<usize> = (0..grid.len()).filter(|&i| walls.is_endpoint(i)).collect();
    for endpoint in endpoints {
        let mut neighbors = grid.neighbors(endpoint, NeighborOrder::Vertical);
        if neighbors.any(|n| !walls.contains(n)) {
            continue;
        }
        let passage = grid
            .neighbors(endpoint, NeighborOrder::Vertical)
            .filter(|&n| !grid.is_boundary(n))
            .find(|&n| {
                grid.neighbors(n, NeighborOrder::Vertical)
                    .any(|m| m != endpoint && !walls.contains(m))
            });
        if let Some(passage) = passage {
            tracing::debug!("Opening {} to reach endpoint {}", passage, endpoint);
            walls.remove(passage);
        }
    }
}

/// Generate a wall layout, write it onto the grid and return the wall
/// indices in reveal order. Existing walls are cleared first and endpoints
/// are never walled.
pub fn generate_walls(
    grid: &mut Grid,
    generator: Generator,
    options: &GenerateOptions,
) -> Result<Vec<usize>> {
    grid.endpoints()?;
    grid.clear_walls();

    let mut rng = get_rng(options.seed);
    let walls = match generator {
        Generator::Random => random_walls(grid, options.obstacle_weight, &mut rng),
        Generator::RecurDiv => recursive_division(grid, &mut rng),
        Generator::RecurBacktrack => recursive_backtrack(grid, &mut rng),
        Generator::Kruskal => randomized_kruskal(grid, &mut rng),
    }
    .into_vec();

    for &index in &walls {
        grid[index].is_wall = true;
    }
    tracing::debug!("{} produced {} walls", generator, walls.len());
    Ok(walls)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::grid::NeighborOrder;

    /// Asserts the open cells form a spanning tree: connected, `V - 1` adjacencies.
    pub(crate) fn assert_perfect_maze(grid: &Grid) {
        let open = (0..grid.len())
            .filter(|&i| !grid[i].is_wall)
            .collect::<Vec<_>>();
        let edges = open
            .iter()
            .flat_map(|&i| grid.neighbors(i, NeighborOrder::Vertical).filter(move |&n| n > i))
            .filter(|&n| !grid[n].is_wall)
            .count();
        assert_eq!(edges, open.len() - 1, "open cells contain a cycle or are split");

        let mut seen = vec![false; grid.len()];
        let mut stack = vec![open[0]];
        seen[open[0]] = true;
        while let Some(i) = stack.pop() {
            for n in grid.neighbors(i, NeighborOrder::Vertical) {
                if !grid[n].is_wall && !seen[n] {
                    seen[n] = true;
                    stack.push(n);
                }
            }
        }
        assert!(open.iter().all(|&i| seen[i]), "open cells are not connected");
    }

    pub(crate) fn assert_border_walled(grid: &Grid) {
        for index in (0..grid.len()).filter(|&i| grid.is_boundary(i)) {
            assert!(grid[index].is_wall || grid[index].is_endpoint(), "gap at {index}");
        }
    }

    #[test]
    fn test_wall_set_keeps_insertion_order() {
        let grid = Grid::with_endpoints(3, 3, (1, 0), (1, 2)).unwrap();
        let mut walls = WallSet::new(&grid);
        assert!(walls.insert(4));
        assert!(walls.insert(0));
        assert!(!walls.insert(3)); // start
        assert!(walls.insert(8));
        assert!(walls.remove(4));
        assert!(!walls.contains(4));
        assert!(walls.insert(4));
        assert_eq!(walls.into_vec(), vec![0, 8, 4]);
    }

    #[test]
    fn test_boxed_in_endpoint_gets_one_passage() {
        // Start at (2, 2): every neighbor is walled, (1, 1) is open
        let grid = Grid::with_endpoints(5, 5, (2, 2), (0, 1)).unwrap();
        let mut walls = WallSet::new(&grid);
        add_border_walls(&grid, &mut walls);
        fill_interior(&grid, &mut walls);
        walls.remove(grid.index_of(1, 1));
        connect_endpoints(&grid, &mut walls);
        // Up is the first neighbor that reaches an open cell
        assert!(!walls.contains(grid.index_of(1, 2)));
        assert!(walls.contains(grid.index_of(3, 2)));
        assert!(walls.contains(grid.index_of(2, 1)));
        assert!(walls.contains(grid.index_of(2, 3)));
        // The finish already touches the open (1, 1)
        assert!(walls.contains(grid.index_of(0, 2)));
    }

    #[test]
    fn test_parse_generator() {
        assert_eq!(
            "recursive-division".parse::<Generator>().unwrap(),
            Generator::RecurDiv
        );
        assert_eq!("Kruskals".parse::<Generator>().unwrap(), Generator::Kruskal);
        assert!("prim".parse::<Generator>().is_err());
    }

    #[test]
    fn test_generate_writes_flags_and_skips_endpoints() {
        let mut grid = Grid::with_endpoints(11, 11, (0, 1), (10, 9)).unwrap();
        grid[60].is_wall = true;
        for generator in Generator::ALL {
            let options = GenerateOptions {
                obstacle_weight: 0.5,
                seed: Some(7),
            };
            let walls = generate_walls(&mut grid, generator, &options).unwrap();
            let mut sorted = walls.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, grid.wall_indices(), "{generator}");
            assert!(grid.endpoints().is_ok());
        }
    }

    #[test]
    fn test_seeded_generation_is_reproducible() {
        let options = GenerateOptions {
            seed: Some(42),
            ..GenerateOptions::default()
        };
        for generator in Generator::ALL {
            let mut a = Grid::new(15, 21).unwrap();
            let mut b = Grid::new(15, 21).unwrap();
            assert_eq!(
                generate_walls(&mut a, generator, &options).unwrap(),
                generate_walls(&mut b, generator, &options).unwrap()
            );
        }
    }

    #[test]
    fn test_maze_generators_wall_the_border_first() {
        for generator in [
            Generator::RecurDiv,
            Generator::RecurBacktrack,
            Generator::Kruskal,
        ] {
            let mut grid = Grid::with_endpoints(9, 9, (3, 3), (5, 5)).unwrap();
            let options = GenerateOptions {
                seed: Some(3),
                ..GenerateOptions::default()
            };
            let walls = generate_walls(&mut grid, generator, &options).unwrap();
            // 9x9 frame has 32 cells
            assert!(walls[..32].iter().all(|&i| grid.is_boundary(i)), "{generator}");
            assert_border_walled(&grid);
        }
    }
}
