use rand::{rngs::StdRng, seq::SliceRandom};

use super::{WallSet, add_border_walls, connect_endpoints, fill_interior};
use crate::grid::Grid;

struct UnionFind {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl UnionFind {
    fn new(size: usize) -> Self {
        UnionFind {
            parent: (0..size).collect(),
            rank: vec![0; size],
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            self.parent[x] = self.find(self.parent[x]);
        }
        self.parent[x]
    }

    fn unite(&mut self, x: usize, y: usize) -> bool {
        let root_x = self.find(x);
        let root_y = self.find(y);

        if root_x == root_y {
            return false; // Already in same set
        }

        match self.rank[root_x].cmp(&self.rank[root_y]) {
            std::cmp::Ordering::Greater => {
                self.parent[root_y] = root_x;
            }
            std::cmp::Ordering::Less => {
                self.parent[root_x] = root_y;
            }
            std::cmp::Ordering::Equal => {
                self.parent[root_y] = root_x;
                self.rank[root_x] += 1;
            }
        }
        true
    }
}

/// Candidate passage between two lattice cells two steps apart
#[derive(Clone, Copy)]
struct Edge {
    cell1: usize,
    cell2: usize,
    between: usize,
}

/// Randomized Kruskal over the odd lattice.
///
/// Every odd cell starts as its own set; shuffled edges to the right and
/// downward are taken in order, and the wall between two cells is removed
/// whenever they belong to different sets.
pub fn randomized_kruskal(grid: &Grid, rng: &mut StdRng) -> WallSet {
    let mut walls = WallSet::new(grid);
    add_border_walls(grid, &mut walls);
    if grid.rows() < 3 || grid.cols() < 3 {
        return walls;
    }
    fill_interior(grid, &mut walls);

    let (rows, cols) = (grid.rows(), grid.cols());
    let lattice = (1..rows - 1)
        .step_by(2)
        .flat_map(|r| (1..cols - 1).step_by(2).map(move |c| (r, c)))
        .collect::<Vec<_>>();
    for &(r, c) in &lattice {
        walls.remove(grid.index_of(r, c));
    }

    // Collect right and down neighbors on the lattice
    let mut edges: Vec<Edge> = lattice
        .iter()
        .flat_map(|&(r, c)| {
            [
                (c + 2 < cols - 1).then(|| Edge {
                    cell1: grid.index_of(r, c),
                    cell2: grid.index_of(r, c + 2),
                    between: grid.index_of(r, c + 1),
                }),
                (r + 2 < rows - 1).then(|| Edge {
                    cell1: grid.index_of(r, c),
                    cell2: grid.index_of(r + 2, c),
                    between: grid.index_of(r + 1, c),
                }),
            ]
        })
        .flatten()
        .collect();

    edges.shuffle(rng);

    let mut uf = UnionFind::new(grid.len());
    for edge in edges {
        if uf.unite(edge.cell1, edge.cell2) {
            walls.remove(edge.between);
        }
    }
    connect_endpoints(grid, &mut walls);
    walls
}
