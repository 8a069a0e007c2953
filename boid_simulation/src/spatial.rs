use std::collections::HashMap;

use glam::Vec2;

use crate::boid::Boid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellKey {
    pub x: i32,
    pub y: i32,
}

/// Uniform bucket grid over boid indices, rebuilt every tick.
///
/// Only live boids are indexed, so captured prey never show up as
/// neighbours. The grid borrows nothing: it stores slot indices into the
/// boid list it was built from.
pub struct SpatialGrid {
    cell_size: f32,
    cells: HashMap<CellKey, Vec<usize>>,
}

impl SpatialGrid {
    pub fn build(boids: &[Boid], cell_size: f32) -> Self {
        let mut grid = Self {
            cell_size,
            cells: HashMap::new(),
        };
        for boid in boids.iter().filter(|b| b.is_alive()) {
            let key = grid.cell_of(boid.position());
            grid.cells.entry(key).or_default().push(boid.index());
        }
        grid
    }

    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Floor division, so slightly negative coordinates land in cell -1.
    pub fn cell_of(&self, position: Vec2) -> CellKey {
        CellKey {
            x: (position.x / self.cell_size).floor() as i32,
            y: (position.y / self.cell_size).floor() as i32,
        }
    }

    pub fn occupied_cells(&self) -> usize {
        self.cells.len()
    }

    /// Every indexed boid in the 3x3 block around `boid`'s cell, except
    /// `boid` itself. Over-inclusive: callers still filter by distance.
    pub fn neighbors_of<'a>(
        &'a self,
        boid: &'a Boid,
        boids: &'a [Boid],
    ) -> impl Iterator<Item = &'a Boid> + 'a {
        let center = self.cell_of(boid.position());
        let own = boid.index();
        (-1..=1)
            .flat_map(move |dy| (-1..=1).map(move |dx| (dx, dy)))
            .filter_map(move |(dx, dy)| {
                self.cells.get(&CellKey {
                    x: center.x + dx,
                    y: center.y + dy,
                })
            })
            .flatten()
            .filter(move |&&idx| idx != own)
            .map(move |&idx| &boids[idx])
    }
}
