// Decoded packing: a height x width array of item labels

use super::packing::{BinSpec, ItemTypeId, PackingSpec};
use super::placement::Placement;

/// Label used for uncovered cells in text output
pub const EMPTY_LABEL: &str = ".";

/// Read-only placement grid produced by the solution decoder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Option<ItemTypeId>>,
    placed: Vec<Placement>,
}

impl Grid {
    pub(crate) fn empty(bin: &BinSpec) -> Self {
        Self {
            width: bin.width,
            height: bin.height,
            cells: vec![None; bin.cells()],
            placed: Vec::new(),
        }
    }

    /// Write `placement` over its footprint; later stamps overwrite earlier ones.
    pub(crate) fn stamp(&mut self, placement: Placement) {
        for (row, col) in placement.cells() {
            if row < self.height && col < self.width {
                self.cells[row * self.width + col] = Some(placement.item);
            }
        }
        self.placed.push(placement);
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, row: usize, col: usize) -> Option<ItemTypeId> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.cells[row * self.width + col]
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Option<ItemTypeId>]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Selected placements in stamping order.
    pub fn placed(&self) -> &[Placement] {
        &self.placed
    }

    pub fn covered_cells(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.covered_cells() == 0
    }

    pub fn cells_of(&self, item: ItemTypeId) -> usize {
        self.cells.iter().filter(|c| **c == Some(item)).count()
    }

    /// Number of selected placements covering `(row, col)`.
    pub fn coverage_count(&self, row: usize, col: usize) -> usize {
        self.placed.iter().filter(|p| p.covers(row, col)).count()
    }

    /// Objective recomputed from the labels alone.
    ///
    /// Instances per item type are inferred as labelled cells over item area,
    /// which is exact when no two placements overlap.
    pub fn objective_value(&self, spec: &PackingSpec) -> f64 {
        let rewards = spec.rewards();
        let covered = self.covered_cells() as f64;
        let uncovered = (self.cells.len() - self.covered_cells()) as f64;
        let cost: f64 = spec
            .items()
            .iter()
            .map(|item| (self.cells_of(item.id) / item.area()) as f64 * item.unit_cost)
            .sum();
        covered * rewards.reward + uncovered * rewards.penalty - cost
    }

    /// One string per row, `.` for empty cells, labels padded to equal width.
    pub fn label_rows(&self) -> Vec<String> {
        let cell_width = self
            .cells
            .iter()
            .flatten()
            .map(|id| id.label().len())
            .max()
            .unwrap_or(1);
        let separator = if cell_width > 1 { " " } else { "" };

        self.rows()
            .map(|row| {
                row.iter()
                    .map(|cell| {
                        let label = cell.map_or_else(|| EMPTY_LABEL.to_string(), |id| id.label());
                        format!("{:>width$}", label, width = cell_width)
                    })
                    .collect::<Vec<_>>()
                    .join(separator)
            })
            .collect()
    }
}
