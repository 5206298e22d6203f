// Placement enumeration: every anchor at which an item type fits inside the bin

use super::packing::{BinSpec, ItemType, ItemTypeId, PackingSpec};
use std::ops::Range;

/// One candidate instance of an item type anchored at its top-left cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Placement {
    pub item: ItemTypeId,
    pub row: usize,
    pub col: usize,
    pub width: usize,
    pub height: usize,
}

impl Placement {
    pub fn covers(&self, row: usize, col: usize) -> bool {
        self.row <= row && row < self.row + self.height && self.col <= col && col < self.col + self.width
    }

    /// Cells of the footprint in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (self.row..self.row + self.height)
            .flat_map(move |r| (self.col..self.col + self.width).map(move |c| (r, c)))
    }

    pub fn variable_name(&self) -> String {
        format!("x_{}_{}_{}", self.item.index(), self.row, self.col)
    }
}

/// Number of anchor rows and columns for `item` in `bin`; zero when it does not fit.
fn anchor_extent(bin: &BinSpec, item: &ItemType) -> (usize, usize) {
    if !item.fits_in(bin) {
        return (0, 0);
    }
    (bin.height - item.height + 1, bin.width - item.width + 1)
}

/// Lazy, restartable sequence of anchors `(row, col)` in row-major order.
pub fn anchors(bin: &BinSpec, item: &ItemType) -> impl Iterator<Item = (usize, usize)> + Clone {
    let (rows, cols) = anchor_extent(bin, item);
    (0..rows).flat_map(move |r| (0..cols).map(move |c| (r, c)))
}

/// Placements of one item type, built from [`anchors`].
pub fn placements_for<'a>(
    bin: &'a BinSpec,
    item: &'a ItemType,
) -> impl Iterator<Item = Placement> + 'a {
    anchors(bin, item).map(move |(row, col)| Placement {
        item: item.id,
        row,
        col,
        width: item.width,
        height: item.height,
    })
}

/// Stable index of every placement variable across all item types.
///
/// Placement `k` of the index is column `k` of the optimization problem.
/// Order: item type, then anchor row, then anchor column.
#[derive(Debug, Clone)]
pub struct PlacementIndex {
    bin: BinSpec,
    placements: Vec<Placement>,
    by_item: Vec<Range<usize>>,
    anchor_cols: Vec<usize>,
}

impl PlacementIndex {
    pub fn build(spec: &PackingSpec) -> Self {
        let bin = *spec.bin();
        let mut placements = Vec::new();
        let mut by_item = Vec::with_capacity(spec.items().len());
        let mut anchor_cols = Vec::with_capacity(spec.items().len());

        for item in spec.items() {
            let start = placements.len();
            placements.extend(placements_for(&bin, item));
            by_item.push(start..placements.len());
            anchor_cols.push(anchor_extent(&bin, item).1);
        }

        Self {
            bin,
            placements,
            by_item,
            anchor_cols,
        }
    }

    pub fn len(&self) -> usize {
        self.placements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    pub fn placements(&self) -> &[Placement] {
        &self.placements
    }

    pub fn get(&self, index: usize) -> Option<&Placement> {
        self.placements.get(index)
    }

    /// Variable indices of all placements of `item`.
    pub fn of_item(&self, item: ItemTypeId) -> Range<usize> {
        self.by_item.get(item.index()).cloned().unwrap_or(0..0)
    }

    /// Position of the placement keyed by `(item, row, col)`, if it is legal.
    pub fn position(&self, item: ItemTypeId, row: usize, col: usize) -> Option<usize> {
        let range = self.by_item.get(item.index())?;
        let cols = self.anchor_cols[item.index()];
        if cols == 0 || col >= cols {
            return None;
        }
        let index = range.start + row * cols + col;
        range.contains(&index).then_some(index)
    }

    /// Variable indices of every placement whose footprint covers `(row, col)`.
    pub fn covering(&self, row: usize, col: usize) -> Vec<usize> {
        let mut covering = Vec::new();
        if row >= self.bin.height || col >= self.bin.width {
            return covering;
        }
        for (k, range) in self.by_item.iter().enumerate() {
            let Some(first) = range.clone().next() else {
                continue;
            };
            let Placement { width, height, .. } = self.placements[first];
            let cols = self.anchor_cols[k];
            let rows = range.len() / cols;

            let row_lo = (row + 1).saturating_sub(height);
            let row_hi = row.min(rows - 1);
            let col_lo = (col + 1).saturating_sub(width);
            let col_hi = col.min(cols - 1);
            if row_lo > row_hi || col_lo > col_hi {
                continue;
            }
            for di in row_lo..=row_hi {
                for dj in col_lo..=col_hi {
                    covering.push(range.start + di * cols + dj);
                }
            }
        }
        covering
    }
}
