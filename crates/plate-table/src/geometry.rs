use serde::{Deserialize, Serialize};

use crate::grid::CellCoord;

/// Hard cap on probes per axis.
pub const MAX_PROBES: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

/// Rectangle relative to the grid container's top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Bounds {
    pub origin: Point,
    pub size: Size,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            origin: Point { x, y },
            size: Size { width, height },
        }
    }

    pub fn left(&self) -> f32 {
        self.origin.x
    }

    pub fn top(&self) -> f32 {
        self.origin.y
    }

    pub fn right(&self) -> f32 {
        self.origin.x + self.size.width
    }

    pub fn bottom(&self) -> f32 {
        self.origin.y + self.size.height
    }

    /// Edges are inclusive on both ends.
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left()
            && point.x <= self.right()
            && point.y >= self.top()
            && point.y <= self.bottom()
    }
}

/// Measured geometry of a rendered grid, supplied by the host after layout.
pub trait GridLayout {
    /// Size of the grid container.
    fn size(&self) -> Size;
    fn row_count(&self) -> usize;
    fn column_count(&self) -> usize;
    /// Bounds of the 1-based cell, relative to the grid container.
    fn cell_bounds(&self, cell: CellCoord) -> Option<Bounds>;

    /// Bounds of a whole 1-based row, derived from its first cell.
    fn row_bounds(&self, row: usize) -> Option<Bounds> {
        let first = self.cell_bounds(CellCoord::new(row, 1))?;
        Some(Bounds::new(
            0.0,
            first.top(),
            self.size().width,
            first.size.height,
        ))
    }
}

/// Layout built from column widths and row heights, with edges precomputed
/// so `cell_bounds` is O(1).
#[derive(Debug, Clone, PartialEq)]
pub struct TrackLayout {
    column_edges: Vec<f32>,
    row_edges: Vec<f32>,
}

impl TrackLayout {
    pub fn new(column_widths: &[f32], row_heights: &[f32]) -> Self {
        Self {
            column_edges: edges(column_widths),
            row_edges: edges(row_heights),
        }
    }

    pub fn uniform(rows: usize, columns: usize, cell_width: f32, cell_height: f32) -> Self {
        Self::new(&vec![cell_width; columns], &vec![cell_height; rows])
    }
}

fn edges(tracks: &[f32]) -> Vec<f32> {
    let mut edges = Vec::with_capacity(tracks.len() + 1);
    let mut acc = 0.0;
    edges.push(acc);
    for track in tracks {
        acc += track.max(0.0);
        edges.push(acc);
    }
    edges
}

impl GridLayout for TrackLayout {
    fn size(&self) -> Size {
        Size {
            width: self.column_edges.last().copied().unwrap_or_default(),
            height: self.row_edges.last().copied().unwrap_or_default(),
        }
    }

    fn row_count(&self) -> usize {
        self.row_edges.len().saturating_sub(1)
    }

    fn column_count(&self) -> usize {
        self.column_edges.len().saturating_sub(1)
    }

    fn cell_bounds(&self, cell: CellCoord) -> Option<Bounds> {
        if cell.is_none() || cell.row > self.row_count() || cell.column > self.column_count() {
            return None;
        }
        let left = self.column_edges[cell.column - 1];
        let right = self.column_edges[cell.column];
        let top = self.row_edges[cell.row - 1];
        let bottom = self.row_edges[cell.row];
        Some(Bounds::new(left, top, right - left, bottom - top))
    }
}

/// Result of one axis search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AxisSearch {
    /// 1-based index of the last probed cell, `0` when nothing was probed.
    pub index: usize,
    pub probes: usize,
}

/// Binary search over `[0, count + 1]` (sentinels outside the grid) for the
/// cell whose `[start, end]` span contains `offset`.
///
/// Stops as soon as a probed span contains the offset, when the bounds meet,
/// or after [`MAX_PROBES`]. On non-convergence the last probe is returned.
pub fn search_axis(
    count: usize,
    offset: f32,
    span: impl Fn(usize) -> Option<(f32, f32)>,
) -> AxisSearch {
    let mut low = 0usize;
    let mut high = count + 1;
    let mut result = AxisSearch::default();

    while low + 1 < high && result.probes < MAX_PROBES {
        let mid = (low + high).div_ceil(2);
        let Some((start, end)) = span(mid) else {
            // Layout is out of step with the model.
            result.index = 0;
            break;
        };
        result.index = mid;
        result.probes += 1;

        if offset < start {
            high = mid;
        } else if offset > end {
            low = mid;
        } else {
            break;
        }
    }

    result
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HoverLookup {
    pub cell: CellCoord,
    pub row_probes: usize,
    pub column_probes: usize,
    /// The pointer was still inside the previously hovered cell.
    pub cached: bool,
}

/// Maps a pointer position (relative to the grid) to the hovered cell.
///
/// `previous` is the last hovered cell. It short-circuits the search while the
/// pointer stays inside it and supplies the answer for an axis that can't be
/// resolved (pointer before the grid's origin, nothing probed).
pub fn locate_hovered_cell(
    layout: &(impl GridLayout + ?Sized),
    pointer: Point,
    rows: usize,
    columns: usize,
    previous: CellCoord,
) -> HoverLookup {
    if (1..=rows).contains(&previous.row) && (1..=columns).contains(&previous.column) {
        if let Some(bounds) = layout.cell_bounds(previous) {
            if bounds.contains(pointer) {
                return HoverLookup {
                    cell: previous,
                    cached: true,
                    ..HoverLookup::default()
                };
            }
        }
    }

    let mut lookup = HoverLookup {
        cell: previous,
        ..HoverLookup::default()
    };

    if pointer.x >= 0.0 {
        let search = search_axis(columns, pointer.x, |column| {
            layout
                .cell_bounds(CellCoord::new(1, column))
                .map(|b| (b.left(), b.right()))
        });
        lookup.column_probes = search.probes;
        if search.index != 0 {
            lookup.cell.column = search.index;
        }
    }

    if pointer.y >= 0.0 {
        let search = search_axis(rows, pointer.y, |row| {
            layout
                .cell_bounds(CellCoord::new(row, 1))
                .map(|b| (b.top(), b.bottom()))
        });
        lookup.row_probes = search.probes;
        if search.index != 0 {
            lookup.cell.row = search.index;
        }
    }

    tracing::trace!(
        row = lookup.cell.row,
        column = lookup.cell.column,
        row_probes = lookup.row_probes,
        column_probes = lookup.column_probes,
        "resolved hovered cell"
    );
    lookup
}
