/// Tile collision for a single body.
///
/// Cells are visited column by column (left to right), top to bottom within
/// a column. Each solid cell corrects the body on its own, so a later cell can
/// override an earlier cell's push in the same pass. Level layouts rely on
/// this order; do not merge the corrections.
use crate::entities::{Body, Cell, Rect};
use crate::tilemap::Tilemap;

/// What the pass touched besides solid cells. The caller applies damage and
/// level transitions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CollisionReport {
    /// One per overlapping hazard cell.
    pub hazard_hits: u32,
    pub reached_goal: bool,
}

pub fn resolve_tiles(body: &mut Body, tilemap: &Tilemap) -> CollisionReport {
    // The scanned range comes from the box before any correction.
    let (left, right) = Tilemap::tile_span(body.x, body.w);
    let (top, bottom) = Tilemap::tile_span(body.y, body.h);

    let mut report = CollisionReport::default();
    for col in left..=right {
        for row in top..=bottom {
            let cell_rect = Tilemap::cell_rect(col, row);
            match tilemap.cell_at(col, row) {
                Cell::Empty => {}
                Cell::Solid => push_out(body, &cell_rect),
                Cell::Hazard => {
                    if body.rect().intersects(&cell_rect) {
                        report.hazard_hits += 1;
                    }
                }
                Cell::Goal => {
                    if cell_rect.contains_point(body.rect().center()) {
                        report.reached_goal = true;
                    }
                }
            }
        }
    }
    report
}

/// Minimum-translation push along the axis with the smaller overlap.
fn push_out(body: &mut Body, tile: &Rect) {
    let rect = body.rect();
    if !rect.intersects(tile) {
        return;
    }
    let overlap_x = (rect.right() - tile.x).min(tile.right() - rect.x);
    let overlap_y = (rect.bottom() - tile.y).min(tile.bottom() - rect.y);

    if overlap_y < overlap_x {
        if rect.y < tile.y {
            body.y = tile.y - body.h;
            body.grounded = true;
        } else {
            body.y = tile.bottom();
        }
        body.vy = 0.0;
    } else {
        if rect.x < tile.x {
            body.x = tile.x - body.w;
        } else {
            body.x = tile.right();
        }
        body.vx = 0.0;
    }
}
