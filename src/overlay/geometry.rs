use serde::Serialize;

use crate::models::{LandmarkPoint, LandmarkSet};

/// Tunables for the corner-bracket decoration, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayStyle {
    pub padding: f32,
    pub arm_length: f32,
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            padding: 20.0,
            arm_length: 20.0,
        }
    }
}

/// Pixel dimensions of the surface the overlay is drawn onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SurfaceSize {
    pub width: u32,
    pub height: u32,
}

impl SurfaceSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

/// Axis-aligned rectangle in pixel space.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct BoundingBox {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl BoundingBox {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    pub fn expand(&self, amount: f32) -> BoundingBox {
        BoundingBox {
            x: self.x - amount,
            y: self.y - amount,
            width: self.width + 2.0 * amount,
            height: self.height + 2.0 * amount,
        }
    }

    /// True when `other` lies entirely inside `self` with no shared edge.
    pub fn strictly_contains(&self, other: &BoundingBox) -> bool {
        self.x < other.x
            && self.y < other.y
            && self.right() > other.right()
            && self.bottom() > other.bottom()
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Corner {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

/// An "L" stroke: `points[1]` is the corner vertex, the other two are the
/// ends of its arms.
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct CornerBracket {
    pub corner: Corner,
    pub points: [Point; 3],
}

/// Draw instructions for one tracked face.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FaceOverlay {
    pub bounds: BoundingBox,
    pub padded: BoundingBox,
    pub brackets: [CornerBracket; 4],
}

/// Normalized bounding box `(min_x, min_y, max_x, max_y)` of a landmark set.
pub fn normalized_bounds(landmarks: &[LandmarkPoint]) -> Option<(f32, f32, f32, f32)> {
    let first = landmarks.first()?;
    let init = (first.x, first.y, first.x, first.y);

    Some(
        landmarks
            .iter()
            .fold(init, |(min_x, min_y, max_x, max_y), p| {
                (min_x.min(p.x), min_y.min(p.y), max_x.max(p.x), max_y.max(p.y))
            }),
    )
}

/// Turns one face's landmarks into a padded box and its four corner brackets.
///
/// Returns `None` for an empty set; the caller is expected to clear whatever
/// overlay it rendered last.
pub fn face_overlay(
    landmarks: &[LandmarkPoint],
    surface: SurfaceSize,
    style: &OverlayStyle,
) -> Option<FaceOverlay> {
    let (min_x, min_y, max_x, max_y) = normalized_bounds(landmarks)?;
    let w = surface.width as f32;
    let h = surface.height as f32;

    let bounds = BoundingBox {
        x: min_x * w,
        y: min_y * h,
        width: (max_x - min_x) * w,
        height: (max_y - min_y) * h,
    };
    let padded = bounds.expand(style.padding);

    Some(FaceOverlay {
        bounds,
        padded,
        brackets: corner_brackets(&padded, style.arm_length),
    })
}

/// One overlay per face, in tracker order. Faces with no points are skipped.
pub fn compute_overlays(
    faces: &[LandmarkSet],
    surface: SurfaceSize,
    style: &OverlayStyle,
) -> Vec<FaceOverlay> {
    faces
        .iter()
        .filter_map(|face| face_overlay(face, surface, style))
        .collect()
}

fn corner_brackets(b: &BoundingBox, arm: f32) -> [CornerBracket; 4] {
    let (left, top, right, bottom) = (b.x, b.y, b.right(), b.bottom());
    let pt = |x: f32, y: f32| Point { x, y };

    [
        CornerBracket {
            corner: Corner::TopLeft,
            points: [pt(left, top + arm), pt(left, top), pt(left + arm, top)],
        },
        CornerBracket {
            corner: Corner::TopRight,
            points: [pt(right - arm, top), pt(right, top), pt(right, top + arm)],
        },
        CornerBracket {
            corner: Corner::BottomLeft,
            points: [pt(left, bottom - arm), pt(left, bottom), pt(left + arm, bottom)],
        },
        CornerBracket {
            corner: Corner::BottomRight,
            points: [pt(right - arm, bottom), pt(right, bottom), pt(right, bottom - arm)],
        },
    ]
}
