pub mod geometry;

pub use geometry::{
    compute_overlays, face_overlay, BoundingBox, Corner, CornerBracket, FaceOverlay,
    OverlayStyle, Point, SurfaceSize,
};
