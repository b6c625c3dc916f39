//! The procedural iso-surface field: a cubic scalar grid repopulated every
//! frame with moving metaball sources, then triangulated into a renderable
//! mesh.
//!
//! # Invariants
//! - Blob positions are pure functions of (index, accumulated time); no
//!   hidden state leaks between frames.
//! - The grid is cleared and fully rewritten every frame; only its
//!   allocation persists across frames.
//! - A resolution change reallocates the grid before the next deposition.

pub mod animator;
pub mod grid;
pub mod mesher;

pub use animator::{blob_position, blob_strength, FieldAnimator, FieldConfig, SUBTRACT};
pub use grid::{BlobSource, ImplicitField};
pub use mesher::{NullTriangulator, SurfaceNetsTriangulator, TriMesh, Triangulator};
