//! Geometry primitives for wireframe rendering

use nalgebra::Point3;

/// A mesh vertex. Only positions are kept; wireframes need no normals.
pub type Vertex = Point3<f32>;

/// An undirected edge between two vertices, stored with the smaller index first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Edge {
    pub a: u32,
    pub b: u32,
}

impl Edge {
    /// Canonicalize a vertex pair. Returns `None` for self-loops.
    pub fn new(a: u32, b: u32) -> Option<Self> {
        match a.cmp(&b) {
            std::cmp::Ordering::Less => Some(Self { a, b }),
            std::cmp::Ordering::Greater => Some(Self { a: b, b: a }),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// A normalized wireframe mesh, immutable once built
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    name: String,
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
}

impl Mesh {
    /// Build a mesh from parts that already satisfy the mesh invariants.
    ///
    /// Edges must be canonical and reference existing vertices. The loader is
    /// the usual producer; this stays crate-private so a `Mesh` can't be
    /// built with dangling indices.
    pub(crate) fn from_parts(name: String, vertices: Vec<Vertex>, edges: Vec<Edge>) -> Self {
        debug_assert!(edges
            .iter()
            .all(|e| e.a < e.b && (e.b as usize) < vertices.len()));
        Self {
            name,
            vertices,
            edges,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }
}

/// OBJ text for the built-in unit cube
pub const CUBE_OBJ: &str = "# Unit cube
v -1 -1 -1
v  1 -1 -1
v  1  1 -1
v -1  1 -1
v -1 -1  1
v  1 -1  1
v  1  1  1
v -1  1  1
f 1 2 3 4
f 5 6 7 8
f 1 2 6 5
f 2 3 7 6
f 3 4 8 7
f 4 1 5 8
";
