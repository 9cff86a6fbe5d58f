//! Wavefront OBJ loader for wireframes
//!
//! Only `v` and `f` records are read. Faces are turned into their boundary
//! edges and deduplicated, so the result is a plain edge list ready for line
//! drawing.
//!
//! The loader is lenient about face tokens: a token that is unparsable, `0`,
//! or out of range for the vertices seen so far is dropped on its own, and a
//! face left with fewer than two indices is ignored. Only an empty result or
//! an exhausted capacity fails the load.

use nom::{
    bytes::complete::tag,
    character::complete::{i64 as integer, space1},
    number::complete::float,
    sequence::pair,
    IResult,
};
use std::collections::HashSet;
use std::io::BufRead;

use crate::config::ParseLimits;
use crate::error::{Capacity, Error, Result};
use crate::geometry::{Edge, Mesh, Vertex};
use crate::normalize::normalize;

/// Parse and normalize an OBJ stream.
pub fn parse_obj<R: BufRead>(mut reader: R, name: &str, limits: &ParseLimits) -> Result<Mesh> {
    let mut builder = WireframeBuilder::new(*limits);
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        builder.feed_line(&String::from_utf8_lossy(&buf))?;
    }
    builder.finish(name)
}

/// Parse and normalize OBJ text held in memory.
pub fn parse_obj_str(text: &str, name: &str, limits: &ParseLimits) -> Result<Mesh> {
    parse_obj(text.as_bytes(), name, limits)
}

/// Incremental vertex/edge accumulator
struct WireframeBuilder {
    limits: ParseLimits,
    vertices: Vec<Vertex>,
    edges: Vec<Edge>,
    seen: HashSet<Edge>,
    face: Vec<u32>,
}

impl WireframeBuilder {
    fn new(limits: ParseLimits) -> Self {
        Self {
            limits,
            vertices: Vec::with_capacity(limits.max_vertices.min(1000)),
            edges: Vec::with_capacity(limits.max_edges.min(3000)),
            seen: HashSet::new(),
            face: Vec::with_capacity(8),
        }
    }

    fn feed_line(&mut self, line: &str) -> Result<()> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(());
        }

        if let Ok((_, vertex)) = vertex_record(line) {
            if !(vertex.x.is_finite() && vertex.y.is_finite() && vertex.z.is_finite()) {
                return Ok(());
            }
            if self.vertices.len() >= self.limits.max_vertices {
                return Err(Error::CapacityExceeded {
                    what: Capacity::Vertices,
                    limit: self.limits.max_vertices,
                });
            }
            self.vertices.push(vertex);
        } else if let Ok((tokens, _)) = face_keyword(line) {
            self.face.clear();
            let count = self.vertices.len();
            self.face.extend(
                tokens
                    .split_ascii_whitespace()
                    .filter_map(index_token)
                    .filter_map(|raw| resolve_index(raw, count)),
            );
            self.add_face_edges()?;
        }
        Ok(())
    }

    fn add_face_edges(&mut self) -> Result<()> {
        let n = self.face.len();
        if n < 2 {
            return Ok(());
        }
        for i in 0..n {
            let Some(edge) = Edge::new(self.face[i], self.face[(i + 1) % n]) else {
                continue;
            };
            if self.seen.insert(edge) {
                if self.edges.len() >= self.limits.max_edges {
                    return Err(Error::CapacityExceeded {
                        what: Capacity::Edges,
                        limit: self.limits.max_edges,
                    });
                }
                self.edges.push(edge);
            }
        }
        Ok(())
    }

    fn finish(mut self, name: &str) -> Result<Mesh> {
        if self.vertices.is_empty() || self.edges.is_empty() {
            return Err(Error::Malformed {
                name: name.to_owned(),
            });
        }
        normalize(&mut self.vertices);
        log::debug!(
            "parsed {name}: {} vertices, {} edges",
            self.vertices.len(),
            self.edges.len()
        );
        Ok(Mesh::from_parts(name.to_owned(), self.vertices, self.edges))
    }
}

/// `v x y z`, ignoring anything after the third coordinate
fn vertex_record(input: &str) -> IResult<&str, Vertex> {
    let (input, _) = pair(tag("v"), space1)(input)?;
    let (input, x) = float(input)?;
    let (input, _) = space1(input)?;
    let (input, y) = float(input)?;
    let (input, _) = space1(input)?;
    let (input, z) = float(input)?;
    Ok((input, Vertex::new(x, y, z)))
}

fn face_keyword(input: &str) -> IResult<&str, ()> {
    let (input, _) = pair(tag("f"), space1)(input)?;
    Ok((input, ()))
}

/// Leading vertex index of an `i`, `i/t`, `i//n` or `i/t/n` token
fn index_token(token: &str) -> Option<i64> {
    let index = token.split('/').next()?;
    integer::<_, nom::error::Error<&str>>(index)
        .ok()
        .map(|(_, value)| value)
}

/// Resolve a 1-based or negative (relative) OBJ index against the number of
/// vertices seen so far. `0` and out-of-range indices resolve to `None`.
pub fn resolve_index(raw: i64, vertex_count: usize) -> Option<u32> {
    let count = vertex_count as i64;
    let zero_based = match raw {
        0 => return None,
        k if k > 0 => k - 1,
        k => count + k,
    };
    (0..count).contains(&zero_based).then(|| zero_based as u32)
}
