//! Mesh data coming from the asset loader, and the bookkeeping that lets a
//! late load completion be dropped safely.

use crate::error::AssetError;
use glam::Vec3;

/// Indexed triangle mesh.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Axis-aligned bounds, or `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        let first = *self.positions.first()?;
        Some(
            self.positions
                .iter()
                .fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p))),
        )
    }

    /// Uniformly rescale and recentre so the largest horizontal extent equals
    /// `size` and the base sits at y = 0.
    pub fn fit_to(&mut self, size: f32) {
        let Some((lo, hi)) = self.bounds() else {
            return;
        };
        let extent = (hi.x - lo.x).max(hi.z - lo.z);
        if extent <= f32::EPSILON {
            return;
        }
        let scale = size / extent;
        let centre = Vec3::new((lo.x + hi.x) * 0.5, lo.y, (lo.z + hi.z) * 0.5);
        for p in &mut self.positions {
            *p = (*p - centre) * scale;
        }
    }

    /// Closed octahedron, used when nothing better is available.
    pub fn octahedron(radius: f32) -> Self {
        let r = radius;
        let positions = vec![
            Vec3::new(r, 0.0, 0.0),
            Vec3::new(-r, 0.0, 0.0),
            Vec3::new(0.0, r, 0.0),
            Vec3::new(0.0, -r, 0.0),
            Vec3::new(0.0, 0.0, r),
            Vec3::new(0.0, 0.0, -r),
        ];
        let indices = vec![
            0, 2, 4, 4, 2, 1, 1, 2, 5, 5, 2, 0, //
            4, 3, 0, 1, 3, 4, 5, 3, 1, 0, 3, 5,
        ];
        Self { positions, indices }
    }
}

/// Parse the vertex and face records of a Wavefront OBJ file.
///
/// Faces with more than three corners are fan-triangulated. Texture and
/// normal references (`v/vt/vn`) are ignored; negative indices count from the
/// end of the vertex list read so far.
pub fn parse_obj(text: &str) -> Result<MeshData, AssetError> {
    let mut mesh = MeshData::default();
    for (line_no, raw) in text.lines().enumerate() {
        let line_no = line_no + 1;
        let line = raw.split('#').next().unwrap_or("").trim();
        let mut parts = line.split_whitespace();
        match parts.next() {
            Some("v") => {
                let mut xyz = [0.0f32; 3];
                for c in &mut xyz {
                    let tok = parts.next().ok_or_else(|| AssetError::Parse {
                        line: line_no,
                        reason: "vertex needs three coordinates".into(),
                    })?;
                    *c = tok.parse().map_err(|_| AssetError::Parse {
                        line: line_no,
                        reason: format!("bad coordinate '{tok}'"),
                    })?;
                }
                mesh.positions.push(Vec3::from_array(xyz));
            }
            Some("f") => {
                let mut corners = Vec::with_capacity(4);
                for tok in parts {
                    corners.push(resolve_index(tok, mesh.positions.len(), line_no)?);
                }
                if corners.len() < 3 {
                    return Err(AssetError::Parse {
                        line: line_no,
                        reason: "face needs at least three corners".into(),
                    });
                }
                for k in 1..corners.len() - 1 {
                    mesh.indices
                        .extend_from_slice(&[corners[0], corners[k], corners[k + 1]]);
                }
            }
            _ => {}
        }
    }
    if mesh.indices.is_empty() {
        return Err(AssetError::EmptyMesh);
    }
    Ok(mesh)
}

fn resolve_index(tok: &str, vertex_count: usize, line: usize) -> Result<u32, AssetError> {
    let head = tok.split('/').next().unwrap_or("");
    let raw: i64 = head.parse().map_err(|_| AssetError::Parse {
        line,
        reason: format!("bad face index '{tok}'"),
    })?;
    let resolved = if raw > 0 {
        raw - 1
    } else if raw < 0 {
        vertex_count as i64 + raw
    } else {
        -1
    };
    if resolved < 0 || resolved >= vertex_count as i64 {
        return Err(AssetError::Parse {
            line,
            reason: format!("face index {raw} out of range"),
        });
    }
    Ok(resolved as u32)
}

/// Handle for an in-flight load. A ticket is only honoured while the scene
/// that requested it is still the same incarnation (`generation`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadTicket {
    pub scene: usize,
    pub generation: u64,
    pub path: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Installed,
    /// The load failed; procedural geometry is in place instead.
    FallbackInstalled,
    /// The scene was disposed (or rebuilt) after the request; nothing changed.
    Stale,
}
