//! Wavefront OBJ mesh I/O.
//!
//! Only the subset needed for closed triangular shape models is supported:
//! `v` lines with three coordinates and `f` lines with exactly three 1-based
//! vertex references. Texture and normal indices (`f a/b/c`) are accepted
//! and ignored; every other record type is skipped.

use crate::Point;
use anyhow::{Context, Result, anyhow, bail};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Reads a triangular mesh from an ASCII OBJ file.
///
/// Node coordinates are multiplied by `scale` (shape models are often
/// published in kilometers; pass 1000.0 to get meters). Face indices are
/// returned 0-based.
pub fn read_obj(path: &Path, scale: f64) -> Result<(Vec<Point>, Vec<[usize; 3]>)> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut nodes: Vec<Point> = Vec::new();
    let mut faces: Vec<[usize; 3]> = Vec::new();

    for (lineno, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("Read error in {}", path.display()))?;
        let mut tokens = line.split_whitespace();
        match tokens.next() {
            Some("v") => {
                let mut coord = |name: &str| -> Result<f64> {
                    tokens
                        .next()
                        .ok_or_else(|| anyhow!("Missing {name} coordinate on line {}", lineno + 1))?
                        .parse::<f64>()
                        .with_context(|| format!("Bad {name} coordinate on line {}", lineno + 1))
                };
                let x = coord("x")?;
                let y = coord("y")?;
                let z = coord("z")?;
                nodes.push(Point::new(x, y, z).scale(scale));
            }
            Some("f") => {
                let refs: Vec<&str> = tokens.collect();
                if refs.len() != 3 {
                    bail!(
                        "Face on line {} has {} vertices, only triangles are supported",
                        lineno + 1,
                        refs.len()
                    );
                }
                let mut face = [0usize; 3];
                for (slot, token) in face.iter_mut().zip(&refs) {
                    // "a", "a/b", "a//c" and "a/b/c" all start with the
                    // vertex index
                    let index_str = token.split('/').next().unwrap_or_default();
                    let index: usize = index_str.parse().with_context(|| {
                        format!("Bad face index {token:?} on line {}", lineno + 1)
                    })?;
                    if index == 0 {
                        bail!("Face index 0 on line {} (OBJ indices are 1-based)", lineno + 1);
                    }
                    *slot = index - 1;
                }
                faces.push(face);
            }
            _ => {} // comments, normals, groups, materials
        }
    }

    Ok((nodes, faces))
}

/// Writes a triangular mesh to an ASCII OBJ file.
pub fn write_obj(path: &Path, nodes: &[Point], faces: &[[usize; 3]]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("Failed to create file: {}", path.display()))?;
    let mut writer = BufWriter::new(file);

    for node in nodes {
        writeln!(writer, "v {} {} {}", node.x, node.y, node.z)?;
    }
    for face in faces {
        writeln!(writer, "f {} {} {}", face[0] + 1, face[1] + 1, face[2] + 1)?;
    }

    Ok(())
}
