// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Two-pass BREP payload decoder.
//!
//! Payloads are ASCII token streams in the CASCADE topology shape:
//!
//! ```text
//! DBRep_DrawableShape            (optional)
//! CASCADE Topology V1 ...        (magic; free text up to the first section)
//! Locations <n>
//!   <12 numbers each: 3x4 placement matrix, row-major>
//! Curves <n>
//!   <tag> <k> <k parameters>     tag 1/k 6 = line, tag 2/k 7 = circle
//! Surfaces <n>
//!   <tag> <k> <k parameters>     tag 1/k 6 = plane, tag 2/k 7 = cylinder
//! TShapes <n>
//!   <kind> <carrier> <location>  kind token; carrier = curve (edges) or
//!   <child refs> 0               surface (faces) index; refs are signed
//!                                1-based record indices, sign = orientation
//! <root>                         (optional 1-based index; default: last)
//! ```
//!
//! Decoding runs in two passes: pass one reads every record raw so that
//! forward references can resolve, pass two populates kinds, child lists
//! and carriers while validating index ranges and kind compatibility.
//! One record per index, parents share children by index — never by copy.
//! Unrecognized kind tokens decode as opaque records that keep their
//! place in the graph. A record reachable from itself is a decode
//! failure; shared DAG references are not.

use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::geometry::{CurveCarrier, Location, SurfaceCarrier};
use crate::graph::{ShapeRecord, TopologyGraph};
use crate::kinds::{ChildRef, CurveIndex, LocationIndex, Orientation, ShapeIndex, ShapeKind, SurfaceIndex};
use crate::lexer::Lexer;

/// Decodes one BREP shape payload into a topology graph.
pub fn decode(payload: &[u8]) -> Result<TopologyGraph> {
    let text = std::str::from_utf8(payload).map_err(|_| Error::NotText)?;
    let mut lx = Lexer::new(text);

    read_magic(&mut lx)?;

    let locations = decode_locations(&mut lx)?;
    lx.expect_keyword("Curves")?;
    let curves = decode_curves(&mut lx)?;
    lx.expect_keyword("Surfaces")?;
    let surfaces = decode_surfaces(&mut lx)?;
    lx.expect_keyword("TShapes")?;

    // Pass one: every declared record, raw.
    let raw = decode_raw_records(&mut lx)?;
    if raw.is_empty() {
        return Err(Error::EmptyShape);
    }

    let root = decode_root(&mut lx, raw.len())?;

    // Pass two: populate and validate.
    let records = populate(&raw, &curves, &surfaces, &locations)?;
    detect_cycles(&records)?;

    Ok(TopologyGraph {
        records,
        curves,
        surfaces,
        locations,
        root,
    })
}

/// Raw record from pass one.
struct RawRecord<'a> {
    kind_token: &'a str,
    carrier: u32,
    location: u32,
    children: Vec<i64>,
}

fn read_magic(lx: &mut Lexer) -> Result<()> {
    let mut first = lx.next_token().ok_or(Error::BadMagic)?;
    if first == "DBRep_DrawableShape" {
        first = lx.next_token().ok_or(Error::BadMagic)?;
    }
    if first != "CASCADE" || lx.next_token() != Some("Topology") {
        return Err(Error::BadMagic);
    }
    match lx.next_token() {
        Some(version) if version.starts_with('V') => {}
        _ => return Err(Error::BadMagic),
    }
    // Remaining header text (copyright notice) runs up to the first section.
    lx.skip_until("Locations")
}

fn decode_locations(lx: &mut Lexer) -> Result<Vec<Location>> {
    let count = lx.expect_u32("Locations count")?;
    let mut locations = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let mut matrix = [0.0; 12];
        for slot in &mut matrix {
            *slot = lx.expect_f64("location matrix entry")?;
        }
        locations.push(Location { matrix });
    }
    Ok(locations)
}

fn decode_curves(lx: &mut Lexer) -> Result<Vec<CurveCarrier>> {
    let count = lx.expect_u32("Curves count")?;
    let mut curves = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let (tag, params) =
            decode_carrier_params(lx, "curve tag", "curve parameter count", "curve parameter")?;
        curves.push(match (tag, params.as_slice()) {
            (1, &[ox, oy, oz, dx, dy, dz]) => CurveCarrier::Line {
                origin: [ox, oy, oz],
                direction: [dx, dy, dz],
            },
            (2, &[cx, cy, cz, nx, ny, nz, radius]) => CurveCarrier::Circle {
                center: [cx, cy, cz],
                normal: [nx, ny, nz],
                radius,
            },
            _ => CurveCarrier::Other { tag, params },
        });
    }
    Ok(curves)
}

fn decode_surfaces(lx: &mut Lexer) -> Result<Vec<SurfaceCarrier>> {
    let count = lx.expect_u32("Surfaces count")?;
    let mut surfaces = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let (tag, params) = decode_carrier_params(
            lx,
            "surface tag",
            "surface parameter count",
            "surface parameter",
        )?;
        surfaces.push(match (tag, params.as_slice()) {
            (1, &[ox, oy, oz, nx, ny, nz]) => SurfaceCarrier::Plane {
                origin: [ox, oy, oz],
                normal: [nx, ny, nz],
            },
            (2, &[ox, oy, oz, ax, ay, az, radius]) => SurfaceCarrier::Cylinder {
                origin: [ox, oy, oz],
                axis: [ax, ay, az],
                radius,
            },
            _ => SurfaceCarrier::Other { tag, params },
        });
    }
    Ok(surfaces)
}

/// Reads one `<tag> <k> <params…>` carrier block. The parameter count is
/// explicit so unknown carrier forms stay self-delimiting.
fn decode_carrier_params(
    lx: &mut Lexer,
    tag_what: &'static str,
    count_what: &'static str,
    param_what: &'static str,
) -> Result<(u32, Vec<f64>)> {
    let tag = lx.expect_u32(tag_what)?;
    let arity = lx.expect_u32(count_what)?;
    let mut params = Vec::with_capacity(arity as usize);
    for _ in 0..arity {
        params.push(lx.expect_f64(param_what)?);
    }
    Ok((tag, params))
}

fn decode_raw_records<'a>(lx: &mut Lexer<'a>) -> Result<Vec<RawRecord<'a>>> {
    let count = lx.expect_u32("TShapes count")?;
    let mut records = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let kind_token = lx.expect("sub-shape kind")?;
        let carrier = lx.expect_u32("carrier reference")?;
        let location = lx.expect_u32("location reference")?;

        let mut children = Vec::new();
        loop {
            let reference = lx.expect_i64("child reference")?;
            if reference == 0 {
                break;
            }
            children.push(reference);
        }

        records.push(RawRecord {
            kind_token,
            carrier,
            location,
            children,
        });
    }
    Ok(records)
}

fn decode_root(lx: &mut Lexer, count: usize) -> Result<ShapeIndex> {
    match lx.next_token() {
        None => Ok(ShapeIndex(count as u32 - 1)),
        Some(token) => {
            let index =
                lexical_core::parse::<u32>(token.as_bytes()).map_err(|_| Error::UnexpectedToken {
                    expected: "root shape reference",
                    found: token.to_string(),
                    line: lx.line(),
                })?;
            if index == 0 || index as usize > count {
                return Err(Error::IndexOutOfRange {
                    what: "root shape",
                    index,
                    count,
                });
            }
            Ok(ShapeIndex(index - 1))
        }
    }
}

fn populate(
    raw: &[RawRecord],
    curves: &[CurveCarrier],
    surfaces: &[SurfaceCarrier],
    locations: &[Location],
) -> Result<Vec<ShapeRecord>> {
    let count = raw.len();

    // Placeholder kinds for every declared index; forward references
    // resolve against this before any record is fully built.
    let kinds: Vec<ShapeKind> = raw
        .iter()
        .map(|r| ShapeKind::from_token(r.kind_token).unwrap_or(ShapeKind::Opaque))
        .collect();

    let mut records = Vec::with_capacity(count);
    for (pos, r) in raw.iter().enumerate() {
        let kind = kinds[pos];
        let record_id = pos as u32 + 1;

        let (curve, surface) = match kind {
            ShapeKind::Edge => (resolve_carrier(r.carrier, curves.len(), "curve")?, None),
            ShapeKind::Face => (
                None,
                resolve_carrier(r.carrier, surfaces.len(), "surface")?,
            ),
            // The carrier slot of an opaque record cannot be interpreted.
            ShapeKind::Opaque => (None, None),
            _ => {
                if r.carrier != 0 {
                    return Err(Error::UnexpectedCarrier {
                        record: record_id,
                        kind,
                        reference: r.carrier,
                    });
                }
                (None, None)
            }
        };
        let curve = curve.map(CurveIndex);
        let surface = surface.map(SurfaceIndex);

        let location = match r.location {
            0 => None,
            reference => {
                if reference as usize > locations.len() {
                    return Err(Error::IndexOutOfRange {
                        what: "location",
                        index: reference,
                        count: locations.len(),
                    });
                }
                Some(LocationIndex(reference - 1))
            }
        };

        let mut children: SmallVec<[ChildRef; 4]> = SmallVec::with_capacity(r.children.len());
        for &signed in &r.children {
            let magnitude = signed.unsigned_abs();
            if magnitude > count as u64 {
                return Err(Error::IndexOutOfRange {
                    what: "sub-shape",
                    index: magnitude.min(u32::MAX as u64) as u32,
                    count,
                });
            }
            let child_pos = (magnitude - 1) as usize;
            let child_kind = kinds[child_pos];
            if !kind.accepts_child(child_kind) {
                return Err(Error::IncompatibleChild {
                    record: record_id,
                    parent: kind,
                    child: child_kind,
                });
            }
            children.push(ChildRef {
                index: ShapeIndex(child_pos as u32),
                orientation: if signed < 0 {
                    Orientation::Reversed
                } else {
                    Orientation::Forward
                },
            });
        }

        records.push(ShapeRecord {
            kind,
            children,
            curve,
            surface,
            location,
        });
    }
    Ok(records)
}

fn resolve_carrier(reference: u32, pool: usize, what: &'static str) -> Result<Option<u32>> {
    match reference {
        0 => Ok(None),
        n if n as usize > pool => Err(Error::IndexOutOfRange {
            what,
            index: n,
            count: pool,
        }),
        n => Ok(Some(n - 1)),
    }
}

/// Depth-first search over child references; a gray-on-gray hit means a
/// record is reachable from itself (shared DAG edges land on black nodes
/// and pass).
fn detect_cycles(records: &[ShapeRecord]) -> Result<()> {
    const WHITE: u8 = 0;
    const GRAY: u8 = 1;
    const BLACK: u8 = 2;

    let mut state = vec![WHITE; records.len()];
    for start in 0..records.len() {
        if state[start] != WHITE {
            continue;
        }
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        state[start] = GRAY;
        while let Some(frame) = stack.last_mut() {
            let node = frame.0;
            if frame.1 < records[node].children.len() {
                let child = records[node].children[frame.1].index.0 as usize;
                frame.1 += 1;
                match state[child] {
                    WHITE => {
                        state[child] = GRAY;
                        stack.push((child, 0));
                    }
                    GRAY => return Err(Error::CyclicReference(child as u32 + 1)),
                    _ => {}
                }
            } else {
                state[node] = BLACK;
                stack.pop();
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const VERTEX_ONLY: &str = "\
DBRep_DrawableShape
CASCADE Topology V1, (c) Matra-Datavision
Locations 0
Curves 0
Surfaces 0
TShapes 1
Ve 0 0
0
";

    /// Two edges sharing both vertices, closed into a wire, bounded face.
    const SHARED_LOOP: &str = "\
CASCADE Topology V1
Locations 1
1 0 0 0 0 1 0 0 0 0 1 0
Curves 2
1 6 0 0 0 1 0 0
1 6 0 0 0 0 1 0
Surfaces 1
1 6 0 0 0 0 0 1
TShapes 6
Ve 0 0
0
Ve 0 0
0
Ed 1 0
1 2 0
Ed 2 0
2 -1 0
Wi 0 0
3 4 0
Fa 1 1
5 0
6
";

    #[test]
    fn decodes_minimal_vertex_payload() {
        let graph = decode(VERTEX_ONLY.as_bytes()).unwrap();
        assert_eq!(graph.record_count(), 1);
        assert_eq!(graph.root_record().kind, ShapeKind::Vertex);
        assert_eq!(graph.curve_count(), 0);
    }

    #[test]
    fn decodes_shared_loop_with_carriers() {
        let graph = decode(SHARED_LOOP.as_bytes()).unwrap();
        assert_eq!(graph.record_count(), 6);
        assert_eq!(graph.count_of(ShapeKind::Vertex), 2);
        assert_eq!(graph.count_of(ShapeKind::Edge), 2);
        assert_eq!(graph.root(), ShapeIndex(5));

        let face = graph.root_record();
        assert_eq!(face.kind, ShapeKind::Face);
        assert_eq!(face.surface, Some(SurfaceIndex(0)));
        assert_eq!(face.location, Some(LocationIndex(0)));
        assert!(matches!(
            graph.surface(SurfaceIndex(0)),
            Some(SurfaceCarrier::Plane { .. })
        ));

        let edge = graph.record(ShapeIndex(2)).unwrap();
        assert_eq!(edge.curve, Some(CurveIndex(0)));
        assert!(matches!(
            graph.curve(CurveIndex(0)),
            Some(CurveCarrier::Line { .. })
        ));
    }

    #[test]
    fn sharing_is_identity_not_copies() {
        let graph = decode(SHARED_LOOP.as_bytes()).unwrap();
        let first_edge = graph.children(ShapeIndex(2)).unwrap();
        let second_edge = graph.children(ShapeIndex(3)).unwrap();

        // Vertex 1 (payload index 2) appears in both edges.
        assert_eq!(first_edge[1].index, second_edge[0].index);
        let a = graph.record(first_edge[1].index).unwrap() as *const _;
        let b = graph.record(second_edge[0].index).unwrap() as *const _;
        assert_eq!(a, b);

        // The second edge traverses vertex 0 reversed.
        assert_eq!(second_edge[1].orientation, Orientation::Reversed);
        assert_eq!(first_edge[0].orientation, Orientation::Forward);
    }

    #[test]
    fn forward_references_resolve() {
        let payload = "\
CASCADE Topology V1
Locations 0
Curves 0
Surfaces 0
TShapes 2
Co 0 0
2 0
Ve 0 0
0
1
";
        let graph = decode(payload.as_bytes()).unwrap();
        assert_eq!(graph.root(), ShapeIndex(0));
        assert_eq!(graph.root_record().kind, ShapeKind::Compound);
        assert_eq!(
            graph.children(ShapeIndex(0)).unwrap()[0].index,
            ShapeIndex(1)
        );
    }

    #[test]
    fn unknown_kind_decodes_as_opaque() {
        let payload = "\
CASCADE Topology V1
Locations 0
Curves 0
Surfaces 0
TShapes 2
Zz 3 0
0
Co 0 0
1 0
2
";
        let graph = decode(payload.as_bytes()).unwrap();
        assert_eq!(graph.count_of(ShapeKind::Opaque), 1);
        // The opaque record keeps its index and stays referenceable.
        assert_eq!(
            graph.children(ShapeIndex(1)).unwrap()[0].index,
            ShapeIndex(0)
        );
    }

    #[test]
    fn child_index_out_of_range_fails() {
        let payload = "\
CASCADE Topology V1
Locations 0
Curves 0
Surfaces 0
TShapes 1
Ed 0 0
9 0
";
        assert!(matches!(
            decode(payload.as_bytes()),
            Err(Error::IndexOutOfRange {
                what: "sub-shape",
                index: 9,
                count: 1
            })
        ));
    }

    #[test]
    fn incompatible_child_kind_fails() {
        let payload = "\
CASCADE Topology V1
Locations 0
Curves 0
Surfaces 0
TShapes 2
Ve 0 0
0
Fa 0 0
1 0
";
        assert!(matches!(
            decode(payload.as_bytes()),
            Err(Error::IncompatibleChild {
                parent: ShapeKind::Face,
                child: ShapeKind::Vertex,
                ..
            })
        ));
    }

    #[test]
    fn cyclic_reference_fails() {
        let payload = "\
CASCADE Topology V1
Locations 0
Curves 0
Surfaces 0
TShapes 2
Co 0 0
2 0
Co 0 0
1 0
";
        assert!(matches!(
            decode(payload.as_bytes()),
            Err(Error::CyclicReference(_))
        ));
    }

    #[test]
    fn carrier_on_wrong_kind_fails() {
        let payload = "\
CASCADE Topology V1
Locations 0
Curves 1
1 6 0 0 0 1 0 0
Surfaces 0
TShapes 1
Ve 1 0
0
";
        assert!(matches!(
            decode(payload.as_bytes()),
            Err(Error::UnexpectedCarrier {
                kind: ShapeKind::Vertex,
                reference: 1,
                ..
            })
        ));
    }

    #[test]
    fn unknown_carrier_forms_are_kept_opaque() {
        let payload = "\
CASCADE Topology V1
Locations 0
Curves 1
7 4 1 2 3 4
Surfaces 0
TShapes 1
Ed 1 0
0
";
        let graph = decode(payload.as_bytes()).unwrap();
        match graph.curve(CurveIndex(0)).unwrap() {
            CurveCarrier::Other { tag, params } => {
                assert_eq!(*tag, 7);
                assert_eq!(params, &[1.0, 2.0, 3.0, 4.0]);
            }
            other => panic!("expected opaque carrier, got {other:?}"),
        }
    }

    #[test]
    fn rejects_bad_magic_and_non_text() {
        assert!(matches!(
            decode(b"Locations 0 Curves 0"),
            Err(Error::BadMagic)
        ));
        assert!(matches!(decode(&[0xff, 0xfe]), Err(Error::NotText)));
    }

    #[test]
    fn empty_record_section_fails() {
        let payload = "\
CASCADE Topology V1
Locations 0
Curves 0
Surfaces 0
TShapes 0
";
        assert!(matches!(decode(payload.as_bytes()), Err(Error::EmptyShape)));
    }

    #[test]
    fn explicit_root_out_of_range_fails() {
        let payload = "\
CASCADE Topology V1
Locations 0
Curves 0
Surfaces 0
TShapes 1
Ve 0 0
0
5
";
        assert!(matches!(
            decode(payload.as_bytes()),
            Err(Error::IndexOutOfRange {
                what: "root shape",
                ..
            })
        ));
    }

    #[test]
    fn truncated_payload_fails() {
        let payload = "\
CASCADE Topology V1
Locations 0
Curves 0
Surfaces 0
TShapes 2
Ve 0 0
0
";
        assert!(matches!(decode(payload.as_bytes()), Err(Error::Truncated(_))));
    }

    #[test]
    fn decode_is_deterministic() {
        let first = decode(SHARED_LOOP.as_bytes()).unwrap();
        let second = decode(SHARED_LOOP.as_bytes()).unwrap();
        assert_eq!(first, second);
    }
}
