use crate::core::models::axis::{Axis, PairRelation};
use crate::core::models::segment::{BackboneSegment, Orientation, SegmentKind};
use crate::core::models::sheet::Sheet;
use crate::core::utils::geometry::average_points;
use crate::engine::config::HelixOrientationFallback;
use nalgebra::{Point3, Vector3};
use std::collections::VecDeque;
use tracing::{debug, instrument, trace};

/// Labels the strands of one sheet and returns the sheet axis.
///
/// Starting from each unlabelled strand in sequence order (seeded up), labels spread
/// through the partnership graph: a parallel partner gets the same label and an
/// antiparallel partner the opposite one. Strands that already carry a label keep it.
pub fn orient_sheet(sheet: &Sheet, segments: &mut [BackboneSegment]) -> Axis {
    for seed in sheet.members() {
        if segments[seed.0].orientation.is_known() {
            continue;
        }
        segments[seed.0].orientation = Orientation::Up;

        let mut queue = VecDeque::from([seed]);
        while let Some(current) = queue.pop_front() {
            let label = segments[current.0].orientation;
            for neighbour in sheet.neighbours(current) {
                if segments[neighbour.0].orientation.is_known() {
                    continue;
                }
                let relation = segments[current.0].axis.relation_to(&segments[neighbour.0].axis);
                let assigned = match relation {
                    PairRelation::Parallel => label,
                    PairRelation::Antiparallel => label.opposite(),
                };
                trace!(from = %current, to = %neighbour, ?relation, %assigned, "Orienting strand");
                segments[neighbour.0].orientation = assigned;
                queue.push_back(neighbour);
            }
        }
    }

    let direction = sheet
        .pairs()
        .fold(Vector3::zeros(), |sum, (_, partner)| {
            let segment = &segments[partner.0];
            match segment.orientation {
                Orientation::Down => sum - segment.axis.direction,
                _ => sum + segment.axis.direction,
            }
        });
    let centres: Vec<Point3<f64>> = sheet
        .members()
        .into_iter()
        .map(|id| segments[id.0].axis.centroid)
        .collect();
    let centroid = average_points(&centres).unwrap_or_else(Point3::origin);
    Axis::new(centroid, direction)
}

/// Up when the segment axis is within 90 degrees of `reference`, down otherwise.
pub fn orientation_against(segment: &BackboneSegment, reference: &Axis) -> Orientation {
    if segment.axis.angle_to(reference) > 90.0 {
        Orientation::Down
    } else {
        Orientation::Up
    }
}

fn chain_axis(segments: &[BackboneSegment]) -> Option<Axis> {
    let centres: Vec<Point3<f64>> = segments
        .iter()
        .filter(|s| !s.kind.is_terminus())
        .map(|s| s.axis.centroid)
        .collect();
    Axis::fit(&centres).filter(|axis| !axis.is_degenerate())
}

fn orient_non_strands(segments: &mut [BackboneSegment], reference: &Axis) {
    for segment in segments
        .iter_mut()
        .filter(|s| s.kind != SegmentKind::Strand && !s.kind.is_terminus())
    {
        segment.orientation = orientation_against(segment, reference);
    }
}

/// Assigns orientations to every segment and stores each sheet's axis.
///
/// With exactly one sheet, non-strand segments are oriented against its axis;
/// otherwise they follow `fallback`. Termini always point up.
#[instrument(skip_all, name = "orientation_assignment")]
pub fn run(
    segments: &mut [BackboneSegment],
    sheets: &mut [Sheet],
    fallback: HelixOrientationFallback,
) {
    for sheet in sheets.iter_mut() {
        let axis = orient_sheet(sheet, segments);
        sheet.axis = Some(axis);
    }

    match (sheets, fallback) {
        ([only], _) => {
            if let Some(axis) = only.axis {
                orient_non_strands(segments, &axis);
            }
        }
        (_, HelixOrientationFallback::ChainAxis) => {
            if let Some(axis) = chain_axis(segments) {
                orient_non_strands(segments, &axis);
            }
        }
        (_, HelixOrientationFallback::Unresolved) => {}
    }

    for segment in segments.iter_mut().filter(|s| s.kind.is_terminus()) {
        segment.orientation = Orientation::Up;
    }

    debug!(
        up = segments.iter().filter(|s| s.orientation == Orientation::Up).count(),
        down = segments.iter().filter(|s| s.orientation == Orientation::Down).count(),
        "Orientation assignment finished."
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::ids::SegmentId;
    use crate::core::models::segment::TerminusEnd;

    fn segment(kind: SegmentKind, from: Point3<f64>, to: Point3<f64>) -> BackboneSegment {
        let mut s = BackboneSegment::terminus(TerminusEnd::N, from);
        s.kind = kind;
        s.orientation = Orientation::Unknown;
        s.axis = Axis::from_endpoints(from, to);
        s
    }

    fn up(x: f64) -> BackboneSegment {
        segment(
            SegmentKind::Strand,
            Point3::new(x, 0.0, 0.0),
            Point3::new(x, 0.0, 10.0),
        )
    }

    fn down(x: f64) -> BackboneSegment {
        segment(
            SegmentKind::Strand,
            Point3::new(x, 0.0, 10.0),
            Point3::new(x, 0.0, 0.0),
        )
    }

    fn helix(from_z: f64, to_z: f64) -> BackboneSegment {
        segment(
            SegmentKind::Helix,
            Point3::new(0.0, 10.0, from_z),
            Point3::new(0.0, 10.0, to_z),
        )
    }

    fn terminus(end: TerminusEnd) -> BackboneSegment {
        BackboneSegment::terminus(end, Point3::origin())
    }

    #[test]
    fn meander_alternates_orientations() {
        let mut segments = vec![up(0.0), down(4.8), up(9.6)];
        let mut sheet = Sheet::with_pair(1, SegmentId(0), SegmentId(1));
        sheet.add_pair(SegmentId(1), SegmentId(2));

        let axis = orient_sheet(&sheet, &mut segments);
        let labels: Vec<_> = segments.iter().map(|s| s.orientation).collect();
        assert_eq!(labels, vec![Orientation::Up, Orientation::Down, Orientation::Up]);
        // Partners: segment 1 (down, -z flipped to +z) and segment 2 (up, +z).
        assert!((axis.direction - Vector3::z()).norm() < 1e-12);
        assert!((axis.centroid - Point3::new(4.8, 0.0, 5.0)).norm() < 1e-12);
    }

    #[test]
    fn labels_spread_from_later_keys_back_to_earlier_strands() {
        // Strand 0 only pairs through strand 2, which is a key of a later pair.
        let mut segments = vec![up(0.0), down(9.6), down(4.8)];
        let mut sheet = Sheet::with_pair(1, SegmentId(1), SegmentId(2));
        sheet.add_pair(SegmentId(0), SegmentId(2));

        orient_sheet(&sheet, &mut segments);
        assert_eq!(segments[0].orientation, Orientation::Up);
        assert_eq!(segments[2].orientation, Orientation::Down);
        assert_eq!(segments[1].orientation, Orientation::Down);
    }

    #[test]
    fn single_sheet_orients_helices_against_sheet_axis() {
        let mut segments = vec![
            terminus(TerminusEnd::N),
            up(0.0),
            helix(10.0, 0.0),
            up(4.8),
            terminus(TerminusEnd::C),
        ];
        let mut sheets = vec![Sheet::with_pair(1, SegmentId(1), SegmentId(3))];
        run(&mut segments, &mut sheets, HelixOrientationFallback::Unresolved);

        assert_eq!(segments[1].orientation, Orientation::Up);
        assert_eq!(segments[3].orientation, Orientation::Up);
        assert_eq!(segments[2].orientation, Orientation::Down);
        assert_eq!(segments[0].orientation, Orientation::Up);
        assert_eq!(segments[4].orientation, Orientation::Up);
        assert!(sheets[0].axis.is_some());
    }

    #[test]
    fn without_a_single_sheet_helices_stay_unknown_by_default() {
        let mut segments = vec![
            terminus(TerminusEnd::N),
            helix(0.0, 10.0),
            helix(10.0, 0.0),
            terminus(TerminusEnd::C),
        ];
        run(&mut segments, &mut [], HelixOrientationFallback::Unresolved);
        assert_eq!(segments[1].orientation, Orientation::Unknown);
        assert_eq!(segments[2].orientation, Orientation::Unknown);
        assert_eq!(segments[3].orientation, Orientation::Up);
    }

    #[test]
    fn chain_axis_fallback_orients_helices() {
        let mut segments = vec![
            terminus(TerminusEnd::N),
            segment(
                SegmentKind::Helix,
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(10.0, 0.0, 0.0),
            ),
            segment(
                SegmentKind::Helix,
                Point3::new(30.0, 0.0, 0.0),
                Point3::new(20.0, 0.0, 0.0),
            ),
            terminus(TerminusEnd::C),
        ];
        run(&mut segments, &mut [], HelixOrientationFallback::ChainAxis);
        assert_eq!(segments[1].orientation, Orientation::Up);
        assert_eq!(segments[2].orientation, Orientation::Down);
    }

    #[test]
    fn two_sheets_orient_only_their_strands() {
        let mut segments = vec![up(0.0), down(4.8), helix(0.0, 10.0), up(50.0), up(54.8)];
        let mut sheets = vec![
            Sheet::with_pair(1, SegmentId(0), SegmentId(1)),
            Sheet::with_pair(2, SegmentId(3), SegmentId(4)),
        ];
        run(&mut segments, &mut sheets, HelixOrientationFallback::Unresolved);
        assert_eq!(segments[1].orientation, Orientation::Down);
        assert_eq!(segments[4].orientation, Orientation::Up);
        assert_eq!(segments[2].orientation, Orientation::Unknown);
        assert!(sheets.iter().all(|s| s.axis.is_some()));
    }
}
