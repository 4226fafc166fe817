use crate::core::models::edge::{Edge, EdgeTag};
use crate::core::models::ids::SegmentId;
use crate::core::models::segment::BackboneSegment;
use crate::core::models::sheet::Sheet;
use crate::core::utils::geometry::{average_points, chirality};
use nalgebra::Point3;
use tracing::{debug, instrument, trace};

/// Hand of the connection between two same-orientation strands of a sheet.
///
/// Returns `None` unless at least one and fewer than `max_separation` structured
/// segments lie between the strands and both strands share a known orientation.
pub fn connection_hand(
    segments: &[BackboneSegment],
    a: SegmentId,
    b: SegmentId,
    up: &nalgebra::Vector3<f64>,
    max_separation: usize,
) -> Option<Edge> {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    let (start, end) = (segments.get(first.0)?, segments.get(second.0)?);

    let between: Vec<Point3<f64>> = segments
        .get(first.0 + 1..second.0)?
        .iter()
        .filter(|s| s.kind.is_structured() && !s.kind.is_terminus())
        .map(|s| s.axis.centroid)
        .collect();
    if between.is_empty() || between.len() >= max_separation {
        return None;
    }
    if !start.orientation.is_known() || start.orientation != end.orientation {
        return None;
    }

    let middle = average_points(&between)?;
    let hand = chirality(&start.axis.centroid, &middle, &end.axis.centroid, up);
    trace!(%first, %second, %hand, "Connection hand");
    Some(Edge::new(first, second, EdgeTag::Chirality(hand)))
}

/// Chirality edges for every qualifying partnership pair, sheet by sheet.
#[instrument(skip_all, name = "chirality_assignment")]
pub fn run(segments: &[BackboneSegment], sheets: &[Sheet], max_separation: usize) -> Vec<Edge> {
    let mut edges = Vec::new();
    for sheet in sheets {
        let Some(axis) = sheet.axis else {
            continue;
        };
        edges.extend(sheet.pairs().filter_map(|(key, partner)| {
            connection_hand(segments, key, partner, &axis.direction, max_separation)
        }));
    }
    debug!(edges = edges.len(), "Chirality assignment finished.");
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::axis::Axis;
    use crate::core::models::segment::{Orientation, SegmentKind, TerminusEnd};
    use crate::core::utils::geometry::Handedness;
    use nalgebra::Vector3;

    fn segment(kind: SegmentKind, centre: Point3<f64>, orientation: Orientation) -> BackboneSegment {
        let mut s = BackboneSegment::terminus(TerminusEnd::N, centre);
        s.kind = kind;
        s.orientation = orientation;
        s.axis = Axis::new(centre, Vector3::z());
        s
    }

    fn beta_alpha_beta(helix_y: f64, loops: usize) -> Vec<BackboneSegment> {
        let mut segments = vec![BackboneSegment::terminus(TerminusEnd::N, Point3::origin())];
        segments.push(segment(SegmentKind::Strand, Point3::new(0.0, 0.0, 5.0), Orientation::Up));
        for _ in 0..loops {
            segments.push(segment(
                SegmentKind::UnstructuredLoop,
                Point3::new(100.0, 100.0, 100.0),
                Orientation::Unknown,
            ));
        }
        segments.push(segment(
            SegmentKind::Helix,
            Point3::new(2.4, helix_y, 5.0),
            Orientation::Down,
        ));
        segments.push(segment(SegmentKind::Strand, Point3::new(4.8, 0.0, 5.0), Orientation::Up));
        segments.push(BackboneSegment::terminus(TerminusEnd::C, Point3::origin()));
        segments
    }

    fn sheet_between(a: usize, b: usize) -> Sheet {
        let mut sheet = Sheet::with_pair(1, SegmentId(a), SegmentId(b));
        sheet.axis = Some(Axis::new(Point3::new(2.4, 0.0, 5.0), Vector3::z()));
        sheet
    }

    #[test]
    fn right_and_left_handed_crossovers() {
        let right = beta_alpha_beta(-10.0, 0);
        let edges = run(&right, &[sheet_between(1, 3)], 11);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].tags, vec![EdgeTag::Chirality(Handedness::Right)]);
        assert_eq!((edges[0].first, edges[0].second), (SegmentId(1), SegmentId(3)));

        let left = beta_alpha_beta(10.0, 0);
        let edges = run(&left, &[sheet_between(1, 3)], 11);
        assert_eq!(edges[0].tags, vec![EdgeTag::Chirality(Handedness::Left)]);
    }

    #[test]
    fn loops_are_ignored_when_counting_and_averaging() {
        let segments = beta_alpha_beta(-10.0, 2);
        let edges = run(&segments, &[sheet_between(1, 5)], 11);
        assert_eq!(edges[0].tags, vec![EdgeTag::Chirality(Handedness::Right)]);
    }

    #[test]
    fn adjacent_or_differently_oriented_strands_get_no_edge() {
        let mut segments = beta_alpha_beta(-10.0, 0);
        // Directly adjacent strands: nothing structured in between.
        segments.remove(2);
        assert!(run(&segments, &[sheet_between(1, 2)], 11).is_empty());

        let mut segments = beta_alpha_beta(-10.0, 0);
        segments[3].orientation = Orientation::Down;
        assert!(run(&segments, &[sheet_between(1, 3)], 11).is_empty());

        let mut segments = beta_alpha_beta(-10.0, 0);
        segments[1].orientation = Orientation::Unknown;
        segments[3].orientation = Orientation::Unknown;
        assert!(run(&segments, &[sheet_between(1, 3)], 11).is_empty());
    }

    #[test]
    fn separation_limit_is_exclusive() {
        let segments = beta_alpha_beta(-10.0, 0);
        assert!(run(&segments, &[sheet_between(1, 3)], 1).is_empty());
        assert_eq!(run(&segments, &[sheet_between(1, 3)], 2).len(), 1);
    }

    #[test]
    fn sheets_without_axis_are_skipped() {
        let segments = beta_alpha_beta(-10.0, 0);
        let sheet = Sheet::with_pair(1, SegmentId(1), SegmentId(3));
        assert!(run(&segments, &[sheet], 11).is_empty());
    }
}
