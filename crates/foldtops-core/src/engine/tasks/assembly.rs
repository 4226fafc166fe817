use crate::core::models::chain::Chain;
use crate::core::models::hbond::HBondNetwork;
use crate::core::models::residue::{EnvironmentTag, HelixRegister};
use crate::core::models::segment::{BackboneSegment, SegmentKind, TerminusEnd};
use nalgebra::Point3;
use tracing::{debug, instrument, trace};

/// Positions `first..=last` of a pending segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    kind: SegmentKind,
    first: usize,
    last: usize,
}

#[derive(Debug, Clone, Copy)]
struct OpenSpan {
    start: usize,
    end: usize,
}

/// Streaming state: one open span per helix register plus one strand span.
#[derive(Debug, Default)]
struct Tracker {
    helices: [Option<OpenSpan>; 3],
    strand: Option<OpenSpan>,
    emitted: Vec<Span>,
}

fn register_slot(register: HelixRegister) -> usize {
    match register {
        HelixRegister::ThreeTen => 0,
        HelixRegister::Alpha => 1,
        HelixRegister::Pi => 2,
    }
}

/// True when the bond partners of `k` stay within two residues of those of `k - 2`.
fn partners_continue(network: &HBondNetwork, k: usize) -> bool {
    if k < 2 {
        return true;
    }
    let before = network.partners(k - 2);
    if before.is_empty() {
        return true;
    }
    let current = network.partners(k);
    current
        .iter()
        .any(|&p| before.iter().any(|&q| p.abs_diff(q) <= 2))
}

impl Tracker {
    fn helix_start(&mut self, register: HelixRegister, k: usize) {
        let r = register.span();
        let slot = &mut self.helices[register_slot(register)];
        match slot {
            None => *slot = Some(OpenSpan { start: k, end: k + r }),
            Some(open) => {
                if open.end + 1 < k + r {
                    if let Some(span) = close_helix(*open, r) {
                        self.emitted.push(span);
                    }
                    open.start = k;
                }
                open.end = k + r;
            }
        }
    }

    fn strand_bond(&mut self, k: usize, continuous: bool) {
        match &mut self.strand {
            None => self.strand = Some(OpenSpan { start: k, end: k }),
            Some(open) => {
                if open.end + 2 < k || !continuous {
                    if let Some(span) = close_strand(*open) {
                        self.emitted.push(span);
                    }
                    *open = OpenSpan { start: k, end: k };
                } else {
                    open.end = k;
                }
            }
        }
    }

    fn flush(mut self) -> Vec<Span> {
        for register in HelixRegister::ALL {
            if let Some(open) = self.helices[register_slot(register)].take() {
                if let Some(span) = close_helix(open, register.span()) {
                    self.emitted.push(span);
                }
            }
        }
        if let Some(open) = self.strand.take() {
            if let Some(span) = close_strand(open) {
                self.emitted.push(span);
            }
        }
        self.emitted
    }
}

/// A helix needs more than `r` residues between its bonded ends; the ends are dropped.
fn close_helix(open: OpenSpan, r: usize) -> Option<Span> {
    (open.end - open.start > r).then(|| Span {
        kind: SegmentKind::Helix,
        first: open.start + 1,
        last: open.end - 1,
    })
}

fn close_strand(open: OpenSpan) -> Option<Span> {
    (open.end > open.start).then_some(Span {
        kind: SegmentKind::Strand,
        first: open.start,
        last: open.end,
    })
}

/// Scans tagged residues and returns raw helix and strand spans in emission order.
fn scan(chain: &Chain, network: &HBondNetwork) -> Vec<Span> {
    let mut tracker = Tracker::default();
    for (k, residue) in chain.residues().iter().enumerate() {
        for tag in &residue.environment {
            if let EnvironmentTag::HelixStart(register) = tag {
                tracker.helix_start(*register, k);
            }
        }
        if residue.environment.iter().any(|t| t.is_strand_like()) {
            tracker.strand_bond(k, partners_continue(network, k));
        }
    }
    tracker.flush()
}

/// Clamps, sorts, merges overlapping helices and trims any remaining overlap.
fn resolve(mut spans: Vec<Span>, residue_count: usize) -> Vec<Span> {
    let Some(last_position) = residue_count.checked_sub(1) else {
        return Vec::new();
    };
    spans.retain_mut(|s| {
        s.last = s.last.min(last_position);
        s.first <= s.last
    });
    spans.sort_by_key(|s| (s.first, s.last));

    let mut merged: Vec<Span> = Vec::with_capacity(spans.len());
    for span in spans {
        if let Some(previous) = merged.last_mut() {
            if previous.kind == SegmentKind::Helix
                && span.kind == SegmentKind::Helix
                && span.first <= previous.last
            {
                previous.last = previous.last.max(span.last);
                continue;
            }
        }
        merged.push(span);
    }

    let mut resolved: Vec<Span> = Vec::with_capacity(merged.len());
    for mut span in merged {
        if let Some(previous) = resolved.last() {
            if span.first <= previous.last {
                span.first = previous.last + 1;
            }
        }
        if span.first <= span.last {
            resolved.push(span);
        } else {
            trace!(?span, "Dropping segment emptied by overlap trimming");
        }
    }
    resolved
}

/// Adds loop spans over every position not covered by `spans`.
fn fill_loops(spans: Vec<Span>, residue_count: usize) -> Vec<Span> {
    let mut filled = Vec::with_capacity(spans.len() * 2 + 1);
    let mut next = 0;
    for span in spans {
        if span.first > next {
            filled.push(Span {
                kind: SegmentKind::UnstructuredLoop,
                first: next,
                last: span.first - 1,
            });
        }
        next = span.last + 1;
        filled.push(span);
    }
    if next < residue_count {
        filled.push(Span {
            kind: SegmentKind::UnstructuredLoop,
            first: next,
            last: residue_count - 1,
        });
    }
    filled
}

/// Assembles the classified residues of a chain into sequence-ordered segments.
///
/// `network` supplies the partners used for strand continuity. The result starts
/// with the N terminus and ends with the C terminus unless the chain is empty.
#[instrument(skip_all, name = "segment_assembly", fields(chain = %chain.id))]
pub fn run(chain: &Chain, network: &HBondNetwork, fill: bool) -> Vec<BackboneSegment> {
    let count = chain.len();
    let mut spans = resolve(scan(chain, network), count);
    if fill {
        spans = fill_loops(spans, count);
    }

    let residues = chain.residues();
    let (Some(first), Some(last)) = (residues.first(), residues.last()) else {
        return Vec::new();
    };

    let mut segments = Vec::with_capacity(spans.len() + 2);
    segments.push(BackboneSegment::terminus(
        TerminusEnd::N,
        first.center().unwrap_or_else(Point3::origin),
    ));
    segments.extend(
        spans
            .iter()
            .filter_map(|s| BackboneSegment::from_chain(s.kind, chain, s.first, s.last)),
    );
    segments.push(BackboneSegment::terminus(
        TerminusEnd::C,
        last.center().unwrap_or_else(Point3::origin),
    ));

    debug!(
        helices = spans.iter().filter(|s| s.kind == SegmentKind::Helix).count(),
        strands = spans.iter().filter(|s| s.kind == SegmentKind::Strand).count(),
        "Segment assembly finished."
    );
    segments
}
