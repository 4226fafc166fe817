use crate::core::models::chain::{Chain, ChainType};
use crate::core::models::protein::Protein;
use crate::core::models::topology::{ChainFailure, ChainTopology, ProteinTopology};
use crate::engine::config::{AnalysisConfig, AnalysisMode};
use crate::engine::error::EngineError;
use crate::engine::progress::{Progress, ProgressReporter};
use crate::engine::tasks;
use tracing::{info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Runs every stage on one chain and freezes the result.
///
/// The chain is taken by value: amide hydrogens, torsions and environment tags are
/// written onto it while it is analysed.
#[instrument(skip_all, name = "chain_analysis", fields(chain = %chain.id))]
pub fn analyze_chain(mut chain: Chain, config: &AnalysisConfig) -> Result<ChainTopology, EngineError> {
    info!(residues = chain.len(), "Analysing chain.");

    if config.amide_hydrogens.enabled {
        let placed = chain.add_amide_hydrogens(config.amide_hydrogens.bond_length);
        info!(placed, "Placed missing amide hydrogens.");
    }
    chain.calculate_torsions();

    let pairing = tasks::hbond_detection::run(&chain, &config.pairing)?;
    let tagging = match config.mode {
        AnalysisMode::Standard => None,
        AnalysisMode::DsspStyle => Some(tasks::hbond_detection::run(&chain, &config.tagging)?),
    };
    let tagging = tagging.as_ref().unwrap_or(&pairing);

    tasks::environment::run(&mut chain, tagging);
    let mut segments = tasks::assembly::run(&chain, tagging, config.fill_loops);
    let mut sheets = tasks::sheets::run(&segments, &pairing, &config.sheets);
    tasks::orientation::run(&mut segments, &mut sheets, config.helix_orientation_fallback);
    let chiralities =
        tasks::chirality::run(&segments, &sheets, config.sheets.max_chirality_separation);

    info!(
        segments = segments.len(),
        sheets = sheets.len(),
        chiralities = chiralities.len(),
        "Chain analysis complete."
    );
    Ok(ChainTopology::new(
        chain.id,
        segments,
        sheets,
        chiralities,
        pairing.len(),
    ))
}

/// Analyses every protein chain of a structure.
///
/// Non-protein chains are skipped. A chain whose analysis fails is recorded in
/// [`ProteinTopology::failures`] and the remaining chains are still analysed.
#[instrument(skip_all, name = "analysis_workflow", fields(protein = %protein.name))]
pub fn run(
    protein: &Protein,
    config: &AnalysisConfig,
    reporter: &ProgressReporter,
) -> Result<ProteinTopology, EngineError> {
    reporter.report(Progress::PhaseStart {
        name: "Chain Analysis",
    });

    let chains: Vec<&Chain> = protein
        .chains_iter()
        .map(|(_, chain)| chain)
        .filter(|chain| chain.chain_type == ChainType::Protein)
        .collect();
    info!(
        protein_chains = chains.len(),
        skipped = protein.chain_count() - chains.len(),
        "Starting topology analysis."
    );
    reporter.report(Progress::TaskStart {
        total_steps: chains.len() as u64,
    });

    #[cfg(not(feature = "parallel"))]
    let iterator = chains.iter();

    #[cfg(feature = "parallel")]
    let iterator = chains.par_iter();

    let outcomes: Vec<(char, Result<ChainTopology, EngineError>)> = iterator
        .map(|&chain| {
            let outcome = analyze_chain(chain.clone(), config);
            reporter.report(Progress::TaskIncrement);
            (chain.id, outcome)
        })
        .collect();

    reporter.report(Progress::TaskFinish);

    let mut result = ProteinTopology {
        name: protein.name.clone(),
        ..ProteinTopology::default()
    };
    for (chain_id, outcome) in outcomes {
        match outcome {
            Ok(topology) => {
                reporter.report(Progress::ChainAnalyzed {
                    chain: chain_id,
                    segments: topology.segments().len(),
                });
                result.chains.push(topology);
            }
            Err(err) => {
                let reason = err.to_string();
                warn!(chain = %chain_id, %reason, "Chain analysis failed; continuing.");
                reporter.report(Progress::ChainFailed {
                    chain: chain_id,
                    reason: reason.clone(),
                });
                result.failures.push(ChainFailure { chain_id, reason });
            }
        }
    }

    reporter.report(Progress::PhaseFinish);
    info!(
        chains = result.chains.len(),
        failures = result.failures.len(),
        "Workflow complete."
    );
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::segment::{SegmentKind, TerminusEnd};
    use crate::engine::config::AnalysisConfigBuilder;
    use crate::engine::tasks::hbond_detection::tests::{arrange_bond, isolated_chain};
    use std::sync::Mutex;

    fn protein_with(chains: Vec<Chain>) -> Protein {
        let mut protein = Protein::new("1abc");
        for chain in chains {
            protein.insert_chain(chain);
        }
        protein
    }

    fn relabel(mut chain: Chain, id: char) -> Chain {
        chain.id = id;
        chain
    }

    #[test]
    fn unbonded_chain_is_one_loop_between_termini() {
        let topology =
            analyze_chain(isolated_chain(&[0, 1, 2, 3, 4, 5]), &AnalysisConfig::default()).unwrap();
        let kinds: Vec<SegmentKind> = topology.segments().iter().map(|s| s.kind).collect();
        assert_eq!(
            kinds,
            vec![
                SegmentKind::Terminus(TerminusEnd::N),
                SegmentKind::UnstructuredLoop,
                SegmentKind::Terminus(TerminusEnd::C)
            ]
        );
        assert_eq!(topology.segments()[1].first_number(), Some(1));
        assert_eq!(topology.segments()[1].last_number(), Some(6));
        assert_eq!(topology.hbond_count(), 0);
        assert!(topology.sheets().is_empty());
    }

    #[test]
    fn bond_count_comes_from_pairing_network() {
        let mut chain = isolated_chain(&[0, 1, 2, 3, 4, 5, 6, 7]);
        arrange_bond(&mut chain, 4, 0);
        let topology = analyze_chain(chain, &AnalysisConfig::default()).unwrap();
        assert_eq!(topology.hbond_count(), 1);
    }

    #[test]
    fn non_protein_chains_are_skipped() {
        let mut water = Chain::new('W', ChainType::Water);
        water.push_residue(1, "HOH");
        let protein = protein_with(vec![isolated_chain(&[0, 1, 2, 3]), water]);

        let result = run(&protein, &AnalysisConfig::default(), &ProgressReporter::new()).unwrap();
        assert_eq!(result.name, "1abc");
        assert_eq!(result.chains.len(), 1);
        assert!(result.chain('W').is_none());
        assert!(result.is_complete());
    }

    #[test]
    fn invalid_criteria_fail_chains_without_aborting_the_run() {
        let mut config = AnalysisConfigBuilder::new()
            .pairing_criteria(crate::engine::config::HBondCriteria::pairing_default())
            .build()
            .unwrap();
        config.pairing.max_distance = -1.0;

        let protein = protein_with(vec![
            isolated_chain(&[0, 1, 2, 3]),
            relabel(isolated_chain(&[0, 1, 2, 3]), 'B'),
        ]);
        let result = run(&protein, &config, &ProgressReporter::new()).unwrap();
        assert!(result.chains.is_empty());
        let failed: Vec<char> = result.failures.iter().map(|f| f.chain_id).collect();
        assert_eq!(failed, vec!['A', 'B']);
    }

    #[test]
    fn progress_events_bracket_the_chain_work() {
        let events = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            events.lock().unwrap().push(event);
        }));
        let protein = protein_with(vec![
            isolated_chain(&[0, 1, 2, 3]),
            relabel(isolated_chain(&[0, 1, 2, 3]), 'B'),
        ]);
        run(&protein, &AnalysisConfig::default(), &reporter).unwrap();
        drop(reporter);

        let events = events.into_inner().unwrap();
        assert_eq!(
            events.first(),
            Some(&Progress::PhaseStart {
                name: "Chain Analysis"
            })
        );
        assert_eq!(events.last(), Some(&Progress::PhaseFinish));
        assert_eq!(
            events
                .iter()
                .filter(|e| **e == Progress::TaskIncrement)
                .count(),
            2
        );
        assert!(events.contains(&Progress::ChainAnalyzed {
            chain: 'B',
            segments: 3
        }));
    }
}
