//! Survival probabilities and decay fits
//!
//! Gantree: L4_Otoc → Analysis

use qecho_core::loschmidt::{CYCLES_PER_MACROCYCLE, MEASUREMENT_KEY};
use qecho_core::{Bitstring, QechoError, QechoResult};
use qecho_exec::InfoValue;
use qecho_runtime::ExecutableResult;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Fraction of repetitions that returned all zeros
/// Gantree: ground_state_probability(records) -> Option<f64>
///
/// `None` for an empty record list.
pub fn ground_state_probability(records: &[Bitstring]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let zeros = records.iter().filter(|b| b.is_all_zero()).count();
    Some(zeros as f64 / records.len() as f64)
}

// ============================================================================
// Summary
// ============================================================================

/// Survival probability statistics for one (topology, depth) cell
/// Gantree: EchoSummary // 결과 요약
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EchoSummary {
    /// Topology name
    pub topology: String,
    /// Macrocycle depth
    pub macrocycle_depth: i64,
    /// Instances averaged
    pub n_instances: usize,
    /// Mean survival probability
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
}

impl EchoSummary {
    /// Interaction cycles in the forward half of the echo
    pub fn cycles(&self) -> f64 {
        (CYCLES_PER_MACROCYCLE as i64 * self.macrocycle_depth) as f64
    }
}

impl fmt::Display for EchoSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} depth={}: p={:.4} ± {:.4} (n={})",
            self.topology, self.macrocycle_depth, self.mean, self.std, self.n_instances
        )
    }
}

/// Mean and spread of survival probability per (topology, depth), in order
/// of first appearance
/// Gantree: summarize(results) -> Result<Vec<EchoSummary>> // 결과 집계
pub fn summarize(results: &[ExecutableResult]) -> QechoResult<Vec<EchoSummary>> {
    let mut cells: Vec<((String, i64), Vec<f64>)> = Vec::new();
    let mut index: HashMap<(String, i64), usize> = HashMap::new();

    for result in results {
        let topology = match result.info.get("topology") {
            Some(InfoValue::Topology(t)) => t.name(),
            Some(InfoValue::Str(s)) => s.clone(),
            _ => return Err(QechoError::MissingField("topology")),
        };
        let depth = result
            .info
            .get("macrocycle_depth")
            .and_then(InfoValue::as_int)
            .ok_or(QechoError::MissingField("macrocycle_depth"))?;
        let probability = result
            .records_for(MEASUREMENT_KEY)
            .and_then(ground_state_probability)
            .ok_or(QechoError::MissingField(MEASUREMENT_KEY))?;

        let key = (topology, depth);
        let slot = match index.get(&key) {
            Some(&i) => i,
            None => {
                index.insert(key.clone(), cells.len());
                cells.push((key, Vec::new()));
                cells.len() - 1
            }
        };
        cells[slot].1.push(probability);
    }

    Ok(cells
        .into_iter()
        .map(|((topology, macrocycle_depth), probs)| {
            let (mean, std) = mean_std(&probs);
            EchoSummary {
                topology,
                macrocycle_depth,
                n_instances: probs.len(),
                mean,
                std,
            }
        })
        .collect())
}

fn mean_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

// ============================================================================
// Decay Fit
// ============================================================================

/// `p(cycle) = amplitude · exp((fidelity − 1) · cycle)`
/// Gantree: DecayFit // 지수 감쇠 피팅
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecayFit {
    /// Amplitude at cycle 0
    pub amplitude: f64,
    /// Per-cycle fidelity
    pub fidelity: f64,
}

impl DecayFit {
    /// `1 − fidelity`
    pub fn error_per_cycle(&self) -> f64 {
        1.0 - self.fidelity
    }

    /// Model value at `cycle`
    pub fn predict(&self, cycle: f64) -> f64 {
        self.amplitude * ((self.fidelity - 1.0) * cycle).exp()
    }
}

/// Least-squares fit of `ln p` against cycle
/// Gantree: fit_decay(points) -> Result<DecayFit>
///
/// Needs at least two distinct cycles and strictly positive probabilities.
pub fn fit_decay(points: &[(f64, f64)]) -> QechoResult<DecayFit> {
    if points.len() < 2 {
        return Err(QechoError::AnalysisError(
            "decay fit needs at least two points".to_string(),
        ));
    }
    if let Some(&(_, p)) = points.iter().find(|(_, p)| !(p.is_finite() && *p > 0.0)) {
        return Err(QechoError::AnalysisError(format!(
            "decay fit needs positive probabilities, got {}",
            p
        )));
    }

    let n = points.len() as f64;
    let mean_x = points.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = points.iter().map(|(_, p)| p.ln()).sum::<f64>() / n;
    let sxx: f64 = points.iter().map(|(x, _)| (x - mean_x).powi(2)).sum();
    if sxx == 0.0 {
        return Err(QechoError::AnalysisError(
            "decay fit needs distinct cycles".to_string(),
        ));
    }
    let sxy: f64 = points
        .iter()
        .map(|(x, p)| (x - mean_x) * (p.ln() - mean_y))
        .sum();

    let slope = sxy / sxx;
    Ok(DecayFit {
        amplitude: (mean_y - slope * mean_x).exp(),
        fidelity: 1.0 + slope,
    })
}

/// Decay fit per topology over its summarized depths
pub fn fit_summaries(summaries: &[EchoSummary]) -> Vec<(String, QechoResult<DecayFit>)> {
    let mut topologies: Vec<&str> = Vec::new();
    for s in summaries {
        if !topologies.contains(&s.topology.as_str()) {
            topologies.push(&s.topology);
        }
    }

    topologies
        .into_iter()
        .map(|name| {
            let points: Vec<(f64, f64)> = summaries
                .iter()
                .filter(|s| s.topology == name)
                .map(|s| (s.cycles(), s.mean))
                .collect();
            (name.to_string(), fit_decay(&points))
        })
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use qecho_core::DiagonalRectangleTopology;
    use qecho_exec::Info;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn bits(s: &str) -> Bitstring {
        Bitstring::parse(s).unwrap()
    }

    fn result(width: usize, depth: i64, zeros: usize, total: usize) -> ExecutableResult {
        let records: Vec<Bitstring> = (0..total)
            .map(|i| if i < zeros { bits("000") } else { bits("010") })
            .collect();
        ExecutableResult {
            uuid: Uuid::new_v4(),
            info: Info::from_pairs([
                ("topology", InfoValue::from(DiagonalRectangleTopology::new(width, 1))),
                ("macrocycle_depth", InfoValue::from(depth)),
            ])
            .unwrap(),
            placement: None,
            repetitions: total as u64,
            records: BTreeMap::from([("z".to_string(), records)]),
        }
    }

    #[test]
    fn test_ground_state_probability() {
        let records = vec![bits("000"), bits("001"), bits("000"), bits("100")];
        assert_relative_eq!(ground_state_probability(&records).unwrap(), 0.5);
        assert_eq!(ground_state_probability(&[]), None);
    }

    #[test]
    fn test_summarize() {
        let results = vec![
            result(1, 1, 8, 10),
            result(1, 1, 6, 10),
            result(1, 3, 5, 10),
            result(2, 1, 10, 10),
        ];
        let summaries = summarize(&results).unwrap();

        assert_eq!(summaries.len(), 3);
        assert_eq!(summaries[0].topology, "1-1-diagonal-rectangle");
        assert_eq!(summaries[0].n_instances, 2);
        assert_relative_eq!(summaries[0].mean, 0.7, epsilon = 1e-12);
        assert_relative_eq!(summaries[0].std, 0.1, epsilon = 1e-12);
        assert_eq!(summaries[1].macrocycle_depth, 3);
        assert_relative_eq!(summaries[1].std, 0.0);
        assert_eq!(summaries[2].topology, "2-1-diagonal-rectangle");
    }

    #[test]
    fn test_summarize_missing_metadata() {
        let mut bare = result(1, 1, 1, 1);
        bare.info = Info::new();
        assert_eq!(
            summarize(&[bare]).unwrap_err(),
            QechoError::MissingField("topology")
        );
    }

    #[test]
    fn test_fit_recovers_decay() {
        let truth = DecayFit {
            amplitude: 0.9,
            fidelity: 0.98,
        };
        let points: Vec<(f64, f64)> = [4.0, 12.0, 20.0, 28.0]
            .iter()
            .map(|&c| (c, truth.predict(c)))
            .collect();

        let fit = fit_decay(&points).unwrap();
        assert_relative_eq!(fit.amplitude, 0.9, epsilon = 1e-9);
        assert_relative_eq!(fit.fidelity, 0.98, epsilon = 1e-9);
        assert_relative_eq!(fit.error_per_cycle(), 0.02, epsilon = 1e-9);
    }

    #[test]
    fn test_fit_rejects_bad_points() {
        assert!(fit_decay(&[(4.0, 0.5)]).is_err());
        assert!(fit_decay(&[(4.0, 0.5), (12.0, 0.0)]).is_err());
        assert!(fit_decay(&[(4.0, 0.5), (4.0, 0.4)]).is_err());
    }

    #[test]
    fn test_fit_summaries() {
        let results = vec![result(1, 1, 9, 10), result(1, 3, 7, 10), result(2, 1, 5, 10)];
        let fits = fit_summaries(&summarize(&results).unwrap());

        assert_eq!(fits.len(), 2);
        assert!(fits[0].1.as_ref().unwrap().fidelity < 1.0);
        assert!(fits[1].1.is_err());
    }
}
