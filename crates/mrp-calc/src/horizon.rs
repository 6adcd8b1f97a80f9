//! 時界追蹤

use mrp_core::{Horizon, Period, PartRegistry, PlanningPolicy, Result};
use std::collections::BTreeMap;

use crate::graph::DependencyGraph;

/// 時界追蹤器
///
/// 記錄本次計算目前的最早與最晚期間。最早期間只會往前擴展。
#[derive(Debug, Clone)]
pub struct HorizonTracker {
    horizon: Horizon,
    extensions: usize,
}

impl HorizonTracker {
    pub fn new(horizon: Horizon) -> Self {
        Self {
            horizon,
            extensions: 0,
        }
    }

    /// 初始時界：指定值，或所有總需求期間的範圍（無任何需求時為第 1 期）
    ///
    /// 指定的時界起點晚於終點時回傳 `InvalidHorizon`。
    pub fn initial(registry: &PartRegistry, policy: &PlanningPolicy) -> Result<Horizon> {
        match policy.horizon {
            Some(horizon) => horizon.validated(),
            None => Ok(Horizon::spanning(registry.requirement_periods()).unwrap_or(Horizon {
                min_period: 1,
                max_period: 1,
            })),
        }
    }

    /// 預先推算最終時界
    ///
    /// 依拓撲順序傳遞每個物料可能出現需求的期間範圍，
    /// 下單期間 = 需求期間 - 提前期。只有可接受的下單期間會傳遞到子件，
    /// 但不可接受的下單期間仍會擴展時界（與淨算時的擴展規則一致）。
    pub fn pre_pass(
        registry: &PartRegistry,
        graph: &DependencyGraph,
        policy: &PlanningPolicy,
        initial: Horizon,
    ) -> Result<Horizon> {
        let mut horizon = initial;
        let mut derived: BTreeMap<&str, (Period, Period)> = BTreeMap::new();

        for part_id in graph.topological_order()? {
            let part = registry.require(&part_id)?;

            let seeded = part
                .gross_requirements
                .iter()
                .filter(|(period, qty)| **period <= initial.max_period && !qty.is_zero())
                .map(|(period, _)| *period);
            let span = seeded
                .map(|period| (period, period))
                .chain(derived.get(part_id.as_str()).copied())
                .reduce(|(lo, hi), (a, b)| (lo.min(a), hi.max(b)));

            let Some((earliest, latest)) = span else {
                continue;
            };

            let lead_time = Period::try_from(part.lead_time).unwrap_or(Period::MAX);
            let first_release = earliest.saturating_sub(lead_time);
            let last_release = latest.saturating_sub(lead_time);
            horizon.extend_to(first_release);

            let admissible = if policy.allow_past_periods {
                Some((first_release, last_release))
            } else if last_release >= 1 {
                Some((first_release.max(1), last_release))
            } else {
                None
            };

            if let Some((lo, hi)) = admissible {
                for component_id in part.bom.keys() {
                    derived
                        .entry(component_id.as_str())
                        .and_modify(|(a, b)| {
                            *a = (*a).min(lo);
                            *b = (*b).max(hi);
                        })
                        .or_insert((lo, hi));
                }
            }
        }

        tracing::debug!(
            "預先推算時界: [{}, {}] → [{}, {}]",
            initial.min_period,
            initial.max_period,
            horizon.min_period,
            horizon.max_period
        );

        Ok(horizon)
    }

    pub fn horizon(&self) -> Horizon {
        self.horizon
    }

    /// 下單期間早於目前時界時往前擴展
    pub fn extend_to(&mut self, period: Period, part_id: &str) -> bool {
        let from = self.horizon.min_period;
        let extended = self.horizon.extend_to(period);
        if extended {
            self.extensions += 1;
            tracing::debug!("物料 {} 下單期間 {} 早於時界，時界起點 {} → {}", part_id, period, from, period);
        }
        extended
    }

    /// 計算中發生的擴展次數
    pub fn extensions(&self) -> usize {
        self.extensions
    }
}
