//! 淨需求計算

use mrp_core::{OrderAttempt, OrderAttemptRecord, Period, PlanningPolicy, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::capacity::CapacityGate;
use crate::context::PlanningContext;
use crate::lot_sizing::LotSizingCalculator;
use crate::pegging::PeggingRecord;
use crate::MrpWarning;

/// 淨需求計算結果（單一期間）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetRequirement {
    /// 期間
    pub period: Period,
    /// 總需求
    pub gross_requirement: Decimal,
    /// 預計收貨
    pub scheduled_receipt: Decimal,
    /// 計劃訂單收貨（本期缺料所下訂單的到貨量）
    pub planned_receipt: Decimal,
    /// 淨需求（取整前的缺料量，相對安全庫存）
    pub net_requirement: Decimal,
    /// 預計可用量
    pub projected_available: Decimal,
}

impl NetRequirement {
    /// 創建新的淨需求記錄
    pub fn new(period: Period) -> Self {
        Self {
            period,
            gross_requirement: Decimal::ZERO,
            scheduled_receipt: Decimal::ZERO,
            planned_receipt: Decimal::ZERO,
            net_requirement: Decimal::ZERO,
            projected_available: Decimal::ZERO,
        }
    }
}

/// 淨需求計算器
pub struct NettingCalculator;

impl NettingCalculator {
    /// 對單一物料逐期淨算
    ///
    /// 從目前時界起點到終點逐期維護可用量：
    /// 1. 第一期可用量 = 現有 - 已分配（加上時界起點前的預計收貨）
    /// 2. 加上本期預計收貨
    /// 3. 有總需求時，若扣除後低於安全庫存，於「本期 - 提前期」下達
    ///    按批量取整的計劃訂單，並將訂單量乘上單位用量累加到子件的總需求
    /// 4. 扣除本期總需求，記錄預計可用量
    ///
    /// 相依需求在物料計算完成後才寫入子件；子件要等所有父件完成才會出列，
    /// 因此延後寫入不影響結果。
    pub fn net_part<G: CapacityGate>(
        ctx: &mut PlanningContext<'_, G>,
        policy: &PlanningPolicy,
        part_id: &str,
    ) -> Result<Vec<NetRequirement>> {
        let part = ctx.registry.require(part_id)?.clone();
        let window = ctx.horizon.horizon();
        let lead_time = Period::try_from(part.lead_time).unwrap_or(Period::MAX);

        // 時界起點之前到貨的預計收貨併入期初可用量
        let mut available = part.initial_available()
            + part
                .scheduled_receipts
                .range(..window.min_period)
                .map(|(_, qty)| *qty)
                .sum::<Decimal>();
        let mut rows = Vec::with_capacity(window.len());
        let mut releases: BTreeMap<Period, Decimal> = BTreeMap::new();
        let mut balances: BTreeMap<Period, Decimal> = BTreeMap::new();
        let mut explosions: Vec<(Period, Decimal)> = Vec::new();

        for period in window.periods() {
            let mut row = NetRequirement::new(period);

            row.scheduled_receipt = part.scheduled_receipt(period);
            available += row.scheduled_receipt;

            let required = part.gross_requirement(period);
            row.gross_requirement = required;

            if required > Decimal::ZERO {
                let leftover = available - required;

                if leftover < part.safety_stock {
                    let when_needed = period.saturating_sub(lead_time);
                    ctx.horizon.extend_to(when_needed, part_id);

                    row.net_requirement = part.safety_stock - leftover;
                    let order = LotSizingCalculator::round_up(row.net_requirement, part.lot_size);

                    let outcome = if policy.is_admissible(when_needed) {
                        ctx.admit(part_id, when_needed, order)
                    } else {
                        OrderAttempt::RejectedInadmissiblePeriod { when_needed }
                    };

                    match &outcome {
                        OrderAttempt::Committed(qty) => {
                            *releases.entry(when_needed).or_insert(Decimal::ZERO) += *qty;
                            available += *qty;
                            row.planned_receipt = *qty;
                            explosions.push((when_needed, *qty));
                        }
                        OrderAttempt::RejectedInsufficientCapacity { resource, shortfall } => {
                            tracing::warn!(
                                "物料 {} 第 {} 期計劃訂單 {} 因資源 {} 產能不足（短缺 {}）未下達",
                                part_id,
                                when_needed,
                                order,
                                resource,
                                shortfall
                            );
                            ctx.warnings.push(MrpWarning::warning(
                                part_id.to_string(),
                                format!(
                                    "第 {} 期計劃訂單 {} 因資源 {} 產能不足（短缺 {}）未下達",
                                    when_needed, order, resource, shortfall
                                ),
                            ));
                        }
                        OrderAttempt::RejectedInadmissiblePeriod { when_needed } => {
                            tracing::warn!(
                                "物料 {} 第 {} 期需求的下單期間 {} 已過，未下達計劃訂單",
                                part_id,
                                period,
                                when_needed
                            );
                            ctx.warnings.push(MrpWarning::warning(
                                part_id.to_string(),
                                format!(
                                    "第 {} 期需求的下單期間 {} 已過，缺料 {} 未補足",
                                    period, when_needed, row.net_requirement
                                ),
                            ));
                        }
                    }

                    ctx.attempts.push(OrderAttemptRecord {
                        part_id: part_id.to_string(),
                        due_period: period,
                        release_period: when_needed,
                        requested_qty: order,
                        outcome,
                    });
                }

                available -= required;
            }

            row.projected_available = available;
            balances.insert(period, available);
            rows.push(row);
        }

        {
            let target = ctx.registry.require_mut(part_id)?;
            target.planned_order_releases.extend(releases);
            target.projected_available.extend(balances);
        }

        // BOM 展開：子件需求 = 父件訂單量 × 單位用量，需求期間 = 父件下達期間
        for (when_needed, qty) in explosions {
            for (component_id, qty_per) in &part.bom {
                let derived = qty * *qty_per;
                ctx.registry
                    .require_mut(component_id)?
                    .add_gross_requirement(when_needed, derived);
                ctx.pegging.push(PeggingRecord::new(
                    part_id,
                    component_id.as_str(),
                    when_needed,
                    derived,
                ));

                tracing::debug!(
                    "BOM 展開: {} → {} (數量: {}, 期間: {})",
                    part_id,
                    component_id,
                    derived,
                    when_needed
                );
            }
        }

        Ok(rows)
    }
}
