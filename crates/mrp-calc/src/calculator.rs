//! MRP 主計算器

use mrp_core::{
    CapacityTable, Demand, HorizonPolicy, PartRegistry, PartSchedule, Period, PlannedOrder,
    PlanningPolicy, ResourceProfile, Result, Supply,
};
use rayon::prelude::*;
use std::collections::BTreeMap;

use crate::capacity::{CapacityGate, SharedCapacity, Unconstrained};
use crate::context::PlanningContext;
use crate::graph::{DependencyGraph, ReadyQueue};
use crate::horizon::HorizonTracker;
use crate::netting::NettingCalculator;
use crate::{MrpResult, MrpWarning};

/// MRP 計算器
pub struct MrpCalculator {
    /// 物料（計算時複製，原始資料不會被修改）
    registry: PartRegistry,

    /// 計劃策略
    policy: PlanningPolicy,

    /// 物料的資源用量
    profiles: BTreeMap<String, ResourceProfile>,

    /// 初始產能表
    capacity: Option<CapacityTable>,
}

impl MrpCalculator {
    /// 創建新的 MRP 計算器
    pub fn new(registry: PartRegistry, policy: PlanningPolicy) -> Self {
        Self {
            registry,
            policy,
            profiles: BTreeMap::new(),
            capacity: None,
        }
    }

    /// 建構器模式：啟用產能檢查
    pub fn with_capacity(
        mut self,
        profiles: BTreeMap<String, ResourceProfile>,
        capacity: CapacityTable,
    ) -> Self {
        self.profiles = profiles;
        self.capacity = Some(capacity);
        self
    }

    /// 主 MRP 計算入口
    pub fn calculate(&self) -> Result<MrpResult> {
        self.validate_profiles(&self.registry)?;
        self.run_with_capacity(self.registry.clone())
    }

    /// 先寫入獨立需求與預計收貨，再計算
    pub fn calculate_with(&self, demands: &[Demand], supplies: &[Supply]) -> Result<MrpResult> {
        let mut registry = self.registry.clone();
        registry.apply_demands(demands)?;
        registry.apply_supplies(supplies)?;

        self.validate_profiles(&registry)?;
        self.run_with_capacity(registry)
    }

    /// 依產品族群並行計算
    ///
    /// 以 BOM 關係切分出互不相連的族群，每個族群在各自的工作執行緒上以
    /// 自己的時界計算，結果依族群最小物料ID排序。產能表由所有族群共用，
    /// 族群間搶用產能的先後取決於執行緒排程，因此設有產能表時結果不保證
    /// 每次相同；沒有產能表時與逐族群單獨計算的結果一致。
    pub fn calculate_partitioned(&self) -> Result<Vec<MrpResult>> {
        self.validate_profiles(&self.registry)?;

        let graph = DependencyGraph::build(&self.registry)?;
        let families = graph.families();
        let shared = self.capacity.clone().map(SharedCapacity::new);

        tracing::info!("依產品族群並行計算：{} 個族群", families.len());

        families
            .par_iter()
            .map(|family| {
                let subset = self.registry.subset(family.iter().map(String::as_str))?;
                match &shared {
                    Some(capacity) => self.run(subset, capacity.clone()),
                    None => self.run(subset, Unconstrained),
                }
            })
            .collect()
    }

    pub fn registry(&self) -> &PartRegistry {
        &self.registry
    }

    pub fn policy(&self) -> &PlanningPolicy {
        &self.policy
    }

    fn run_with_capacity(&self, registry: PartRegistry) -> Result<MrpResult> {
        match &self.capacity {
            Some(table) => self.run(registry, table.clone()),
            None => self.run(registry, Unconstrained),
        }
    }

    /// 資源用量只能設定在已登錄的物料上
    fn validate_profiles(&self, registry: &PartRegistry) -> Result<()> {
        for part_id in self.profiles.keys() {
            registry.require(part_id)?;
        }
        Ok(())
    }

    fn run<G: CapacityGate>(&self, mut registry: PartRegistry, gate: G) -> Result<MrpResult> {
        tracing::info!(
            "開始 MRP 計算：物料 {} 筆，產能限制 {}",
            registry.len(),
            if self.capacity.is_some() { "啟用" } else { "停用" }
        );

        let start_time = std::time::Instant::now();

        // Step 1: 建立相依圖
        tracing::debug!("Step 1: 建立相依圖");
        let mut graph = DependencyGraph::build(&registry)?;

        // Step 2: 以沒有父件的物料建立就緒佇列
        tracing::debug!("Step 2: 建立就緒佇列");
        let mut queue = ReadyQueue::seed(&graph)?;
        tracing::debug!("根物料: {:?}", graph.roots());

        // Step 3: 初始時界
        tracing::debug!("Step 3: 初始時界");
        let initial = HorizonTracker::initial(&registry, &self.policy)?;
        let mut warnings = Vec::new();
        let ids: Vec<String> = registry.ids().map(str::to_string).collect();
        for part_id in &ids {
            let part = registry.require_mut(part_id)?;
            part.clear_outputs();

            let before = part.gross_requirements.len();
            part.gross_requirements
                .retain(|period, _| initial.contains(*period));
            let dropped = before - part.gross_requirements.len();
            if dropped > 0 {
                tracing::warn!("物料 {} 有 {} 筆需求落在計劃時界外，已忽略", part_id, dropped);
                warnings.push(MrpWarning::warning(
                    part_id.clone(),
                    format!(
                        "{} 筆需求落在計劃時界 [{}, {}] 外，已忽略",
                        dropped, initial.min_period, initial.max_period
                    ),
                ));
            }
        }

        // Step 4: 預先推算最終時界
        let horizon = match self.policy.horizon_policy {
            HorizonPolicy::PrePass => {
                tracing::debug!("Step 4: 預先推算時界");
                HorizonTracker::pre_pass(&registry, &graph, &self.policy, initial)?
            }
            HorizonPolicy::Dynamic => {
                tracing::debug!("Step 4: 動態時界，計算中擴展");
                initial
            }
        };
        tracing::debug!("計劃時界: [{}, {}]", horizon.min_period, horizon.max_period);

        // Step 5: 依就緒佇列逐物料淨算
        tracing::debug!("Step 5: 逐物料淨算");
        let mut ctx = PlanningContext::new(
            registry,
            HorizonTracker::new(horizon),
            gate,
            &self.profiles,
        );
        ctx.warnings = warnings;
        let mut processing_order = Vec::with_capacity(graph.len());

        while let Some(part_id) = queue.pop() {
            tracing::debug!("計算物料 MRP: {}", part_id);

            let rows = NettingCalculator::net_part(&mut ctx, &self.policy, &part_id)?;
            ctx.netting.insert(part_id.clone(), rows);

            for component_id in graph.complete(&part_id) {
                queue.enqueue(component_id);
            }
            processing_order.push(part_id);
        }

        // Step 6: 檢查未處理的物料（掛在根物料下的循環）
        tracing::debug!("Step 6: 檢查未處理物料");
        if processing_order.len() < graph.len() {
            let unprocessed: Vec<&str> = ctx
                .registry
                .ids()
                .filter(|id| !queue.is_queued(id))
                .collect();
            tracing::warn!("BOM 循環導致物料未計算: {:?}", unprocessed);
            let message = format!("BOM 存在循環，以下物料未計算: {}", unprocessed.join(", "));
            let part_id = unprocessed.first().map(|id| id.to_string()).unwrap_or_default();
            ctx.warnings.push(MrpWarning::error(part_id, message));
        }

        // Step 7: 組出結果
        tracing::debug!("Step 7: 組出結果");
        let horizon = ctx.horizon.horizon();
        let mut schedules = BTreeMap::new();
        let mut planned_orders = Vec::new();

        for part in ctx.registry.parts() {
            schedules.insert(part.id.clone(), PartSchedule::from_part(part, horizon.periods()));

            let lead_time = Period::try_from(part.lead_time).unwrap_or(Period::MAX);
            for (release_period, quantity) in &part.planned_order_releases {
                planned_orders.push(PlannedOrder::new(
                    part.id.clone(),
                    *quantity,
                    *release_period,
                    release_period.saturating_add(lead_time),
                    part.procurement_type.into(),
                ));
            }
        }

        let mut result = MrpResult::empty(horizon);
        result.schedules = schedules;
        result.planned_orders = planned_orders;
        result.remaining_capacity = ctx.gate.snapshot();
        result.netting = ctx.netting;
        result.order_attempts = ctx.attempts;
        result.pegging = ctx.pegging;
        result.warnings = ctx.warnings;
        result.processing_order = processing_order;
        result.parts = ctx.registry;
        result.calculation_time_ms = Some(start_time.elapsed().as_millis());

        tracing::info!("MRP 計算完成，耗時 {:?}", start_time.elapsed());
        tracing::info!(
            "計劃訂單數量: {}，時界 [{}, {}]，時界擴展 {} 次",
            result.planned_orders.len(),
            horizon.min_period,
            horizon.max_period,
            ctx.horizon.extensions()
        );

        Ok(result)
    }
}
