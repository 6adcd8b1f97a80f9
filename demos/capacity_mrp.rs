//! # 產能限制 MRP 範例
//!
//! 兩條產品線共用一條組裝線：
//! - 以 JSON 載入物料
//! - 組裝線每期產能有限，超出產能的計劃訂單整張不下
//! - 依產品族群並行計算，共用同一張產能表
//!
//! 執行：`cargo run --example capacity_mrp`

use mrp_planner::prelude::*;
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use tracing_subscriber::{fmt, EnvFilter};

const PARTS_JSON: &str = r#"[
    { "id": "KETTLE", "lead_time": 1, "bom": { "ELEMENT": "1", "BODY": "1" } },
    { "id": "ELEMENT", "lead_time": 2, "lot_size": "50", "procurement_type": "Buy" },
    { "id": "BODY", "on_hand_qty": "20", "lead_time": 1, "lot_size": "10" },
    { "id": "TOASTER", "lead_time": 1, "safety_stock": "5", "bom": { "ELEMENT": "2" } }
]"#;

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(true).init();
}

fn main() -> anyhow::Result<()> {
    init_logging();

    println!("🏭 ===== 產能限制 MRP 範例 =====");
    println!();

    // ========== 1. 載入物料 ==========
    println!("📥 步驟 1: 以 JSON 載入物料");
    let registry = PartRegistry::from_json(PARTS_JSON)?;
    println!("   ✓ 物料數: {}", registry.len());
    println!();

    // ========== 2. 獨立需求 ==========
    println!("📦 步驟 2: 建立需求");
    let demands = vec![
        Demand::new("KETTLE", Decimal::from(60), 4, DemandType::SalesOrder),
        Demand::new("KETTLE", Decimal::from(90), 6, DemandType::Forecast),
        Demand::new("TOASTER", Decimal::from(40), 5, DemandType::SalesOrder),
    ];
    let mut registry = registry;
    registry.apply_demands(&demands)?;
    println!("   ✓ 需求 {} 筆", demands.len());
    println!();

    // ========== 3. 產能設定 ==========
    println!("⚙️  步驟 3: 組裝線每期 80 工時");
    let mut profiles = BTreeMap::new();
    profiles.insert(
        "KETTLE".to_string(),
        ResourceProfile::from([("ASSEMBLY".to_string(), Decimal::ONE)]),
    );
    profiles.insert(
        "TOASTER".to_string(),
        ResourceProfile::from([("ASSEMBLY".to_string(), Decimal::from(2))]),
    );
    let capacity = CapacityTable::new().with_uniform_capacity("ASSEMBLY", 1..=6, Decimal::from(80));
    println!();

    // ========== 4. 單執行緒計算 ==========
    println!("🚀 步驟 4: 單執行緒計算");
    let calculator = MrpCalculator::new(registry, PlanningPolicy::new())
        .with_capacity(profiles, capacity);
    let result = calculator.calculate()?;
    print_result(&result);

    // ========== 5. 依產品族群並行計算 ==========
    println!("🧵 步驟 5: 依產品族群並行計算");
    for (index, family) in calculator.calculate_partitioned()?.iter().enumerate() {
        println!("族群 {}: {:?}", index + 1, family.processing_order);
        print_result(family);
    }

    println!("✅ MRP 計算完成！");
    Ok(())
}

fn print_result(result: &MrpResult) {
    println!("----------------------------------------");
    for order in &result.planned_orders {
        println!(
            "  ├─ {} {:?} | 數量: {} | 下達: 第 {} 期",
            order.part_id, order.order_type, order.quantity, order.release_period
        );
    }

    for attempt in result.rejected_attempts() {
        println!(
            "  ✗ {} 第 {} 期 {} → {:?}",
            attempt.part_id, attempt.release_period, attempt.requested_qty, attempt.outcome
        );
    }

    if let Some(capacity) = &result.remaining_capacity {
        let remaining: Vec<String> = result
            .horizon
            .periods()
            .map(|period| format!("{}:{}", period, capacity.remaining("ASSEMBLY", period)))
            .collect();
        println!("  剩餘組裝產能 {}", remaining.join(" "));
    }
    println!();
}
