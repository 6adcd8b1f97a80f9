//! # 腳踏車 MRP 計算完整範例
//!
//! 這個範例展示完整的 MRP 計算流程：
//! - 產品：腳踏車
//! - 零件：車架、輪子、鋼管、輻條
//! - 需求：依交期日期換算成週期的銷售訂單
//! - 批量：不同零件使用不同批量
//!
//! 執行：`RUST_LOG=debug cargo run --example bike_mrp`

use anyhow::Context;
use chrono::NaiveDate;
use mrp_planner::prelude::*;
use rust_decimal::Decimal;
use tracing_subscriber::{fmt, EnvFilter};

/// 初始化日誌（RUST_LOG 未設定時為 info）
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}

fn main() -> anyhow::Result<()> {
    init_logging();

    println!("🚲 ===== 腳踏車 MRP 計算範例 =====");
    println!();

    // ========== 1. 建立期間日曆 ==========
    println!("📅 步驟 1: 建立週期日曆");
    let anchor = NaiveDate::from_ymd_opt(2025, 11, 3).context("無效的起始日期")?;
    let calendar = PeriodCalendar::weekly(anchor);
    println!("   ✓ 第 1 期從 {} 開始，每期一週", anchor);
    println!();

    // ========== 2. 建立物料與 BOM 結構 ==========
    println!("🔧 步驟 2: 建立物料與 BOM 結構");
    let registry = create_bike_registry()?;
    println!("   ✓ 物料數: {}", registry.len());
    println!();

    // ========== 3. 建立需求 ==========
    println!("📦 步驟 3: 建立銷售訂單需求");
    let demands = vec![
        Demand::on_date(
            "BIKE-001",
            Decimal::from(150),
            NaiveDate::from_ymd_opt(2025, 12, 15).context("無效的需求日期")?,
            DemandType::SalesOrder,
            &calendar,
        )
        .with_source_ref("SO-2025-001"),
        Demand::on_date(
            "BIKE-001",
            Decimal::from(100),
            NaiveDate::from_ymd_opt(2025, 12, 22).context("無效的需求日期")?,
            DemandType::SalesOrder,
            &calendar,
        )
        .with_source_ref("SO-2025-002"),
    ];
    for demand in &demands {
        println!(
            "   ✓ {}: {} 台腳踏車，第 {} 期",
            demand.source_ref.as_deref().unwrap_or("-"),
            demand.quantity,
            demand.period
        );
    }
    println!();

    // ========== 4. 建立現有供應 ==========
    println!("📥 步驟 4: 現有採購訂單");
    let supplies = vec![Supply::on_date(
        "FRAME-001",
        Decimal::from(50),
        NaiveDate::from_ymd_opt(2025, 11, 24).context("無效的到貨日期")?,
        SupplyType::PurchaseOrder,
        &calendar,
    )
    .with_source_ref("PO-2025-100")];
    println!("   ✓ PO-2025-100: 50 個車架，第 {} 期到貨", supplies[0].period);
    println!();

    // ========== 5. 執行 MRP 計算 ==========
    println!("🚀 步驟 5: 執行 MRP 計算");
    let calculator = MrpCalculator::new(registry, PlanningPolicy::new());
    let result = calculator.calculate_with(&demands, &supplies)?;
    println!("   ✓ 完成！耗時 {} ms", result.calculation_time_ms.unwrap_or(0));
    println!(
        "   ✓ 計劃時界: 第 {} 期 ~ 第 {} 期",
        result.horizon.min_period, result.horizon.max_period
    );
    println!();

    // ========== 6. 顯示結果 ==========
    println!("📋 步驟 6: MRP 計算結果");
    println!("----------------------------------------");
    println!("計劃訂單總數: {}", result.planned_orders.len());
    println!();

    for part_id in &result.processing_order {
        println!("物料: {}", part_id);
        for order in result.orders_for(part_id) {
            println!(
                "  ├─ {:?} | 數量: {} | 下達: {} | 完成: {}",
                order.order_type,
                order.quantity,
                calendar.period_start(order.release_period)?,
                calendar.period_start(order.due_period)?
            );
        }

        if let Some(schedule) = result.schedule(part_id) {
            for (date, release, available) in schedule.dated(&calendar)? {
                println!("  │  {} 下達 {:>6} 可用 {:>6}", date, release, available);
            }
        }
        println!();
    }

    // ========== 7. 警告訊息 ==========
    if !result.warnings.is_empty() {
        println!("⚠️  警告訊息:");
        for warning in &result.warnings {
            println!("  - [{}] {}", warning.part_id, warning.message);
        }
        println!();
    }

    println!("✅ MRP 計算完成！");
    Ok(())
}

/// 建立腳踏車物料（提前期以週計）
fn create_bike_registry() -> Result<PartRegistry> {
    PartRegistry::from_parts([
        // 腳踏車（成品）
        Part::new("BIKE-001")
            .with_on_hand(Decimal::from(10))
            .with_safety_stock(Decimal::from(5))
            .with_lead_time(1)
            .with_component("FRAME-001", Decimal::ONE)
            .with_component("WHEEL-001", Decimal::from(2)),
        // 車架 - 批量 100
        Part::new("FRAME-001")
            .with_on_hand(Decimal::from(30))
            .with_safety_stock(Decimal::from(10))
            .with_lead_time(2)
            .with_lot_size(Decimal::from(100))
            .with_component("TUBE-001", Decimal::from(3)),
        // 輪子 - 外購，批量 50
        Part::new("WHEEL-001")
            .with_on_hand(Decimal::from(100))
            .with_safety_stock(Decimal::from(20))
            .with_lead_time(1)
            .with_lot_size(Decimal::from(50))
            .with_procurement_type(ProcurementType::Buy)
            .with_component("SPOKE-001", Decimal::from(36)),
        // 鋼管 - 外購
        Part::new("TUBE-001")
            .with_lead_time(2)
            .with_lot_size(Decimal::from(200))
            .with_procurement_type(ProcurementType::Buy),
        // 輻條 - 外購，每箱 500
        Part::new("SPOKE-001")
            .with_on_hand(Decimal::from(2000))
            .with_lead_time(1)
            .with_lot_size(Decimal::from(500))
            .with_procurement_type(ProcurementType::Buy),
    ])
}
