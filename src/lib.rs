//! # MRP Planner
//!
//! 物料需求計劃（MRP）淨算引擎
//!
//! - [`mrp_core`]：物料、時界、產能表、計劃策略等資料模型
//! - [`mrp_calc`]：相依圖排程、逐期淨算、BOM 展開與產能檢查
//!
//! ```
//! use mrp_planner::prelude::*;
//!
//! let registry = PartRegistry::from_parts([
//!     Part::new("PUMP")
//!         .with_lead_time(2)
//!         .with_component("IMPELLER", Decimal::from(2))
//!         .with_requirement(6, Decimal::from(30)),
//!     Part::new("IMPELLER").with_lead_time(1).with_lot_size(Decimal::from(25)),
//! ])?;
//!
//! let result = MrpCalculator::new(registry, PlanningPolicy::new()).calculate()?;
//! assert_eq!(result.release("PUMP", 4), Decimal::from(30));
//! assert_eq!(result.release("IMPELLER", 3), Decimal::from(75));
//! # Ok::<(), MrpError>(())
//! ```

pub use mrp_calc;
pub use mrp_core;

/// 常用類型
pub mod prelude {
    pub use mrp_calc::{
        CapacityGate, MrpCalculator, MrpResult, MrpWarning, NetRequirement, PeggingCalculator,
        PeggingRecord, SharedCapacity, Unconstrained, WarningSeverity,
    };
    pub use mrp_core::{
        BucketSize, CapacityTable, Demand, DemandType, Horizon, HorizonPolicy, MrpError,
        OrderAttempt, OrderAttemptRecord, Part, PartRegistry, PartSchedule, Period, PeriodCalendar,
        PlannedOrder, PlannedOrderType, PlanningPolicy, ProcurementType, ResourceProfile, Result,
        Supply, SupplyType,
    };
    pub use rust_decimal::Decimal;
}
