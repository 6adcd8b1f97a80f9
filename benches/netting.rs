//! 多層 BOM 淨算效能測試

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use mrp_planner::prelude::*;
use rust_decimal::Decimal;

/// 產生 `levels` 層、每層 `width` 個物料的 BOM，每個物料用到下一層相鄰的兩個物料
fn layered_registry(levels: usize, width: usize) -> PartRegistry {
    let mut parts = Vec::with_capacity(levels * width);

    for level in 0..levels {
        for index in 0..width {
            let mut part = Part::new(format!("L{level:02}-{index:04}"))
                .with_lead_time(1)
                .with_lot_size(Decimal::from(5));

            if level + 1 < levels {
                for offset in 0..2 {
                    let child = (index + offset) % width;
                    part = part.with_component(format!("L{:02}-{child:04}", level + 1), Decimal::from(2));
                }
            } else {
                part = part.with_on_hand(Decimal::from(100));
            }

            if level == 0 {
                for period in (levels as Period + 2)..(levels as Period + 14) {
                    part = part.with_requirement(period, Decimal::from(10 + index as i64 % 7));
                }
            }

            parts.push(part);
        }
    }

    PartRegistry::from_parts(parts).expect("generated ids are unique")
}

fn bench_calculate(c: &mut Criterion) {
    let mut group = c.benchmark_group("calculate");

    for (levels, width) in [(4, 50), (6, 100), (8, 200)] {
        let calculator = MrpCalculator::new(layered_registry(levels, width), PlanningPolicy::new());
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{levels}x{width}")),
            &calculator,
            |b, calculator| b.iter(|| black_box(calculator.calculate().expect("calculation succeeds"))),
        );
    }

    group.finish();
}

fn bench_partitioned(c: &mut Criterion) {
    // 四個互不相連的產品族群
    let mut registry = PartRegistry::new();
    for family in 0..4 {
        for part in layered_registry(5, 50).parts() {
            let mut part = part.clone();
            part.id = format!("F{family}-{}", part.id);
            part.bom = part
                .bom
                .into_iter()
                .map(|(component, qty)| (format!("F{family}-{component}"), qty))
                .collect();
            registry.insert(part).expect("family prefixes keep ids unique");
        }
    }
    let calculator = MrpCalculator::new(registry, PlanningPolicy::new());

    c.bench_function("calculate_partitioned/4x5x50", |b| {
        b.iter(|| black_box(calculator.calculate_partitioned().expect("calculation succeeds")))
    });
}

criterion_group!(benches, bench_calculate, bench_partitioned);
criterion_main!(benches);
