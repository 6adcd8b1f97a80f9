//! 相依圖與就緒佇列
//!
//! 依 BOM 建立父件/子件關係，並以 Kahn 演算法的入度計數決定淨算順序：
//! 一個物料在所有父件都計算完成（貢獻完相依需求）後才會進入佇列。

use mrp_core::{MrpError, PartRegistry, Result};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, BTreeSet, HashSet, VecDeque};

/// 相依圖節點
#[derive(Debug, Clone, Default)]
pub struct DependencyNode {
    /// 父件（使用此物料的組件）
    pub parents: Vec<String>,

    /// 子件（此物料 BOM 中的物料）
    pub components: Vec<String>,

    /// 尚未計算完成的父件數量
    pub pending_parents: usize,
}

/// 相依圖
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    nodes: BTreeMap<String, DependencyNode>,
}

impl DependencyGraph {
    /// 由物料登錄表建立相依圖
    ///
    /// 同時檢查資料完整性：批量必須大於零，BOM 子件必須已登錄。
    pub fn build(registry: &PartRegistry) -> Result<Self> {
        if registry.is_empty() {
            return Err(MrpError::NoPartsLoaded);
        }

        let mut nodes: BTreeMap<String, DependencyNode> = registry
            .ids()
            .map(|id| (id.to_string(), DependencyNode::default()))
            .collect();

        for part in registry.parts() {
            if part.lot_size <= Decimal::ZERO {
                return Err(MrpError::InvalidLotSize {
                    part_id: part.id.clone(),
                    lot_size: part.lot_size,
                });
            }

            for component_id in part.bom.keys() {
                let child = nodes.get_mut(component_id).ok_or_else(|| {
                    MrpError::UnknownComponent {
                        parent: part.id.clone(),
                        component: component_id.clone(),
                    }
                })?;
                child.parents.push(part.id.clone());
                child.pending_parents += 1;
            }

            if let Some(node) = nodes.get_mut(&part.id) {
                node.components = part.bom.keys().cloned().collect();
            }
        }

        Ok(Self { nodes })
    }

    pub fn node(&self, id: &str) -> Option<&DependencyNode> {
        self.nodes.get(id)
    }

    /// 尚未計算完成的父件數量
    pub fn pending_parents(&self, id: &str) -> Option<usize> {
        self.nodes.get(id).map(|node| node.pending_parents)
    }

    /// 沒有父件的物料（最終產品），依ID排序
    pub fn roots(&self) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|(_, node)| node.pending_parents == 0)
            .map(|(id, _)| id.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 標記物料計算完成，回傳父件計數因此歸零的子件
    ///
    /// 不論該物料是否產生計劃訂單都會遞減。
    pub fn complete(&mut self, id: &str) -> Vec<String> {
        let components = match self.nodes.get(id) {
            Some(node) => node.components.clone(),
            None => return Vec::new(),
        };

        let mut released = Vec::new();
        for component_id in components {
            if let Some(child) = self.nodes.get_mut(&component_id) {
                child.pending_parents = child.pending_parents.saturating_sub(1);
                if child.pending_parents == 0 {
                    released.push(component_id);
                }
            }
        }
        released
    }

    /// 拓撲順序（從最終產品到原物料）
    ///
    /// 在副本上執行，不影響本圖的計數。掛在根物料下的循環不會出現在結果中。
    pub fn topological_order(&self) -> Result<Vec<String>> {
        let mut graph = self.clone();
        let mut queue = ReadyQueue::seed(&graph)?;
        let mut order = Vec::with_capacity(graph.len());

        while let Some(id) = queue.pop() {
            for component_id in graph.complete(&id) {
                queue.enqueue(component_id);
            }
            order.push(id);
        }

        Ok(order)
    }

    /// 依 BOM 關係（不分方向）切分出互不相連的產品族群
    ///
    /// 每個族群內的物料依ID排序，族群依最小物料ID排序。
    pub fn families(&self) -> Vec<Vec<String>> {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut families = Vec::new();

        for start in self.nodes.keys() {
            if !visited.insert(start.as_str()) {
                continue;
            }

            let mut family = BTreeSet::new();
            let mut queue: VecDeque<&str> = VecDeque::new();
            queue.push_back(start.as_str());

            while let Some(current) = queue.pop_front() {
                family.insert(current.to_string());
                let Some(node) = self.nodes.get(current) else {
                    continue;
                };
                for next in node.parents.iter().chain(&node.components) {
                    if visited.insert(next.as_str()) {
                        queue.push_back(next.as_str());
                    }
                }
            }

            families.push(family.into_iter().collect());
        }

        families
    }
}

/// 就緒佇列（FIFO）
///
/// 每個物料在一次計算中最多入列一次。
#[derive(Debug, Clone, Default)]
pub struct ReadyQueue {
    queue: VecDeque<String>,
    queued: HashSet<String>,
}

impl ReadyQueue {
    /// 以沒有父件的物料建立佇列
    pub fn seed(graph: &DependencyGraph) -> Result<Self> {
        if graph.is_empty() {
            return Err(MrpError::NoPartsLoaded);
        }

        let roots = graph.roots();
        if roots.is_empty() {
            return Err(MrpError::NoRootInDependencyGraph);
        }

        let mut queue = Self::default();
        for id in roots {
            queue.enqueue(id.to_string());
        }
        Ok(queue)
    }

    /// 入列（已入列過的物料回傳 false）
    pub fn enqueue(&mut self, id: String) -> bool {
        if self.queued.contains(&id) {
            return false;
        }
        self.queued.insert(id.clone());
        self.queue.push_back(id);
        true
    }

    pub fn pop(&mut self) -> Option<String> {
        self.queue.pop_front()
    }

    /// 是否曾經入列
    pub fn is_queued(&self, id: &str) -> bool {
        self.queued.contains(id)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mrp_core::Part;

    fn bike_registry() -> PartRegistry {
        // BIKE → FRAME x1, WHEEL x2；FRAME → TUBE x3；WHEEL → TUBE x1（TUBE 有兩個父件）
        PartRegistry::from_parts([
            Part::new("BIKE")
                .with_component("FRAME", Decimal::ONE)
                .with_component("WHEEL", Decimal::from(2)),
            Part::new("FRAME").with_component("TUBE", Decimal::from(3)),
            Part::new("WHEEL").with_component("TUBE", Decimal::ONE),
            Part::new("TUBE"),
        ])
        .unwrap()
    }

    #[test]
    fn test_build_counts_parents() {
        let graph = DependencyGraph::build(&bike_registry()).unwrap();

        assert_eq!(graph.pending_parents("BIKE"), Some(0));
        assert_eq!(graph.pending_parents("FRAME"), Some(1));
        assert_eq!(graph.pending_parents("TUBE"), Some(2));
        assert_eq!(graph.node("TUBE").unwrap().parents, vec!["FRAME", "WHEEL"]);
        assert_eq!(graph.roots(), vec!["BIKE"]);
    }

    #[test]
    fn test_empty_registry() {
        assert!(matches!(
            DependencyGraph::build(&PartRegistry::new()),
            Err(MrpError::NoPartsLoaded)
        ));
    }

    #[test]
    fn test_cycle_without_root() {
        let registry = PartRegistry::from_parts([
            Part::new("A").with_component("B", Decimal::ONE),
            Part::new("B").with_component("A", Decimal::ONE),
        ])
        .unwrap();

        let graph = DependencyGraph::build(&registry).unwrap();
        assert!(matches!(
            ReadyQueue::seed(&graph),
            Err(MrpError::NoRootInDependencyGraph)
        ));
    }

    #[test]
    fn test_unknown_component() {
        let registry =
            PartRegistry::from_parts([Part::new("A").with_component("GHOST", Decimal::ONE)])
                .unwrap();

        assert!(matches!(
            DependencyGraph::build(&registry),
            Err(MrpError::UnknownComponent { parent, component })
                if parent == "A" && component == "GHOST"
        ));
    }

    #[test]
    fn test_invalid_lot_size() {
        let registry =
            PartRegistry::from_parts([Part::new("A").with_lot_size(Decimal::ZERO)]).unwrap();

        assert!(matches!(
            DependencyGraph::build(&registry),
            Err(MrpError::InvalidLotSize { .. })
        ));
    }

    #[test]
    fn test_component_released_after_last_parent() {
        let mut graph = DependencyGraph::build(&bike_registry()).unwrap();

        assert_eq!(graph.complete("BIKE"), vec!["FRAME", "WHEEL"]);
        // 只有一個父件完成，TUBE 仍在等待
        assert!(graph.complete("FRAME").is_empty());
        assert_eq!(graph.pending_parents("TUBE"), Some(1));
        assert_eq!(graph.complete("WHEEL"), vec!["TUBE"]);
    }

    #[test]
    fn test_enqueue_is_idempotent() {
        let graph = DependencyGraph::build(&bike_registry()).unwrap();
        let mut queue = ReadyQueue::seed(&graph).unwrap();

        assert!(queue.is_queued("BIKE"));
        assert!(!queue.enqueue("BIKE".to_string()));
        assert_eq!(queue.len(), 1);

        assert_eq!(queue.pop().as_deref(), Some("BIKE"));
        assert!(queue.is_empty());
        // 出列後仍不可再次入列
        assert!(!queue.enqueue("BIKE".to_string()));
    }

    #[test]
    fn test_topological_order() {
        let graph = DependencyGraph::build(&bike_registry()).unwrap();

        let order = graph.topological_order().unwrap();
        assert_eq!(order, vec!["BIKE", "FRAME", "WHEEL", "TUBE"]);
        // 原圖計數不受影響
        assert_eq!(graph.pending_parents("TUBE"), Some(2));
    }

    #[test]
    fn test_cycle_below_root_is_skipped() {
        let registry = PartRegistry::from_parts([
            Part::new("ROOT").with_component("B", Decimal::ONE),
            Part::new("B").with_component("C", Decimal::ONE),
            Part::new("C").with_component("B", Decimal::ONE),
        ])
        .unwrap();

        let graph = DependencyGraph::build(&registry).unwrap();
        assert_eq!(graph.topological_order().unwrap(), vec!["ROOT"]);
    }

    #[test]
    fn test_families() {
        let mut parts: Vec<Part> = bike_registry().parts().cloned().collect();
        parts.push(Part::new("CART").with_component("AXLE", Decimal::from(2)));
        parts.push(Part::new("AXLE"));
        parts.push(Part::new("LOOSE"));
        let registry = PartRegistry::from_parts(parts).unwrap();

        let families = DependencyGraph::build(&registry).unwrap().families();
        assert_eq!(
            families,
            vec![
                vec!["AXLE".to_string(), "CART".to_string()],
                vec![
                    "BIKE".to_string(),
                    "FRAME".to_string(),
                    "TUBE".to_string(),
                    "WHEEL".to_string()
                ],
                vec!["LOOSE".to_string()],
            ]
        );
    }
}
