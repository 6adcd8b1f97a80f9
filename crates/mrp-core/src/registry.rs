//! 物料登錄表
//!
//! 物料的唯一擁有者；依ID排序保存，遍歷順序固定。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::{Demand, MrpError, Part, Period, Result, Supply};

/// 物料登錄表
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartRegistry {
    parts: BTreeMap<String, Part>,
}

impl PartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 由物料清單建立登錄表
    pub fn from_parts<I>(parts: I) -> Result<Self>
    where
        I: IntoIterator<Item = Part>,
    {
        let mut registry = Self::new();
        for part in parts {
            registry.insert(part)?;
        }
        Ok(registry)
    }

    /// 解析 JSON 文件（物料陣列）
    pub fn from_json(json: &str) -> Result<Self> {
        let parts: Vec<Part> = serde_json::from_str(json)?;
        Self::from_parts(parts)
    }

    /// 輸出 JSON 文件（物料陣列）
    pub fn to_json(&self) -> Result<String> {
        let parts: Vec<&Part> = self.parts.values().collect();
        Ok(serde_json::to_string_pretty(&parts)?)
    }

    /// 登錄物料（ID 重複時失敗）
    pub fn insert(&mut self, part: Part) -> Result<()> {
        if self.parts.contains_key(&part.id) {
            return Err(MrpError::DuplicatePart(part.id));
        }
        self.parts.insert(part.id.clone(), part);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&Part> {
        self.parts.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Part> {
        self.parts.get_mut(id)
    }

    /// 取得物料，不存在時回傳 `UnknownPart`
    pub fn require(&self, id: &str) -> Result<&Part> {
        self.get(id).ok_or_else(|| MrpError::UnknownPart(id.to_string()))
    }

    pub fn require_mut(&mut self, id: &str) -> Result<&mut Part> {
        self.parts
            .get_mut(id)
            .ok_or_else(|| MrpError::UnknownPart(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.parts.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.parts.keys().map(String::as_str)
    }

    pub fn parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.values()
    }

    /// 將獨立需求寫入物料的總需求
    pub fn apply_demands(&mut self, demands: &[Demand]) -> Result<()> {
        for demand in demands {
            self.require_mut(&demand.part_id)?
                .add_gross_requirement(demand.period, demand.quantity);
        }
        Ok(())
    }

    /// 將預計收貨寫入物料
    pub fn apply_supplies(&mut self, supplies: &[Supply]) -> Result<()> {
        for supply in supplies {
            let part = self.require_mut(&supply.part_id)?;
            *part
                .scheduled_receipts
                .entry(supply.period)
                .or_insert(rust_decimal::Decimal::ZERO) += supply.quantity;
        }
        Ok(())
    }

    /// 所有總需求出現過的期間
    pub fn requirement_periods(&self) -> impl Iterator<Item = Period> + '_ {
        self.parts
            .values()
            .flat_map(|part| part.gross_requirements.keys().copied())
    }

    /// 取出指定物料組成的子登錄表（ID 不存在時失敗）
    pub fn subset<'a, I>(&self, ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut subset = Self::new();
        for id in ids {
            subset.insert(self.require(id)?.clone())?;
        }
        Ok(subset)
    }
}
