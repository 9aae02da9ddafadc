// src/domain/lookup.rs

use std::collections::HashMap;

pub const UNKNOWN_AREA: &str = "未知区域";
pub const UNKNOWN_REGION_TYPE: &str = "未知类型";
pub const UNKNOWN_SERVER: &str = "未知服务器";

/// Display names for the integer codes the sales API uses.
/// Built once and handed to the `Normalizer`; nothing mutates it afterwards.
#[derive(Debug, Clone)]
pub struct LookupTables {
    areas: HashMap<i64, String>,
    region_types: HashMap<i64, String>,
    servers: HashMap<u32, String>,
}

impl LookupTables {
    pub fn new(
        areas: HashMap<i64, String>,
        region_types: HashMap<i64, String>,
        servers: HashMap<u32, String>,
    ) -> Self {
        Self {
            areas,
            region_types,
            servers,
        }
    }

    pub fn area_name(&self, code: i64) -> &str {
        self.areas.get(&code).map(String::as_str).unwrap_or(UNKNOWN_AREA)
    }

    pub fn region_type_name(&self, code: i64) -> &str {
        self.region_types
            .get(&code)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_REGION_TYPE)
    }

    pub fn server_name(&self, id: u32) -> &str {
        self.servers
            .get(&id)
            .map(String::as_str)
            .unwrap_or(UNKNOWN_SERVER)
    }

    /// Server ids known to the table, in ascending order.
    pub fn server_ids(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.servers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for LookupTables {
    fn default() -> Self {
        let areas = [
            (0, "海雾村"),
            (1, "薰衣草苗圃"),
            (2, "高脚孤丘"),
            (3, "白银乡"),
            (4, "穹顶皓天"),
        ];

        let region_types = [(0, "其他"), (1, "部队"), (2, "个人")];

        let servers = [
            (1042, "拉诺西亚"),
            (1044, "幻影群岛"),
            (1060, "萌芽池"),
            (1081, "神意之地"),
            (1167, "红玉海"),
            (1173, "宇宙和音"),
            (1174, "沃仙曦染"),
            (1175, "晨曦王座"),
        ];

        Self::new(
            areas.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            region_types.iter().map(|(k, v)| (*k, v.to_string())).collect(),
            servers.iter().map(|(k, v)| (*k, v.to_string())).collect(),
        )
    }
}
