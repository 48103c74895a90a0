// Copyright (c) 2026 HOMELINK HUB
//
// This file is part of HomeLink.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@homelink-hub.io

//! One complete poll cycle's worth of device state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::client::FacetMap;

/// Fixed-arity record holding every facet of one successful cycle.
///
/// A snapshot is only ever built whole: either all facets were fetched or
/// the cycle failed and no snapshot exists. Consumers that want the flat
/// host-facing view use [`RouterSnapshot::merged`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RouterSnapshot {
    pub fetched_at: DateTime<Utc>,

    pub block_device_enable_status: FacetMap,
    pub traffic_meter_statistics: FacetMap,
    pub traffic_meter_enabled: FacetMap,
    pub traffic_meter_options: FacetMap,
    pub parental_control_enable_status: FacetMap,
    pub all_mac_addresses: FacetMap,
    pub dns_masq_device_id: FacetMap,
    pub device_info: FacetMap,
    pub support_feature_list: FacetMap,
    pub qos_enable_status: FacetMap,
    pub bandwidth_control_options: FacetMap,
    pub guest_access_enabled: FacetMap,
    pub guest_access_enabled_5g: FacetMap,
    pub wifi_info_2g: FacetMap,
    pub wifi_info_5g: FacetMap,
    pub guest_access_network_info: FacetMap,
    pub guest_access_network_info_5g: FacetMap,
    pub new_firmware: FacetMap,
}

impl RouterSnapshot {
    fn facets(&self) -> [&FacetMap; 18] {
        [
            &self.block_device_enable_status,
            &self.traffic_meter_statistics,
            &self.traffic_meter_enabled,
            &self.traffic_meter_options,
            &self.parental_control_enable_status,
            &self.all_mac_addresses,
            &self.dns_masq_device_id,
            &self.device_info,
            &self.support_feature_list,
            &self.qos_enable_status,
            &self.bandwidth_control_options,
            &self.guest_access_enabled,
            &self.guest_access_enabled_5g,
            &self.wifi_info_2g,
            &self.wifi_info_5g,
            &self.guest_access_network_info,
            &self.guest_access_network_info_5g,
            &self.new_firmware,
        ]
    }

    /// Flatten all facets into one map keyed by the library's field names.
    ///
    /// Facet field names are distinct by construction; should a key ever
    /// collide, the later facet wins.
    pub fn merged(&self) -> FacetMap {
        let mut merged = FacetMap::new();
        for facet in self.facets() {
            for (key, value) in facet {
                merged.insert(key.clone(), value.clone());
            }
        }
        merged
    }

    /// Number of facets carrying at least one field.
    pub fn populated_facets(&self) -> usize {
        self.facets().iter().filter(|facet| !facet.is_empty()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn facet(key: &str, value: &str) -> FacetMap {
        let mut map = FacetMap::new();
        map.insert(key.to_owned(), json!(value));
        map
    }

    #[test]
    fn merged_combines_all_facets() {
        let snapshot = RouterSnapshot {
            traffic_meter_statistics: facet("NewTodayDownload", "1024"),
            qos_enable_status: facet("NewQoSEnableStatus", "1"),
            ..RouterSnapshot::default()
        };

        let merged = snapshot.merged();
        assert_eq!(merged.len(), 2);
        assert_eq!(merged["NewTodayDownload"], json!("1024"));
        assert_eq!(merged["NewQoSEnableStatus"], json!("1"));
    }

    #[test]
    fn key_collisions_are_last_write_wins() {
        let snapshot = RouterSnapshot {
            wifi_info_2g: facet("NewSSID", "home"),
            wifi_info_5g: facet("NewSSID", "home-5g"),
            ..RouterSnapshot::default()
        };

        // wifi_info_5g is declared after wifi_info_2g, so it wins.
        assert_eq!(snapshot.merged()["NewSSID"], json!("home-5g"));
    }
}
