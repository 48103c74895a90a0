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

//! Per-cycle device refresh.
//!
//! One cycle authenticates, fetches every facet and assembles a complete
//! [`RouterSnapshot`]. Any login failure, client error or timeout aborts
//! the whole cycle - partial snapshots never leave this module. The
//! [`PollDriver`](homelink_core::PollDriver) schedules cycles and retains
//! the last good snapshot across failures.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info};

use homelink_core::{ExecutorSlots, PollSource, UpdateError};

use crate::client::{ClientError, FacetMap, RouterClient};
use crate::config::{FACET_TIMEOUT, FIRMWARE_TIMEOUT, LOGIN_TIMEOUT};
use crate::snapshot::RouterSnapshot;

/// Polls one router through the blocking-call executor slots.
pub struct RouterCoordinator {
    client: Arc<dyn RouterClient>,
    slots: Arc<ExecutorSlots>,
    login_timeout: Duration,
    facet_timeout: Duration,
    firmware_timeout: Duration,
}

impl std::fmt::Debug for RouterCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterCoordinator")
            .field("login_timeout", &self.login_timeout)
            .field("facet_timeout", &self.facet_timeout)
            .field("firmware_timeout", &self.firmware_timeout)
            .finish_non_exhaustive()
    }
}

impl RouterCoordinator {
    pub fn new(client: Arc<dyn RouterClient>, slots: Arc<ExecutorSlots>) -> Self {
        Self {
            client,
            slots,
            login_timeout: LOGIN_TIMEOUT,
            facet_timeout: FACET_TIMEOUT,
            firmware_timeout: FIRMWARE_TIMEOUT,
        }
    }

    /// Override the default deadlines, mainly for tests.
    pub fn with_timeouts(mut self, login: Duration, facet: Duration, firmware: Duration) -> Self {
        self.login_timeout = login;
        self.facet_timeout = facet;
        self.firmware_timeout = firmware;
        self
    }

    async fn fetch_facet<F>(
        &self,
        name: &'static str,
        deadline: Duration,
        call: F,
    ) -> Result<FacetMap, UpdateError>
    where
        F: Future<Output = Result<FacetMap, ClientError>>,
    {
        debug!("Fetching facet '{name}'");
        self.slots
            .run_with_timeout(name, deadline, call)
            .await?
            .map_err(|e| UpdateError::Client { facet: name.to_owned(), message: e.to_string() })
    }
}

#[async_trait]
impl PollSource for RouterCoordinator {
    type Snapshot = RouterSnapshot;

    async fn poll(&self) -> Result<RouterSnapshot, UpdateError> {
        let authenticated = self
            .slots
            .run_with_timeout("login", self.login_timeout, self.client.login())
            .await?
            .map_err(|e| UpdateError::Client {
                facet: "login".to_owned(),
                message: e.to_string(),
            })?;
        if !authenticated {
            return Err(UpdateError::AuthFailed);
        }

        // Facets are independent of each other; the order below is just the
        // declaration order of the snapshot record.
        let client = &self.client;
        let facet = self.facet_timeout;
        let snapshot = RouterSnapshot {
            fetched_at: Utc::now(),
            block_device_enable_status: self
                .fetch_facet("block_device_enable_status", facet, client.block_device_enable_status())
                .await?,
            traffic_meter_statistics: self
                .fetch_facet("traffic_meter_statistics", facet, client.traffic_meter_statistics())
                .await?,
            traffic_meter_enabled: self
                .fetch_facet("traffic_meter_enabled", facet, client.traffic_meter_enabled())
                .await?,
            traffic_meter_options: self
                .fetch_facet("traffic_meter_options", facet, client.traffic_meter_options())
                .await?,
            parental_control_enable_status: self
                .fetch_facet(
                    "parental_control_enable_status",
                    facet,
                    client.parental_control_enable_status(),
                )
                .await?,
            all_mac_addresses: self
                .fetch_facet("all_mac_addresses", facet, client.all_mac_addresses())
                .await?,
            dns_masq_device_id: self
                .fetch_facet("dns_masq_device_id", facet, client.dns_masq_device_id())
                .await?,
            device_info: self.fetch_facet("device_info", facet, client.device_info()).await?,
            support_feature_list: self
                .fetch_facet("support_feature_list", facet, client.support_feature_list())
                .await?,
            qos_enable_status: self
                .fetch_facet("qos_enable_status", facet, client.qos_enable_status())
                .await?,
            bandwidth_control_options: self
                .fetch_facet("bandwidth_control_options", facet, client.bandwidth_control_options())
                .await?,
            guest_access_enabled: self
                .fetch_facet("guest_access_enabled", facet, client.guest_access_enabled())
                .await?,
            guest_access_enabled_5g: self
                .fetch_facet("guest_access_enabled_5g", facet, client.guest_access_enabled_5g())
                .await?,
            wifi_info_2g: self.fetch_facet("wifi_info_2g", facet, client.wifi_info_2g()).await?,
            wifi_info_5g: self.fetch_facet("wifi_info_5g", facet, client.wifi_info_5g()).await?,
            guest_access_network_info: self
                .fetch_facet("guest_access_network_info", facet, client.guest_access_network_info())
                .await?,
            guest_access_network_info_5g: self
                .fetch_facet(
                    "guest_access_network_info_5g",
                    facet,
                    client.guest_access_network_info_5g(),
                )
                .await?,
            new_firmware: self
                .fetch_facet("check_new_firmware", self.firmware_timeout, client.check_new_firmware())
                .await?,
        };

        info!("📡 Router cycle complete ({} facets)", snapshot.populated_facets());
        Ok(snapshot)
    }

    fn name(&self) -> &str {
        "router"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::LanConfigSecurity;
    use homelink_core::PollDriver;
    use serde_json::json;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockRouter {
        login_result: Result<bool, ClientError>,
        login_delay: Duration,
        facet_delays: HashMap<&'static str, Duration>,
        facet_calls: AtomicUsize,
    }

    impl MockRouter {
        fn healthy() -> Self {
            Self {
                login_result: Ok(true),
                login_delay: Duration::ZERO,
                facet_delays: HashMap::new(),
                facet_calls: AtomicUsize::new(0),
            }
        }

        fn with_login(mut self, result: Result<bool, ClientError>) -> Self {
            self.login_result = result;
            self
        }

        fn with_login_delay(mut self, delay: Duration) -> Self {
            self.login_delay = delay;
            self
        }

        fn with_facet_delay(mut self, name: &'static str, delay: Duration) -> Self {
            self.facet_delays.insert(name, delay);
            self
        }

        async fn facet(&self, name: &'static str) -> Result<FacetMap, ClientError> {
            self.facet_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.facet_delays.get(name) {
                tokio::time::sleep(*delay).await;
            }
            let mut map = FacetMap::new();
            map.insert(name.to_owned(), json!("ok"));
            Ok(map)
        }
    }

    // Expands the full trait impl, routing every facet getter through the
    // mock's `facet` helper.
    macro_rules! delegate_router_client {
        ($ty:ty, [$($method:ident),+ $(,)?]) => {
            #[async_trait]
            impl RouterClient for $ty {
                async fn login(&self) -> Result<bool, ClientError> {
                    if self.login_delay > Duration::ZERO {
                        tokio::time::sleep(self.login_delay).await;
                    }
                    self.login_result.clone()
                }

                async fn lan_config_security(&self) -> Result<LanConfigSecurity, ClientError> {
                    Ok(LanConfigSecurity { mac_address: "AA:BB:CC:DD:EE:FF".to_owned() })
                }

                $(async fn $method(&self) -> Result<FacetMap, ClientError> {
                    self.facet(stringify!($method)).await
                })+
            }
        };
    }

    delegate_router_client!(MockRouter, [
        block_device_enable_status,
        traffic_meter_statistics,
        traffic_meter_enabled,
        traffic_meter_options,
        parental_control_enable_status,
        all_mac_addresses,
        dns_masq_device_id,
        device_info,
        support_feature_list,
        qos_enable_status,
        bandwidth_control_options,
        guest_access_enabled,
        guest_access_enabled_5g,
        wifi_info_2g,
        wifi_info_5g,
        guest_access_network_info,
        guest_access_network_info_5g,
        check_new_firmware,
    ]);

    fn coordinator(router: MockRouter) -> RouterCoordinator {
        RouterCoordinator::new(Arc::new(router), Arc::new(ExecutorSlots::default()))
    }

    #[tokio::test]
    async fn full_cycle_produces_complete_snapshot() {
        let snapshot = coordinator(MockRouter::healthy()).poll().await.unwrap();

        assert_eq!(snapshot.populated_facets(), 18);
        let merged = snapshot.merged();
        assert_eq!(merged.len(), 18);
        assert_eq!(merged["traffic_meter_statistics"], json!("ok"));
    }

    #[tokio::test]
    async fn rejected_login_fails_the_cycle() {
        let router = MockRouter::healthy().with_login(Ok(false));
        let err = coordinator(router).poll().await.unwrap_err();
        assert!(matches!(err, UpdateError::AuthFailed));
    }

    #[tokio::test]
    async fn client_error_during_login_fails_the_cycle() {
        let router =
            MockRouter::healthy().with_login(Err(ClientError::Transport("broken pipe".to_owned())));
        let err = coordinator(router).poll().await.unwrap_err();
        assert!(matches!(err, UpdateError::Client { facet, .. } if facet == "login"));
    }

    #[tokio::test(start_paused = true)]
    async fn slow_login_times_out() {
        let router = MockRouter::healthy().with_login_delay(Duration::from_secs(30));
        let err = coordinator(router).poll().await.unwrap_err();
        assert!(matches!(err, UpdateError::Timeout { facet, secs: 5 } if facet == "login"));
    }

    #[tokio::test(start_paused = true)]
    async fn facet_timeout_aborts_the_whole_cycle() {
        // Facet #9 of 18 hangs; the cycle fails without touching #10-#18.
        let router = MockRouter::healthy()
            .with_facet_delay("support_feature_list", Duration::from_secs(30));
        let router = Arc::new(router);
        let coordinator = RouterCoordinator::new(
            Arc::clone(&router) as Arc<dyn RouterClient>,
            Arc::new(ExecutorSlots::default()),
        );

        let driver = PollDriver::new(Arc::new(coordinator), Duration::from_secs(60));
        let err = driver.refresh().await.unwrap_err();

        assert!(matches!(err, UpdateError::Timeout { facet, .. } if facet == "support_feature_list"));
        // No partial snapshot of facets #1-#8 is ever published.
        assert!(driver.last_snapshot().is_none());
        assert!(!driver.last_update_success());
        assert_eq!(router.facet_calls.load(Ordering::SeqCst), 9);
    }

    #[tokio::test(start_paused = true)]
    async fn firmware_check_gets_its_longer_deadline() {
        // 10s is over the facet deadline but within the firmware deadline.
        let router = MockRouter::healthy()
            .with_facet_delay("check_new_firmware", Duration::from_secs(10));

        let snapshot = coordinator(router).poll().await.unwrap();
        assert_eq!(snapshot.populated_facets(), 18);
    }
}
