//! Demo mode with a fixed catalog and randomized statuses.
//!
//! No server involved: the feed speaks to the app through the same
//! [`PollEvent`]s the real poller emits, so everything downstream of the
//! channel behaves exactly as it would against a live catalog.

use std::time::Duration;

use rand::{Rng, SeedableRng, rngs::StdRng};
use serde_json::json;
use tokio::sync::mpsc;

use crate::events::{AppEvent, PollEvent};

const DEMO_SERVICES: [(&str, &str, &str, &str, u16); 9] = [
    ("pihole", "Pi-hole", "Network-wide ad blocking", "Network", 8053),
    ("unifi", "UniFi Controller", "Network management", "Network", 8443),
    ("jellyfin", "Jellyfin", "Media server", "Media", 8096),
    ("sonarr", "Sonarr", "Series management", "Media", 8989),
    ("radarr", "Radarr", "Movie management", "Media", 7878),
    ("homeassistant", "Home Assistant", "Home automation", "Automation", 8123),
    ("grafana", "Grafana", "Dashboards and graphs", "Monitoring", 3000),
    ("uptime-kuma", "Uptime Kuma", "Service monitoring", "Monitoring", 3001),
    ("proxmox", "Proxmox VE", "Virtualization host", "Infrastructure", 8006),
];

/// Item ids the demo catalog serves, used as the demo selection.
pub fn selection() -> Vec<String> {
    DEMO_SERVICES.iter().map(|(id, ..)| (*id).to_string()).collect()
}

/// Feeds demo cycles onto the app channel until the receiver goes away.
pub async fn run(tx: mpsc::UnboundedSender<AppEvent>) {
    let mut rng = StdRng::from_entropy();
    let mut interval = tokio::time::interval(Duration::from_secs(3));

    let items = json!(
        DEMO_SERVICES
            .iter()
            .map(|(id, name, description, category, port)| {
                json!({
                    "id": id,
                    "name": name,
                    "description": description,
                    "category": category,
                    "url": format!("http://demo.local:{port}"),
                })
            })
            .collect::<Vec<_>>()
    );

    loop {
        interval.tick().await;

        let statuses = json!(
            DEMO_SERVICES
                .iter()
                .map(|(id, ..)| {
                    let status = if rng.gen_bool(0.05) {
                        json!("unknown")
                    } else {
                        json!(rng.gen_bool(0.9))
                    };
                    ((*id).to_string(), status)
                })
                .collect::<serde_json::Map<String, serde_json::Value>>()
        );

        let event = PollEvent::CycleFinished {
            items: serde_json::from_value(items.clone()).ok(),
            statuses: serde_json::from_value(statuses).ok(),
        };
        if tx.send(AppEvent::Poll(event)).is_err() {
            break;
        }
    }
}
