// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Executor address discovery.
//!
//! Inside WSL2 or a container the executor usually runs on the host machine,
//! which shows up as the resolver nameserver or the default gateway.

use std::net::Ipv4Addr;
use std::path::Path;

use crate::env;

/// Hosts tried after every discovered address.
pub const FALLBACK_HOSTS: &[&str] = &["host.docker.internal", "127.0.0.1"];

const RESOLV_CONF: &str = "/etc/resolv.conf";
const PROC_ROUTE: &str = "/proc/net/route";

/// Merge host sources in priority order, dropping duplicates and blanks.
pub fn candidate_hosts<'a>(sources: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut hosts: Vec<String> = Vec::new();
    for host in sources.into_iter().map(str::trim) {
        if !host.is_empty() && !hosts.iter().any(|h| h == host) {
            hosts.push(host.to_string());
        }
    }
    hosts
}

/// IPv4 `nameserver` entries of a resolv.conf file.
pub fn parse_resolv_conf(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            match (fields.next(), fields.next()) {
                (Some("nameserver"), Some(addr)) => addr.parse::<Ipv4Addr>().ok(),
                _ => None,
            }
        })
        .map(|ip| ip.to_string())
        .collect()
}

/// Gateway of the default route in `/proc/net/route` format.
///
/// Addresses in that file are little-endian hex.
pub fn parse_default_gateway(text: &str) -> Option<Ipv4Addr> {
    text.lines().skip(1).find_map(|line| {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let (destination, gateway) = (fields.get(1)?, fields.get(2)?);
        if *destination != "00000000" || *gateway == "00000000" {
            return None;
        }
        let raw = u32::from_str_radix(gateway, 16).ok()?;
        Some(Ipv4Addr::from(raw.to_le_bytes()))
    })
}

/// Addresses discovered from `RSB_EXECUTOR_HOSTS` and the system files.
pub fn discover_hosts() -> Vec<String> {
    let mut hosts = env::executor_hosts();
    hosts.extend(discover_from_files(Path::new(RESOLV_CONF), Path::new(PROC_ROUTE)));
    hosts
}

/// Nameservers, then the default gateway. Unreadable files contribute nothing.
pub fn discover_from_files(resolv_conf: &Path, route: &Path) -> Vec<String> {
    let mut hosts = std::fs::read_to_string(resolv_conf)
        .map(|text| parse_resolv_conf(&text))
        .unwrap_or_default();
    if let Some(gateway) =
        std::fs::read_to_string(route).ok().and_then(|text| parse_default_gateway(&text))
    {
        hosts.push(gateway.to_string());
    }
    tracing::debug!(hosts = ?hosts, "discovered executor addresses");
    hosts
}

#[cfg(test)]
#[path = "discovery_tests.rs"]
mod tests;
