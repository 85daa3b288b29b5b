//! Rendering of server statistics.

use owo_colors::OwoColorize;

use crate::transport::NodeStats;

const RULE: &str = "-------------------------------------------";

/// Metrics that read better as byte sizes than raw numbers.
const BYTE_METRICS: [&str; 4] = [
    "node_memory_heap_alloc",
    "node_memory_heap_sys",
    "node_memory_stack_inuse",
    "node_memory_sys",
];

/// Header block printed above each node's statistics.
pub fn node_header(name: &str, address: &str) -> String {
    format!("{RULE}\nStats for node {name} ({address})\n{RULE}")
}

/// Render one metric across all nodes.
///
/// Each node gets a header block followed by the metric line; an unknown
/// metric name stops the listing with an `Invalid metric` line.
pub fn render_stat(nodes: &[NodeStats], metric: &str, address: &str) -> Vec<String> {
    let mut blocks = Vec::new();
    for node in nodes {
        blocks.push(node_header(&node.name, address));
        match node.metrics.get(metric) {
            Some(value) => blocks.push(format!(" {} : {}", metric, format_metric(metric, *value))),
            None => {
                blocks.push(format!("Invalid metric {metric}"));
                break;
            }
        }
    }
    blocks
}

/// Render per-node metric dumps.
///
/// `mode` is `all` for every metric, or a section prefix (`node`, `http`,
/// `client`) that scopes the listing.
pub fn render_stats(nodes: &[NodeStats], mode: &str, address: &str) -> Vec<String> {
    nodes
        .iter()
        .map(|node| {
            let mut block = node_header(&node.name, address);
            for (key, value) in &node.metrics {
                if mode == "all" || key.starts_with(mode) {
                    block.push_str(&format!("\n - {} : {}", key, format_metric(key, *value)));
                }
            }
            block
        })
        .collect()
}

/// Format a single metric value for display.
///
/// Byte-count metrics are humanized, uptime gets a relative-time
/// annotation, and every value is emphasized in bold.
pub fn format_metric(key: &str, value: i64) -> String {
    let text = if BYTE_METRICS.contains(&key) {
        human_bytes(value.max(0) as u64)
    } else {
        value.to_string()
    };

    let mut msg = text.bold().to_string();
    if key == "node_uptime_seconds" {
        msg.push_str(&format!(" ({})", time_ago(value.max(0) as u64)));
    }
    msg
}

/// SI byte formatting: `1500` renders as `1.5 kB`, `82854982` as `83 MB`.
pub fn human_bytes(n: u64) -> String {
    const SUFFIXES: [&str; 7] = ["B", "kB", "MB", "GB", "TB", "PB", "EB"];

    if n < 10 {
        return format!("{n} B");
    }
    let exp = ((n as f64).log(1000.0).floor() as usize).min(SUFFIXES.len() - 1);
    let val = ((n as f64 / 1000f64.powi(exp as i32)) * 10.0 + 0.5).floor() / 10.0;
    if val < 10.0 {
        format!("{val:.1} {}", SUFFIXES[exp])
    } else {
        format!("{val:.0} {}", SUFFIXES[exp])
    }
}

/// Relative time for an age in seconds, e.g. `3 hours ago`.
pub fn time_ago(seconds: u64) -> String {
    const MINUTE: u64 = 60;
    const HOUR: u64 = 60 * MINUTE;
    const DAY: u64 = 24 * HOUR;
    const WEEK: u64 = 7 * DAY;
    const MONTH: u64 = 30 * DAY;
    const YEAR: u64 = 12 * MONTH;

    let (amount, unit) = match seconds {
        0 => return "now".to_string(),
        s if s < MINUTE => (s, "second"),
        s if s < HOUR => (s / MINUTE, "minute"),
        s if s < DAY => (s / HOUR, "hour"),
        s if s < WEEK => (s / DAY, "day"),
        s if s < MONTH => (s / WEEK, "week"),
        s if s < YEAR => (s / MONTH, "month"),
        s => (s / YEAR, "year"),
    };

    if amount == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{amount} {unit}s ago")
    }
}
