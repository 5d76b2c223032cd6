use dashmap::DashMap;
use std::fmt::Write;
use std::sync::atomic::{AtomicU64, Ordering};

fn escape_label(v: &str) -> String {
    v.replace('\\', "\\\\").replace('"', "\\\"").replace('\n', "\\n")
}

fn label_key(labels: &[(&str, &str)]) -> Vec<(String, String)> {
    let mut key: Vec<(String, String)> = labels
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    key.sort();
    key
}

#[derive(Default)]
pub struct CounterVec {
    map: DashMap<Vec<(String, String)>, AtomicU64>,
}

impl CounterVec {
    pub fn inc(&self, labels: &[(&str, &str)]) {
        let counter = self
            .map
            .entry(label_key(labels))
            .or_insert_with(|| AtomicU64::new(0));
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Current value for an exact label set (0 if never incremented).
    pub fn get(&self, labels: &[(&str, &str)]) -> u64 {
        self.map
            .get(&label_key(labels))
            .map(|c| c.load(Ordering::Relaxed))
            .unwrap_or(0)
    }

    fn render(&self, name: &str, out: &mut String) {
        let _ = writeln!(out, "# TYPE {} counter", name);
        let mut rows: Vec<(String, u64)> = self
            .map
            .iter()
            .map(|r| {
                let labels = r
                    .key()
                    .iter()
                    .map(|(k, v)| format!("{}=\"{}\"", k, escape_label(v)))
                    .collect::<Vec<_>>()
                    .join(",");
                (labels, r.value().load(Ordering::Relaxed))
            })
            .collect();
        rows.sort();
        for (labels, val) in rows {
            let _ = writeln!(out, "{}{{{}}} {}", name, labels, val);
        }
    }
}

/// Counters shared by every context of one runtime.
#[derive(Default)]
pub struct FocusMetrics {
    /// label: decision
    pub guard_decisions: CounterVec,
    /// label: change (shown/hidden)
    pub overlay_transitions: CounterVec,
    /// label: code
    pub settings_rejections: CounterVec,
    /// label: action, outcome
    pub runtime_messages: CounterVec,
}

impl FocusMetrics {
    pub fn render(&self) -> String {
        let mut out = String::new();
        self.guard_decisions.render("focusguard_guard_decisions_total", &mut out);
        self.overlay_transitions.render("focusguard_overlay_transitions_total", &mut out);
        self.settings_rejections.render("focusguard_settings_rejections_total", &mut out);
        self.runtime_messages.render("focusguard_runtime_messages_total", &mut out);
        out
    }
}
