//! Prometheus counter exporter for the serving endpoints.

use std::sync::atomic::{AtomicU64, Ordering};

/// Content type for the Prometheus text exposition format
pub const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// A single counter definition
struct CounterDef {
    /// Metric name (must be a valid Prometheus name)
    name: &'static str,
    /// Help text describing the metric
    help: &'static str,
}

const PREDICTIONS_TOTAL: CounterDef = CounterDef {
    name: "predecir_predictions_total",
    help: "Total prediction requests served",
};

const RETRAINS_TOTAL: CounterDef = CounterDef {
    name: "predecir_retrains_total",
    help: "Total successful retraining operations",
};

/// Process-wide request counters
#[derive(Debug, Default)]
pub struct ServiceMetrics {
    predictions_total: AtomicU64,
    retrains_total: AtomicU64,
}

impl ServiceMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one served prediction
    pub fn record_prediction(&self) {
        self.predictions_total.fetch_add(1, Ordering::Relaxed);
    }

    /// Count one successful retrain
    pub fn record_retrain(&self) {
        self.retrains_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn predictions_total(&self) -> u64 {
        self.predictions_total.load(Ordering::Relaxed)
    }

    pub fn retrains_total(&self) -> u64 {
        self.retrains_total.load(Ordering::Relaxed)
    }

    /// Export all counters in Prometheus text format
    pub fn export(&self) -> String {
        let mut output = String::new();
        export_counter(&mut output, &PREDICTIONS_TOTAL, self.predictions_total());
        export_counter(&mut output, &RETRAINS_TOTAL, self.retrains_total());
        output
    }
}

fn export_counter(output: &mut String, def: &CounterDef, value: u64) {
    output.push_str(&format!("# HELP {} {}\n", def.name, def.help));
    output.push_str(&format!("# TYPE {} counter\n", def.name));
    output.push_str(&format!("{} {}\n", def.name, value));
}

// =============================================================================
// Tests
// =============================================================================


// =============================================================================
// Property Tests
// =============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        #[test]
        fn prop_counter_equals_increment_count(n in 0u64..500) {
            let metrics = ServiceMetrics::new();
            for _ in 0..n {
                metrics.record_prediction();
            }
            prop_assert_eq!(metrics.predictions_total(), n);
            let expected = format!("predecir_predictions_total {}", n);
            prop_assert!(metrics.export().contains(&expected));
        }
    }
}
