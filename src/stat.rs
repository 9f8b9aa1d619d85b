use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Stats {
    pub enqueues: usize,
    pub extends: usize,
    pub time_us: usize,
    pub result_depth: Option<usize>,
    pub result_cost: Option<f64>,
}

impl Stats {
    pub fn print(&self) {
        info!(
            "Enqueues {:?} Extends {:?} Time(microseconds) {:?} Result depth {:?} Result cost {:?}",
            self.enqueues, self.extends, self.time_us, self.result_depth, self.result_cost
        );
    }
}
