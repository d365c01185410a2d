mod controller;
mod snapshot;

pub use controller::WellbeingMonitor;
pub use snapshot::WellbeingSnapshot;
