use crate::error::Result;
use crate::grid::TimeGrid;
use crate::slots::{AvailabilityCheck, DEFAULT_WINDOW_MINUTES, SlotAggregator};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    pub start_hour: u32,
    pub end_hour: u32,
    pub step_minutes: u32,
}

impl Default for GridSettings {
    fn default() -> Self {
        GridSettings {
            start_hour: TimeGrid::DEFAULT_START_HOUR,
            end_hour: TimeGrid::DEFAULT_END_HOUR,
            step_minutes: TimeGrid::DEFAULT_STEP,
        }
    }
}

/// Engine settings, read from the `settings` object of a scenario file.
/// Every field is optional there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub grid: GridSettings,
    pub window_minutes: u32,
    pub check: AvailabilityCheck,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            grid: GridSettings::default(),
            window_minutes: DEFAULT_WINDOW_MINUTES,
            check: AvailabilityCheck::FullWindow,
        }
    }
}

impl EngineConfig {
    pub fn time_grid(&self) -> Result<TimeGrid> {
        TimeGrid::new(self.grid.start_hour, self.grid.end_hour, self.grid.step_minutes)
    }

    pub fn aggregator(&self) -> Result<SlotAggregator> {
        SlotAggregator::new(self.time_grid()?, self.window_minutes, self.check)
    }
}
