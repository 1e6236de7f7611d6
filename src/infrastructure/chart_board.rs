use chrono::{DateTime, Local};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::chart::ChartDescriptor;
use crate::domain::chart_slot::{ChartInstanceId, ChartSlot, ChartSurface};
use crate::domain::error::{AppError, Result};

#[derive(Debug, Clone, Serialize)]
pub struct LiveChart {
    pub slot: ChartSlot,
    pub instance: ChartInstanceId,
    pub rendered_at: DateTime<Local>,
    pub descriptor: ChartDescriptor,
}

/// In-memory rendering surface: the charts the front end currently shows,
/// at most one per slot.
#[derive(Debug, Default)]
pub struct ChartBoard {
    live: BTreeMap<ChartSlot, LiveChart>,
    created: usize,
    destroyed: usize,
}

impl ChartBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slot: ChartSlot) -> Option<&LiveChart> {
        self.live.get(&slot)
    }

    /// Live charts in slot order
    pub fn charts(&self) -> Vec<&LiveChart> {
        self.live.values().collect()
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    /// `(created, destroyed)` instance totals since startup
    pub fn lifecycle_counts(&self) -> (usize, usize) {
        (self.created, self.destroyed)
    }
}

impl ChartSurface for ChartBoard {
    fn create(&mut self, slot: ChartSlot, descriptor: ChartDescriptor) -> Result<ChartInstanceId> {
        if let Some(existing) = self.live.get(&slot) {
            return Err(AppError::Internal(format!(
                "Slot {} is still occupied by chart {}",
                slot, existing.instance.0
            )));
        }

        let instance = ChartInstanceId::new();
        self.live.insert(
            slot,
            LiveChart {
                slot,
                instance,
                rendered_at: Local::now(),
                descriptor,
            },
        );
        self.created += 1;
        Ok(instance)
    }

    fn destroy(&mut self, slot: ChartSlot, instance: ChartInstanceId) -> Result<()> {
        match self.live.get(&slot) {
            Some(chart) if chart.instance == instance => {
                self.live.remove(&slot);
                self.destroyed += 1;
                Ok(())
            }
            Some(_) => Err(AppError::Internal(format!(
                "Stale handle for slot {}",
                slot
            ))),
            None => Err(AppError::NotFound(format!("No chart in slot {}", slot))),
        }
    }
}
