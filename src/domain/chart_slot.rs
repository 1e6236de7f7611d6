use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::domain::chart::ChartDescriptor;
use crate::domain::error::{AppError, Result};

/// Named placeholder that hosts at most one live chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ChartSlot {
    #[serde(rename = "emissionChart")]
    Emissions,
    #[serde(rename = "energySourceChart")]
    EnergySources,
    #[serde(rename = "gdpChart")]
    GdpCorrelation,
    #[serde(rename = "renewableShareChart")]
    RenewableShare,
}

impl ChartSlot {
    pub const ALL: [ChartSlot; 4] = [
        ChartSlot::Emissions,
        ChartSlot::EnergySources,
        ChartSlot::GdpCorrelation,
        ChartSlot::RenewableShare,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            ChartSlot::Emissions => "emissionChart",
            ChartSlot::EnergySources => "energySourceChart",
            ChartSlot::GdpCorrelation => "gdpChart",
            ChartSlot::RenewableShare => "renewableShareChart",
        }
    }
}

impl fmt::Display for ChartSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for ChartSlot {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self> {
        ChartSlot::ALL
            .into_iter()
            .find(|slot| slot.id() == s)
            .ok_or_else(|| AppError::NotFound(format!("Unknown chart slot: {}", s)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChartInstanceId(pub Uuid);

impl ChartInstanceId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ChartInstanceId {
    fn default() -> Self {
        Self::new()
    }
}

/// Where chart instances live.
///
/// `create` must refuse a slot that is still occupied; the only way to replace
/// a chart is through the handle returned when it was rendered.
pub trait ChartSurface {
    fn create(&mut self, slot: ChartSlot, descriptor: ChartDescriptor) -> Result<ChartInstanceId>;
    fn destroy(&mut self, slot: ChartSlot, instance: ChartInstanceId) -> Result<()>;
}

/// Ownership of the live chart in one slot.
///
/// Not `Clone`: whoever holds it is the only party able to replace or release
/// that chart.
#[derive(Debug, PartialEq, Eq)]
pub struct ChartHandle {
    slot: ChartSlot,
    instance: ChartInstanceId,
}

impl ChartHandle {
    pub fn slot(&self) -> ChartSlot {
        self.slot
    }

    pub fn instance(&self) -> ChartInstanceId {
        self.instance
    }

    /// Replace this chart. The old instance is destroyed before the new one
    /// is created, with nothing in between.
    pub fn rerender<S: ChartSurface + ?Sized>(
        self,
        surface: &mut S,
        descriptor: ChartDescriptor,
    ) -> Result<ChartHandle> {
        surface.destroy(self.slot, self.instance)?;
        render(surface, self.slot, descriptor)
    }

    pub fn release<S: ChartSurface + ?Sized>(self, surface: &mut S) -> Result<()> {
        surface.destroy(self.slot, self.instance)
    }
}

/// First render into an empty slot.
pub fn render<S: ChartSurface + ?Sized>(
    surface: &mut S,
    slot: ChartSlot,
    descriptor: ChartDescriptor,
) -> Result<ChartHandle> {
    let instance = surface.create(slot, descriptor)?;
    Ok(ChartHandle { slot, instance })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chart::ChartKind;

    #[derive(Default)]
    struct TraceSurface {
        live: Vec<(ChartSlot, ChartInstanceId)>,
        trace: Vec<String>,
    }

    impl ChartSurface for TraceSurface {
        fn create(&mut self, slot: ChartSlot, _descriptor: ChartDescriptor) -> Result<ChartInstanceId> {
            if self.live.iter().any(|(s, _)| *s == slot) {
                return Err(AppError::Internal(format!("{} occupied", slot)));
            }
            let id = ChartInstanceId::new();
            self.live.push((slot, id));
            self.trace.push(format!("create {}", slot));
            Ok(id)
        }

        fn destroy(&mut self, slot: ChartSlot, instance: ChartInstanceId) -> Result<()> {
            self.live.retain(|(s, id)| !(*s == slot && *id == instance));
            self.trace.push(format!("destroy {}", slot));
            Ok(())
        }
    }

    #[test]
    fn test_rerender_destroys_before_create() {
        let mut surface = TraceSurface::default();
        let first = render(&mut surface, ChartSlot::GdpCorrelation, ChartDescriptor::new(ChartKind::Scatter)).unwrap();
        let first_id = first.instance();
        let second = first
            .rerender(&mut surface, ChartDescriptor::new(ChartKind::Scatter))
            .unwrap();

        assert_ne!(second.instance(), first_id);
        assert_eq!(surface.live.len(), 1);
        assert_eq!(
            surface.trace,
            vec!["create gdpChart", "destroy gdpChart", "create gdpChart"]
        );
    }

    #[test]
    fn test_occupied_slot_needs_handle() {
        let mut surface = TraceSurface::default();
        let pie = render(&mut surface, ChartSlot::EnergySources, ChartDescriptor::new(ChartKind::Pie)).unwrap();
        let again = render(&mut surface, ChartSlot::EnergySources, ChartDescriptor::new(ChartKind::Pie));
        assert!(matches!(again, Err(AppError::Internal(_))));

        pie.release(&mut surface).unwrap();
        assert!(surface.live.is_empty());
    }

    #[test]
    fn test_slot_ids_round_trip() {
        for slot in ChartSlot::ALL {
            assert_eq!(slot.id().parse::<ChartSlot>().unwrap(), slot);
        }
        assert!("pieChart".parse::<ChartSlot>().is_err());
    }
}
