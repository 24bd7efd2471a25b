//! Events emitted when tables are detected or enrichments change.
//!
//! Listeners attach either to one table or to the whole document. Dispatch
//! bubbles: listeners on the table run first, then document listeners.

use serde::Serialize;

use crate::dom::TableId;
use crate::enrich::{Enrichment, TargetKind};

/// A Grid-Sight event.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum GridSightEvent {
    /// A valid table was found and processed.
    TableDetected { table: TableId },
    /// The table's toggle was switched on.
    ToggleActivated { table: TableId },
    /// The table's toggle was switched off.
    ToggleDeactivated { table: TableId },
    /// A heatmap was applied (`active = true`) or removed.
    HeatmapChanged {
        table: TableId,
        index: i64,
        kind: TargetKind,
        active: bool,
    },
    /// A non-heatmap enrichment was applied.
    EnrichmentApplied {
        table: TableId,
        enrichment: Enrichment,
        index: i64,
        kind: TargetKind,
    },
    /// A non-heatmap enrichment was removed.
    EnrichmentRemoved {
        table: TableId,
        enrichment: Enrichment,
        index: i64,
        kind: TargetKind,
    },
}

impl GridSightEvent {
    /// The event name a browser integration would dispatch.
    pub fn name(&self) -> &'static str {
        match self {
            GridSightEvent::TableDetected { .. } => "grid-sight:table-detected",
            GridSightEvent::ToggleActivated { .. } => "grid-sight:toggle-activated",
            GridSightEvent::ToggleDeactivated { .. } => "grid-sight:toggle-deactivated",
            GridSightEvent::HeatmapChanged { .. } => "grid-sight:heatmap-changed",
            GridSightEvent::EnrichmentApplied { .. } => "grid-sight:enrichment-applied",
            GridSightEvent::EnrichmentRemoved { .. } => "grid-sight:enrichment-removed",
        }
    }

    /// The table the event is dispatched on.
    pub fn table(&self) -> TableId {
        match self {
            GridSightEvent::TableDetected { table }
            | GridSightEvent::ToggleActivated { table }
            | GridSightEvent::ToggleDeactivated { table }
            | GridSightEvent::HeatmapChanged { table, .. }
            | GridSightEvent::EnrichmentApplied { table, .. }
            | GridSightEvent::EnrichmentRemoved { table, .. } => *table,
        }
    }

    /// Serialize the event payload.
    pub fn to_json(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Where a listener is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListenerScope {
    /// Only events dispatched on this table.
    Table(TableId),
    /// Every event (receives events after they bubble up).
    Document,
}

/// Handle returned when registering a listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Callback = Box<dyn FnMut(&GridSightEvent)>;

struct Listener {
    id: ListenerId,
    scope: ListenerScope,
    callback: Callback,
}

/// Registered listeners for one document.
#[derive(Default)]
pub struct EventBus {
    listeners: Vec<Listener>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener.
    pub fn subscribe(
        &mut self,
        scope: ListenerScope,
        callback: impl FnMut(&GridSightEvent) + 'static,
    ) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener {
            id,
            scope,
            callback: Box::new(callback),
        });
        id
    }

    /// Remove a listener. Returns false if it was not registered.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    /// Deliver an event to table listeners, then to document listeners.
    pub fn dispatch(&mut self, event: &GridSightEvent) {
        let table = event.table();
        for listener in &mut self.listeners {
            if listener.scope == ListenerScope::Table(table) {
                (listener.callback)(event);
            }
        }
        for listener in &mut self.listeners {
            if listener.scope == ListenerScope::Document {
                (listener.callback)(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
