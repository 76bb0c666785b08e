//! Priority-based same-category conflict resolution.

use contracts::{ConflictShift, PrecisionTime, TimelineEvent};
use tracing::{debug, instrument};

/// Resolver output with per-move diagnostics.
#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub events: Vec<TimelineEvent>,
    pub shifts: Vec<ConflictShift>,
}

/// Pushes lower-or-equal priority events past the events they collide with.
///
/// Events are processed in `(start, input order)` order. An incoming event that
/// outranks every event it collides with is accepted in place; events that were
/// accepted earlier are never moved.
#[derive(Debug, Clone, Copy)]
pub struct ConflictResolver {
    tolerance: PrecisionTime,
}

impl ConflictResolver {
    /// Negative tolerances are clamped to zero.
    pub fn new(tolerance: PrecisionTime) -> Self {
        Self {
            tolerance: tolerance.max(PrecisionTime::ZERO),
        }
    }

    pub fn resolve(&self, events: Vec<TimelineEvent>) -> Vec<TimelineEvent> {
        self.resolve_with_report(events).events
    }

    #[instrument(name = "timeline_sync_resolve_conflicts", level = "debug", skip_all, fields(events = events.len()))]
    pub fn resolve_with_report(&self, events: Vec<TimelineEvent>) -> Resolution {
        let mut pending: Vec<(usize, TimelineEvent)> = events.into_iter().enumerate().collect();
        pending.sort_by_key(|(order, event)| (event.start, *order));

        let mut accepted: Vec<(usize, TimelineEvent)> = Vec::with_capacity(pending.len());
        let mut shifts = Vec::new();

        for (order, event) in pending {
            let from = event.start;
            let (placed, blocked_by) = self.place(event, &accepted);

            if placed.start != from {
                debug!(
                    event_id = %placed.id,
                    category = %placed.category,
                    from = %from,
                    to = %placed.start,
                    "event shifted past conflicting events"
                );
                shifts.push(ConflictShift {
                    event_id: placed.id.clone(),
                    category: placed.category,
                    from,
                    to: placed.start,
                    blocked_by,
                });
            }
            accepted.push((order, placed));
        }

        accepted.sort_by_key(|(order, event)| (event.start, *order));
        Resolution {
            events: accepted.into_iter().map(|(_, event)| event).collect(),
            shifts,
        }
    }

    /// Move `event` later until it no longer collides with an accepted event
    /// of equal or higher priority. Each move starts strictly later, so this ends.
    fn place(
        &self,
        mut event: TimelineEvent,
        accepted: &[(usize, TimelineEvent)],
    ) -> (TimelineEvent, Vec<contracts::EventId>) {
        let mut blocked_by = Vec::new();

        loop {
            let conflicts: Vec<&TimelineEvent> = accepted
                .iter()
                .map(|(_, other)| other)
                .filter(|other| other.conflicts_with(&event))
                .collect();

            let Some(highest) = conflicts.iter().map(|c| c.priority).max() else {
                break;
            };
            if event.priority > highest {
                break;
            }

            let latest_end = conflicts
                .iter()
                .map(|c| c.end)
                .max()
                .unwrap_or(event.end);
            for conflict in &conflicts {
                if !blocked_by.contains(&conflict.id) {
                    blocked_by.push(conflict.id.clone());
                }
            }
            event = event.moved_to(latest_end + self.tolerance);
        }

        (event, blocked_by)
    }
}
