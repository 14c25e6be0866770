//! Dashboard widget layout.
//!
//! The user's widget order is a JSON array of widget ids stored under
//! [`WIDGET_ORDER_KEY`]. On load it is merged with [`DEFAULT_WIDGETS`]: ids
//! no longer in the catalog are dropped and catalog widgets the user has never
//! placed are appended, so new widgets always show up.
//!
//! Reordering is a pure list operation ([`move_widget`], [`nudge_widget`]);
//! [`WidgetLayout`] only adds persistence around it.

use crate::db::DbError;
use crate::storage::LocalStorage;

pub const WIDGET_ORDER_KEY: &str = "omniscope.dashboard.widget-order";

/// Canonical widget catalog, in default order.
pub const DEFAULT_WIDGETS: &[&str] = &[
    "stats",
    "recent-meetings",
    "daily-summary",
    "weekly-summary",
    "open-tasks",
    "people",
    "upcoming-calendar",
    "quick-actions",
];

pub fn default_order() -> Vec<String> {
    DEFAULT_WIDGETS.iter().map(|w| w.to_string()).collect()
}

/// Reconcile a saved order with the catalog.
pub fn merge_with_defaults(saved: &[String]) -> Vec<String> {
    let mut order: Vec<String> = Vec::with_capacity(DEFAULT_WIDGETS.len());
    for id in saved {
        if DEFAULT_WIDGETS.contains(&id.as_str()) && !order.contains(id) {
            order.push(id.clone());
        }
    }
    for id in DEFAULT_WIDGETS {
        if !order.iter().any(|w| w == id) {
            order.push(id.to_string());
        }
    }
    order
}

/// Remove the item at `from` and reinsert it at `to`.
///
/// `to` is an index into the resulting list. Out-of-range indices leave the
/// order unchanged.
pub fn move_widget(order: &[String], from: usize, to: usize) -> Vec<String> {
    let mut next = order.to_vec();
    if from >= next.len() || to >= next.len() || from == to {
        return next;
    }
    let item = next.remove(from);
    next.insert(to, item);
    next
}

/// Shift `id` by `delta` positions, clamped to the ends of the list.
/// Unknown ids leave the order unchanged.
pub fn nudge_widget(order: &[String], id: &str, delta: isize) -> Vec<String> {
    let Some(from) = order.iter().position(|w| w == id) else {
        return order.to_vec();
    };
    let last = order.len().saturating_sub(1) as isize;
    let to = (from as isize).saturating_add(delta).clamp(0, last) as usize;
    move_widget(order, from, to)
}

/// Persistent widget order backed by any [`LocalStorage`].
pub struct WidgetLayout<'a, S: LocalStorage + ?Sized> {
    storage: &'a S,
}

impl<'a, S: LocalStorage + ?Sized> WidgetLayout<'a, S> {
    pub fn new(storage: &'a S) -> Self {
        Self { storage }
    }

    /// Saved order merged with the catalog. Missing or malformed data loads
    /// the default.
    pub fn load(&self) -> Result<Vec<String>, DbError> {
        let Some(raw) = self.storage.get(WIDGET_ORDER_KEY)? else {
            return Ok(default_order());
        };
        match serde_json::from_str::<Vec<String>>(&raw) {
            Ok(saved) => Ok(merge_with_defaults(&saved)),
            Err(e) => {
                log::warn!("Ignoring malformed widget order ({}); using default", e);
                Ok(default_order())
            }
        }
    }

    pub fn save(&self, order: &[String]) -> Result<(), DbError> {
        // Vec<String> always serializes
        let raw = serde_json::to_string(order).unwrap_or_else(|_| "[]".to_string());
        self.storage.set(WIDGET_ORDER_KEY, &raw)
    }

    /// Move a widget and persist the result.
    pub fn reorder(&self, from: usize, to: usize) -> Result<Vec<String>, DbError> {
        let next = move_widget(&self.load()?, from, to);
        self.save(&next)?;
        Ok(next)
    }

    /// Keyboard reordering: shift `id` by `delta` and persist.
    pub fn nudge(&self, id: &str, delta: isize) -> Result<Vec<String>, DbError> {
        let next = nudge_widget(&self.load()?, id, delta);
        self.save(&next)?;
        Ok(next)
    }

    /// Drop the stored override and return the default order.
    pub fn reset(&self) -> Result<Vec<String>, DbError> {
        self.storage.remove(WIDGET_ORDER_KEY)?;
        log::info!("Dashboard layout reset to default");
        Ok(default_order())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn ids(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_merge_drops_unknown_and_appends_missing() {
        let saved = ids(&["people", "retired-widget", "stats", "people"]);
        let merged = merge_with_defaults(&saved);
        assert_eq!(merged[0], "people");
        assert_eq!(merged[1], "stats");
        assert_eq!(merged.len(), DEFAULT_WIDGETS.len());
        assert!(!merged.contains(&"retired-widget".to_string()));
        // Remaining defaults follow in catalog order.
        assert_eq!(merged[2], "recent-meetings");
        assert_eq!(merged.last().unwrap(), "quick-actions");
    }

    #[test]
    fn test_move_widget() {
        let order = ids(&["a", "b", "c", "d"]);
        assert_eq!(move_widget(&order, 0, 2), ids(&["b", "c", "a", "d"]));
        assert_eq!(move_widget(&order, 3, 0), ids(&["d", "a", "b", "c"]));
        assert_eq!(move_widget(&order, 1, 1), order);
        assert_eq!(move_widget(&order, 4, 0), order);
        assert_eq!(move_widget(&order, 0, 9), order);
        // Input untouched.
        assert_eq!(order, ids(&["a", "b", "c", "d"]));
    }

    #[test]
    fn test_nudge_widget_clamps() {
        let order = ids(&["a", "b", "c"]);
        assert_eq!(nudge_widget(&order, "b", -1), ids(&["b", "a", "c"]));
        assert_eq!(nudge_widget(&order, "b", 5), ids(&["a", "c", "b"]));
        assert_eq!(nudge_widget(&order, "a", -3), order);
        assert_eq!(nudge_widget(&order, "zzz", 1), order);
    }

    #[test]
    fn test_save_and_reload_exact_order() {
        let storage = MemoryStorage::new();
        let layout = WidgetLayout::new(&storage);

        let mut custom = default_order();
        custom.reverse();
        layout.save(&custom).unwrap();
        assert_eq!(layout.load().unwrap(), custom);
    }

    #[test]
    fn test_reorder_persists() {
        let storage = MemoryStorage::new();
        let layout = WidgetLayout::new(&storage);

        let moved = layout.reorder(0, 3).unwrap();
        assert_eq!(moved[3], "stats");
        assert_eq!(layout.load().unwrap(), moved);
    }

    #[test]
    fn test_reset_restores_default_and_clears_override() {
        let storage = MemoryStorage::new();
        let layout = WidgetLayout::new(&storage);

        layout.nudge("quick-actions", -10).unwrap();
        assert!(storage.get(WIDGET_ORDER_KEY).unwrap().is_some());

        assert_eq!(layout.reset().unwrap(), default_order());
        assert!(storage.get(WIDGET_ORDER_KEY).unwrap().is_none());
        assert_eq!(layout.load().unwrap(), default_order());
    }

    #[test]
    fn test_malformed_saved_order_loads_default() {
        let storage = MemoryStorage::new();
        storage.set(WIDGET_ORDER_KEY, "{not json").unwrap();
        let layout = WidgetLayout::new(&storage);
        assert_eq!(layout.load().unwrap(), default_order());
    }

    #[test]
    fn test_nudge_extreme_deltas_clamp_to_ends() {
        let order = default_order();

        let to_end = nudge_widget(&order, "recent-meetings", isize::MAX);
        assert_eq!(to_end.last().map(String::as_str), Some("recent-meetings"));
        assert_eq!(to_end.len(), order.len());

        let to_front = nudge_widget(&order, "quick-actions", isize::MIN);
        assert_eq!(to_front[0], "quick-actions");
    }
}
