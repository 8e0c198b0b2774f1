use std::collections::BTreeMap;

use playtime_core::DurationRecord;

use super::file::Entries;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Change {
    /// Sessions added on top of whatever the file holds for the id.
    Delta { label: String, delta_ms: u64 },
    /// Absolute state after a delete: `None` while deleted, `Some` once
    /// sessions were added again.
    Replaced(Option<DurationRecord>),
}

/// Mutations not yet known to be on disk. They are replayed over every
/// successful reload so a failed save cannot be undone by the file.
#[derive(Debug, Default)]
pub(crate) struct PendingChanges {
    changes: BTreeMap<u64, Change>,
}

impl PendingChanges {
    pub(crate) fn is_empty(&self) -> bool {
        self.changes.is_empty()
    }

    pub(crate) fn len(&self) -> usize {
        self.changes.len()
    }

    pub(crate) fn clear(&mut self) {
        self.changes.clear();
    }

    pub(crate) fn add_session(&mut self, id: u64, label: &str, delta_ms: u64) {
        match self.changes.get_mut(&id) {
            None => {
                self.changes.insert(
                    id,
                    Change::Delta {
                        label: label.to_string(),
                        delta_ms,
                    },
                );
            }
            Some(Change::Delta {
                label: pending_label,
                delta_ms: pending_ms,
            }) => {
                *pending_ms = pending_ms.saturating_add(delta_ms);
                *pending_label = label.to_string();
            }
            Some(Change::Replaced(slot)) => {
                slot.get_or_insert_with(|| DurationRecord::new(id, label))
                    .add_session(label, delta_ms);
            }
        }
    }

    pub(crate) fn delete(&mut self, id: u64) {
        self.changes.insert(id, Change::Replaced(None));
    }

    pub(crate) fn apply(&self, entries: &mut Entries) {
        for (id, change) in &self.changes {
            match change {
                Change::Delta { label, delta_ms } => entries
                    .entry(*id)
                    .or_insert_with(|| DurationRecord::new(*id, label.as_str()))
                    .add_session(label, *delta_ms),
                Change::Replaced(None) => {
                    entries.remove(id);
                }
                Change::Replaced(Some(record)) => {
                    entries.insert(*id, record.clone());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(records: &[(u64, &str, u64)]) -> Entries {
        records
            .iter()
            .map(|(id, label, total)| {
                (
                    *id,
                    DurationRecord {
                        id: *id,
                        label: label.to_string(),
                        total_duration_ms: *total,
                    },
                )
            })
            .collect()
    }

    #[test]
    fn deltas_stack_on_the_reloaded_total() {
        let mut pending = PendingChanges::default();
        pending.add_session(1, "Old", 2_000);
        pending.add_session(1, "New", 500);
        let mut loaded = entries(&[(1, "Disk", 10_000)]);
        pending.apply(&mut loaded);
        assert_eq!(loaded, entries(&[(1, "New", 12_500)]));
    }

    #[test]
    fn delete_then_add_ignores_the_file_total() {
        let mut pending = PendingChanges::default();
        pending.add_session(4, "Kept", 1_000);
        pending.delete(4);
        pending.add_session(4, "Again", 300);
        pending.delete(5);
        let mut loaded = entries(&[(4, "Disk", 90_000), (5, "Gone", 1), (6, "Other", 7)]);
        pending.apply(&mut loaded);
        assert_eq!(loaded, entries(&[(4, "Again", 300), (6, "Other", 7)]));
        assert_eq!(pending.len(), 2);
    }
}
