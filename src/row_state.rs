use std::collections::{HashMap, HashSet};
use uuid::Uuid;

/// UI state of a single table row.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RowState<D> {
    #[default]
    Viewing,
    Editing(D),
    ActionMenuOpen,
}

impl<D> RowState<D> {
    pub fn as_ref(&self) -> RowState<&D> {
        match self {
            Self::Viewing => RowState::Viewing,
            Self::Editing(draft) => RowState::Editing(draft),
            Self::ActionMenuOpen => RowState::ActionMenuOpen,
        }
    }
}

/// A row being created. It has no server id yet, so it is tracked under a
/// local draft id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRow<D> {
    pub draft_id: Uuid,
    pub draft: D,
}

/// Row states of one table, keyed by stable record id.
///
/// Rows not in the map are `Viewing`. At most one row is `Editing` and at
/// most one row has its action menu open.
#[derive(Debug, Clone)]
pub struct RowStates<D> {
    rows: HashMap<String, RowState<D>>,
    new_row: Option<NewRow<D>>,
}

impl<D> Default for RowStates<D> {
    fn default() -> Self {
        Self {
            rows: HashMap::new(),
            new_row: None,
        }
    }
}

impl<D> RowStates<D> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, id: &str) -> RowState<&D> {
        self.rows
            .get(id)
            .map_or(RowState::Viewing, RowState::as_ref)
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.find(|state| matches!(state, RowState::Editing(_)))
    }

    pub fn open_menu_id(&self) -> Option<&str> {
        self.find(|state| matches!(state, RowState::ActionMenuOpen))
    }

    /// Puts `id` into editing with `draft`. Any other row being edited goes
    /// back to viewing; its discarded draft is returned.
    pub fn begin_edit(&mut self, id: &str, draft: D) -> Option<D> {
        let previous = self.editing_id().map(str::to_string);
        let discarded = previous.and_then(|previous_id| {
            tracing::debug!(row = %previous_id, next = id, "discarding unsaved row draft");
            match self.rows.remove(&previous_id) {
                Some(RowState::Editing(draft)) => Some(draft),
                _ => None,
            }
        });
        self.rows.insert(id.to_string(), RowState::Editing(draft));
        discarded
    }

    pub fn draft(&self, id: &str) -> Option<&D> {
        match self.rows.get(id) {
            Some(RowState::Editing(draft)) => Some(draft),
            _ => None,
        }
    }

    pub fn draft_mut(&mut self, id: &str) -> Option<&mut D> {
        match self.rows.get_mut(id) {
            Some(RowState::Editing(draft)) => Some(draft),
            _ => None,
        }
    }

    /// Ends editing of `id` and hands the draft back for saving.
    pub fn commit(&mut self, id: &str) -> Option<D> {
        match self.rows.remove(id) {
            Some(RowState::Editing(draft)) => Some(draft),
            Some(other) => {
                self.rows.insert(id.to_string(), other);
                None
            }
            None => None,
        }
    }

    /// Drops the draft of `id`, if any.
    pub fn cancel(&mut self, id: &str) {
        let _ = self.commit(id);
    }

    /// Opens the action menu of `id`, closing any other open menu, or closes
    /// it when already open. A row being edited keeps its draft and the menu
    /// stays closed. Returns whether the menu is open afterwards.
    pub fn toggle_action_menu(&mut self, id: &str) -> bool {
        match self.rows.get(id) {
            Some(RowState::ActionMenuOpen) => {
                self.rows.remove(id);
                false
            }
            Some(RowState::Editing(_)) => {
                tracing::debug!(row = id, "ignoring action menu on row being edited");
                false
            }
            _ => {
                self.close_action_menus();
                self.rows.insert(id.to_string(), RowState::ActionMenuOpen);
                true
            }
        }
    }

    pub fn close_action_menus(&mut self) {
        self.rows
            .retain(|_, state| !matches!(state, RowState::ActionMenuOpen));
    }

    /// Forgets state for rows no longer in the collection.
    pub fn retain_ids<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>) {
        let live: HashSet<&str> = ids.into_iter().collect();
        self.rows.retain(|id, _| live.contains(id.as_str()));
    }

    pub fn begin_create(&mut self, draft: D) -> Uuid {
        let draft_id = Uuid::new_v4();
        if self.new_row.is_some() {
            tracing::debug!(%draft_id, "replacing unsaved new row");
        }
        self.new_row = Some(NewRow { draft_id, draft });
        draft_id
    }

    pub fn new_row(&self) -> Option<&NewRow<D>> {
        self.new_row.as_ref()
    }

    pub fn new_row_mut(&mut self) -> Option<&mut D> {
        self.new_row.as_mut().map(|row| &mut row.draft)
    }

    /// Removes the pending new row, for saving or discarding.
    pub fn take_new_row(&mut self) -> Option<NewRow<D>> {
        self.new_row.take()
    }

    fn find(&self, predicate: impl Fn(&RowState<D>) -> bool) -> Option<&str> {
        self.rows
            .iter()
            .find(|entry| predicate(entry.1))
            .map(|(id, _)| id.as_str())
    }
}
