use super::model::UserId;

/// Selected row ids, in the order they were toggled on.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<UserId>,
}

impl Selection {
    /// Flip membership of `id`. Returns whether it is selected afterwards.
    pub fn toggle(&mut self, id: UserId) -> bool {
        if let Some(pos) = self.ids.iter().position(|selected| *selected == id) {
            self.ids.remove(pos);
            false
        } else {
            self.ids.push(id);
            true
        }
    }

    pub fn replace_with(&mut self, ids: impl IntoIterator<Item = UserId>) {
        self.ids = ids.into_iter().collect();
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: &UserId) -> bool {
        self.ids.contains(id)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[UserId] {
        &self.ids
    }
}
