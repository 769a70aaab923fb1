/// A handle into a [`Table`].
///
/// An id is only meaningful together with the table that produced it; the type system does not
/// track which table that was, so keep ids and tables paired up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemId(pub(crate) usize);

/// Append-only id-addressed storage for IR items.
///
/// Nothing is ever removed, so a handed-out id stays usable for the table's whole lifetime. An
/// item can only mention ids that existed before it was added, which rules out reference cycles
/// between items by construction.
#[derive(Debug, Clone)]
pub struct Table<I>(Vec<I>);

impl<I> Default for Table<I> {
    fn default() -> Self {
        Table(Vec::default())
    }
}

impl<I> Table<I> {
    pub fn add_item(&mut self, item: I) -> ItemId {
        let id = ItemId(self.0.len());
        self.0.push(item);
        id
    }

    /// Panics on an id this table did not produce. A foreign id is not guaranteed to be caught:
    /// if it happens to be in range you silently get the wrong item.
    #[track_caller]
    #[inline]
    pub fn get(&self, id: ItemId) -> &I {
        self.0.get(id.0).expect("Invalid id")
    }

    #[track_caller]
    #[inline]
    pub fn get_mut(&mut self, id: ItemId) -> &mut I {
        self.0.get_mut(id.0).expect("Invalid id")
    }

    /// All ids handed out so far, in insertion order.
    pub fn item_ids(&self) -> impl Iterator<Item = ItemId> {
        (0..self.0.len()).map(ItemId)
    }
}
