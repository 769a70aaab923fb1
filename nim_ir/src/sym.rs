use vec1::Vec1;

use crate::table::ItemId;

/// A reference to a [`Sym`] in a [`Module`](crate::Module)'s sym table.
///
/// The same `SymId` is shared by every IR node that refers to the same name, so a rename through
/// [`Sym::update`] is seen everywhere at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymId(pub(crate) ItemId);

/// An interned name together with its rename history.
///
/// The history is never empty and only grows: [`update`](Sym::update) pushes a new name, the
/// original spelling stays available for passes that want to know what a sym used to be called.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sym {
    history: Vec1<String>,
}

impl Sym {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            history: Vec1::new(name.into()),
        }
    }

    /// The current name of the sym.
    pub fn name(&self) -> &str {
        self.history.last()
    }

    /// The name the sym was created with.
    pub fn original_name(&self) -> &str {
        self.history.first()
    }

    /// Rename the sym, keeping the old name in the history.
    pub fn update(&mut self, name: impl Into<String>) {
        self.history.push(name.into());
    }

    /// All names this sym has had, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }
}
