//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  The inner integer is `pub` so
//! scenario code can build them from external row ids directly.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// External id of a person (occupant).
    pub struct PersonId(u32);
}

typed_id! {
    /// External id of a dwelling.
    pub struct DwellingId(u32);
}

typed_id! {
    /// Id of an activity model shared by any number of people.
    pub struct ChainId(u32);
}

impl ChainId {
    /// The chain people use unless their scenario names another.
    pub const DEFAULT: ChainId = ChainId(0);
}

impl Default for ChainId {
    fn default() -> Self {
        Self::DEFAULT
    }
}

typed_id! {
    /// Index of an execution context (lane) in the execution pool.
    pub struct ContextId(u32);
}

impl ContextId {
    /// The context of the top-level driver (the conductor's thread).
    ///
    /// Never bound to an entity; continuations awaited by the driver resume
    /// here rather than on any lane.
    pub const MAIN: ContextId = ContextId(u32::MAX);

    #[inline]
    pub fn is_main(self) -> bool {
        self == Self::MAIN
    }
}

/// Identity of one entity across the whole run.
///
/// The execution pool binds contexts by `EntityKey`, and actor handles compare
/// and hash by it, so two handles are equal iff they address the same entity.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EntityKey {
    Person(PersonId),
    Dwelling(DwellingId),
    Environment,
    Logger,
    /// Free-form entity used by embedders and tests.
    Custom(u32),
}

impl fmt::Display for EntityKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKey::Person(id)   => write!(f, "{id}"),
            EntityKey::Dwelling(id) => write!(f, "{id}"),
            EntityKey::Environment  => f.write_str("Environment"),
            EntityKey::Logger       => f.write_str("Logger"),
            EntityKey::Custom(n)    => write!(f, "Custom({n})"),
        }
    }
}
