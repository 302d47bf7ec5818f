use core::fmt;
use core::num::NonZeroU32;

/// Registry key, stable for the lifetime of a loaded project.
///
/// Publicly a 0-based index into the owning registry vector; backed by
/// `NonZeroU32` so `Option<Id>` costs no extra space in entity fields.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Id(NonZeroU32);

impl Id {
    pub fn from_index(index: u32) -> Self {
        // stored as index+1, which cannot be zero
        Self(NonZeroU32::new(index + 1).expect("index+1 is nonzero"))
    }

    pub fn index(self) -> u32 {
        self.0.get() - 1
    }
}

impl fmt::Debug for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Id({})", self.index())
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index())
    }
}

// Serialized as the 0-based index so snapshots stay readable.
impl serde::Serialize for Id {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.index())
    }
}

impl<'de> serde::Deserialize<'de> for Id {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let index = u32::deserialize(deserializer)?;
        if index == u32::MAX {
            return Err(serde::de::Error::custom("id index out of range"));
        }
        Ok(Id::from_index(index))
    }
}

/// Aliases naming which registry an Id indexes into. Purely documentary:
/// the compiler does not keep a StoryId out of an element lookup.
pub type ProjectId = Id;
pub type StoryId = Id;
pub type ElementId = Id;
pub type LoadCaseId = Id;
pub type ResultSetId = Id;
