//! Game-side half of the API: the engine seam, the closed block/entity
//! enumerations, and the single-threaded dispatcher that owns world state.
//!
//! HTTP handlers never hold a `GameEngine`. They hand closures to a
//! [`Dispatcher`], and the [`GameThread`] runs them one at a time on its tick.

/// Declares a closed enumeration backed by a static table of canonical
/// `SCREAMING_SNAKE_CASE` names. Lookup is case-insensitive, serde goes
/// through the canonical name, and unknown names are an [`UnknownName`] error.
macro_rules! name_table {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($kind:literal) {
            $($variant:ident => $canonical:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Canonical engine name, e.g. `STONE`
            pub fn name(self) -> &'static str {
                match self {
                    $($name::$variant => $canonical),+
                }
            }

            pub fn from_name(name: &str) -> Option<Self> {
                Self::ALL
                    .iter()
                    .copied()
                    .find(|candidate| candidate.name().eq_ignore_ascii_case(name))
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::game::UnknownName;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::from_name(s).ok_or_else(|| $crate::game::UnknownName {
                    kind: $kind,
                    name: s.to_string(),
                })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.name())
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.name())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = <String as serde::Deserialize>::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

pub mod dispatcher;
pub mod engine;
pub mod entity;
pub mod material;

pub use dispatcher::{DispatchError, Dispatcher, GameThread};
pub use engine::{
    BlockPos, ChunkPos, EngineError, EntityId, GameEngine, InMemoryEngine, Location, SpawnedEntity,
};
pub use entity::EntityType;
pub use material::Material;

/// A name that is not a member of one of the closed enumerations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{name}'")]
pub struct UnknownName {
    pub kind: &'static str,
    pub name: String,
}
