//! Component schema traits.
//!
//! A schema is a closed set of component kinds chosen by the host
//! application. It is expressed as one enum whose variants carry the
//! component values, paired with a fieldless key enum. The key registry
//! ([`Schema::KEYS`]) is explicit, so storage enumerates component maps
//! without any runtime reflection.
//!
//! The [`component_schema!`](crate::component_schema) macro writes all of
//! this for you.

use std::fmt::Debug;
use std::hash::Hash;

/// Identifies one component kind of a schema.
pub trait ComponentKey: Copy + Eq + Ord + Hash + Debug + 'static {
    /// Returns a stable human-readable name, used in log fields.
    fn name(self) -> &'static str;
}

/// A closed set of component kinds and their value shapes.
///
/// `Self` is the value type of every component; [`Schema::key`] names
/// the component a value belongs to, so a value can never be stored
/// under a foreign key.
pub trait Schema: Clone + Debug + 'static {
    /// The key enum of this schema.
    type Key: ComponentKey;

    /// Every component key, in declaration order.
    const KEYS: &'static [Self::Key];

    /// Returns the key of the component this value belongs to.
    fn key(&self) -> Self::Key;
}

/// A typed component shape belonging to schema `S`.
pub trait Component<S: Schema>: Sized {
    /// The key this component is stored under.
    const KEY: S::Key;

    /// Borrows the component out of a schema value, if it is this kind.
    fn from_value(value: &S) -> Option<&Self>;

    /// Wraps the component into a schema value.
    fn into_value(self) -> S;
}

/// Declares a component schema.
///
/// Generates the schema enum, its key enum, the [`Schema`] and
/// [`ComponentKey`] impls, and one [`Component`] impl plus `From` impl per
/// component. Every component needs its own Rust type; newtypes work well.
/// Component types must implement `Clone`, `Debug` and `PartialEq`.
///
/// ```
/// use tessera_foundation::{Component, ComponentKey, Schema, component_schema};
///
/// #[derive(Clone, Debug, PartialEq)]
/// pub struct Position { pub x: i32, pub y: i32 }
///
/// #[derive(Clone, Debug, PartialEq)]
/// pub struct Health(pub i64);
///
/// component_schema! {
///     /// Components of the demo game.
///     pub enum Game: GameKey {
///         /// Where the entity stands.
///         Position(Position),
///         /// Remaining hit points.
///         Health(Health),
///     }
/// }
///
/// assert_eq!(Game::KEYS, &[GameKey::Position, GameKey::Health]);
/// assert_eq!(Game::from(Health(3)).key(), GameKey::Health);
/// assert_eq!(<Health as Component<Game>>::KEY.name(), "Health");
/// ```
#[macro_export]
macro_rules! component_schema {
    (
        $(#[$meta:meta])*
        $vis:vis enum $schema:ident : $key:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident ( $component:ty )
            ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq)]
        $vis enum $schema {
            $(
                $(#[$variant_meta])*
                $variant($component),
            )+
        }

        #[doc = concat!("Component keys of [`", stringify!($schema), "`].")]
        #[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
        $vis enum $key {
            $(
                #[doc = concat!("Key of the `", stringify!($variant), "` component.")]
                $variant,
            )+
        }

        impl $crate::ComponentKey for $key {
            fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => stringify!($variant), )+
                }
            }
        }

        impl $crate::Schema for $schema {
            type Key = $key;

            const KEYS: &'static [$key] = &[$( $key::$variant ),+];

            fn key(&self) -> $key {
                match self {
                    $( Self::$variant(_) => $key::$variant, )+
                }
            }
        }

        $(
            impl $crate::Component<$schema> for $component {
                const KEY: $key = $key::$variant;

                fn from_value(value: &$schema) -> ::core::option::Option<&Self> {
                    match value {
                        $schema::$variant(component) => ::core::option::Option::Some(component),
                        #[allow(unreachable_patterns)]
                        _ => ::core::option::Option::None,
                    }
                }

                fn into_value(self) -> $schema {
                    $schema::$variant(self)
                }
            }

            impl ::core::convert::From<$component> for $schema {
                fn from(component: $component) -> Self {
                    $schema::$variant(component)
                }
            }
        )+
    };
}
