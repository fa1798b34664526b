//! # Component System
//!
//! Components are pure data containers with no behavior.
//! They must be `Pod` and have a fixed size so stores can move them as bytes.
//!
//! Which components exist, and which bit each one owns in an [`Aspect`], is
//! decided once per build by a *schema* declared with [`component_schema!`].
//! Using a component that is not part of a schema, or declaring more than 64
//! components, fails to compile.

use bytemuck::Pod;

use super::aspect::{Aspect, ComponentType};
use crate::memory::RecordLayout;

/// Marker trait for component payloads.
///
/// Components must be:
/// - `Pod`: plain old data, bitwise copyable, no owned pointers
/// - `Default`: the value new storage is initialised with
/// - named: `NAME` shows up in usage diagnostics
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone, Copy, Default, Pod, Zeroable)]
/// #[repr(C)]
/// struct Position {
///     x: f32,
///     y: f32,
/// }
///
/// impl Component for Position {
///     const NAME: &'static str = "Position";
/// }
/// ```
pub trait Component: Pod + Default + Send + Sync + 'static {
    /// Human-readable name for diagnostics.
    const NAME: &'static str;
}

/// A fixed, ordered set of component types.
///
/// Implemented by [`component_schema!`]; not meant to be implemented by hand.
pub trait Schema: 'static {
    /// Number of registered component types (at most 64).
    const COMPONENT_COUNT: usize;

    /// Record layouts of every component, in bit order.
    fn layouts() -> Vec<RecordLayout>;

    /// Aspect covering every registered component type.
    #[must_use]
    fn full_aspect() -> Aspect {
        Aspect::first(Self::COMPONENT_COUNT)
    }
}

/// A component registered in schema `S`.
///
/// The bit index is a constant, so looking it up costs nothing at runtime.
pub trait ComponentOf<S: Schema>: Component {
    /// Bit index of this component in `S`.
    const TYPE: ComponentType;

    /// Single-bit aspect of this component in `S`.
    const ASPECT: Aspect = Aspect::of(Self::TYPE);
}

/// Declares a component schema.
///
/// Generates a unit struct implementing [`Schema`] and one
/// [`ComponentOf`] impl per listed component. Bits are assigned in listing
/// order. Listed names must be component types in scope.
///
/// # Example
///
/// ```rust,ignore
/// component_schema! {
///     /// Everything the simulation knows about.
///     pub struct GameSchema { Position, Velocity, Health }
/// }
///
/// assert_eq!(<Velocity as ComponentOf<GameSchema>>::TYPE, 1);
/// ```
#[macro_export]
macro_rules! component_schema {
    ($(#[$meta:meta])* $vis:vis struct $schema:ident { $($component:ident),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
        $vis struct $schema;

        const _: () = {
            #[allow(non_camel_case_types, dead_code, clippy::upper_case_acronyms)]
            #[repr(u8)]
            enum ComponentSlot {
                $($component,)+
                __Count,
            }

            assert!(
                (ComponentSlot::__Count as usize) <= $crate::ecs::MAX_COMPONENT_TYPES,
                "a component schema holds at most 64 component types"
            );

            impl $crate::ecs::Schema for $schema {
                const COMPONENT_COUNT: usize = ComponentSlot::__Count as usize;

                fn layouts() -> ::std::vec::Vec<$crate::memory::RecordLayout> {
                    ::std::vec![$($crate::memory::RecordLayout::of::<$component>()),+]
                }
            }

            $(
                impl $crate::ecs::ComponentOf<$schema> for $component {
                    const TYPE: $crate::ecs::ComponentType =
                        ComponentSlot::$component as $crate::ecs::ComponentType;
                }
            )+
        };
    };
}
