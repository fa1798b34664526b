//! Component sets and bundles.
//!
//! A *component set* is a tuple of component types; it names an aspect at
//! compile time. A *bundle* is a tuple of component values that can be
//! attached to an entity in one step, producing a single change
//! notification.

use super::aspect::Aspect;
use super::component::{ComponentOf, Schema};
use super::entity::Entity;
use super::storage::Components;

/// A tuple of component types registered in schema `S`.
pub trait ComponentSet<S: Schema> {
    /// Union of the member aspects.
    const ASPECT: Aspect;
}

/// A tuple of component values registered in schema `S`.
pub trait ComponentBundle<S: Schema>: ComponentSet<S> {
    /// Attaches every value to `entity`, replacing existing components.
    #[doc(hidden)]
    fn write_into(self, components: &mut Components<S>, entity: Entity);
}

macro_rules! impl_component_tuples {
    ($($name:ident),+) => {
        impl<S: Schema, $($name: ComponentOf<S>),+> ComponentSet<S> for ($($name,)+) {
            const ASPECT: Aspect = Aspect::EMPTY$(.union(<$name as ComponentOf<S>>::ASPECT))+;
        }

        impl<S: Schema, $($name: ComponentOf<S>),+> ComponentBundle<S> for ($($name,)+) {
            #[allow(non_snake_case)]
            fn write_into(self, components: &mut Components<S>, entity: Entity) {
                let ($($name,)+) = self;
                $(components.write(entity, $name);)+
            }
        }
    };
}

impl_component_tuples!(A);
impl_component_tuples!(A, B);
impl_component_tuples!(A, B, C);
impl_component_tuples!(A, B, C, D);
impl_component_tuples!(A, B, C, D, E);
impl_component_tuples!(A, B, C, D, E, F);
impl_component_tuples!(A, B, C, D, E, F, G);
impl_component_tuples!(A, B, C, D, E, F, G, H);
impl_component_tuples!(A, B, C, D, E, F, G, H, I);
impl_component_tuples!(A, B, C, D, E, F, G, H, I, J);
impl_component_tuples!(A, B, C, D, E, F, G, H, I, J, K);
impl_component_tuples!(A, B, C, D, E, F, G, H, I, J, K, L);

/// Aspect of a list of component types, evaluated at compile time.
///
/// ```rust,ignore
/// const MOVING: Aspect = aspect_of!(GameSchema; Position, Velocity);
/// ```
#[macro_export]
macro_rules! aspect_of {
    ($schema:ty; $($component:ty),+ $(,)?) => {
        <($($component,)+) as $crate::ecs::ComponentSet<$schema>>::ASPECT
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Component;
    use bytemuck::{Pod, Zeroable};

    #[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Mass(f32);

    impl Component for Mass {
        const NAME: &'static str = "Mass";
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Charge(f32);

    impl Component for Charge {
        const NAME: &'static str = "Charge";
    }

    #[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
    #[repr(C)]
    struct Spin(i32);

    impl Component for Spin {
        const NAME: &'static str = "Spin";
    }

    crate::component_schema! {
        struct Particles { Mass, Charge, Spin }
    }

    #[test]
    fn test_set_aspect_is_union() {
        assert_eq!(<(Mass,) as ComponentSet<Particles>>::ASPECT.bits(), 0b001);
        assert_eq!(<(Spin, Mass) as ComponentSet<Particles>>::ASPECT.bits(), 0b101);
        assert_eq!(aspect_of!(Particles; Mass, Charge, Spin), Particles::full_aspect());
    }

    #[test]
    fn test_duplicate_members_collapse() {
        assert_eq!(aspect_of!(Particles; Charge, Charge).bits(), 0b010);
    }
}
