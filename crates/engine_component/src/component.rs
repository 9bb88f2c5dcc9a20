//! Core [`Component`] trait and component-kind identity.
//!
//! A component kind is identified by its **string name**, hashed with FNV-1a
//! 64-bit into a [`ComponentTypeId`]. The name doubles as the label used in
//! error messages and logs, so `MissingComponent` reports `Bullet` rather than
//! an opaque number.

/// A unique identifier for a component kind, derived from its name with the
/// FNV-1a 64-bit hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ComponentTypeId(pub u64);

impl ComponentTypeId {
    /// FNV-1a 64-bit offset basis.
    const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

    /// FNV-1a 64-bit prime.
    const FNV_PRIME: u64 = 0x0100_0000_01b3;

    /// Compute the [`ComponentTypeId`] for a component name.
    ///
    /// ```text
    /// hash = 0xcbf29ce484222325
    /// for each byte in name.as_bytes():
    ///     hash = (hash XOR byte) * 0x00000100000001b3
    /// ```
    #[must_use]
    pub const fn from_name(name: &str) -> Self {
        let bytes = name.as_bytes();
        let mut hash = Self::FNV_OFFSET_BASIS;
        let mut i = 0;
        while i < bytes.len() {
            hash ^= bytes[i] as u64;
            hash = hash.wrapping_mul(Self::FNV_PRIME);
            i += 1;
        }
        Self(hash)
    }

    /// The [`ComponentTypeId`] of a Rust component type.
    #[must_use]
    pub fn of<T: Component>() -> Self {
        Self::from_name(T::type_name())
    }
}

/// The core component trait.
///
/// Components are plain values owned by exactly one entity. Each kind must be
/// known at compile time; the store keeps one typed column per kind.
///
/// # Examples
///
/// ```rust
/// use engine_component::Component;
///
/// #[derive(Debug, Clone, Default)]
/// struct Bullet {
///     fired: bool,
/// }
///
/// impl Component for Bullet {
///     fn type_name() -> &'static str { "Bullet" }
/// }
/// ```
pub trait Component: 'static {
    /// Whether an entity may hold several instances of this kind at once.
    ///
    /// Single-valued kinds (the default) are replaced by a second `add`;
    /// multi-valued kinds accumulate, and are read back with `find_all`.
    const MULTIPLE: bool = false;

    /// A human-readable, unique name for this component kind.
    fn type_name() -> &'static str;

    /// Returns the [`ComponentTypeId`] for this component kind.
    fn component_type_id() -> ComponentTypeId {
        ComponentTypeId::from_name(Self::type_name())
    }
}
