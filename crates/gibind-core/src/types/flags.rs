use bitflags::bitflags;

bitflags! {
    /// Flags of an introspected callable.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FunctionFlags: u32 {
        /// Takes an implicit receiver in native slot 0.
        const IS_METHOD = 1 << 0;
    }
}

bitflags! {
    /// Attributes of a property defined on an engine object.
    ///
    /// Namespace members (functions, enums, enum values) are defined with
    /// `PERMANENT | ENUMERATE` unless the bridge configuration says otherwise.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PropertyFlags: u32 {
        const READ_ONLY = 1 << 0;
        /// Cannot be deleted or redefined.
        const PERMANENT = 1 << 1;
        const ENUMERATE = 1 << 2;
    }
}

impl PropertyFlags {
    /// Flags used for members of a namespace object.
    pub const MODULE: PropertyFlags = PropertyFlags::PERMANENT.union(PropertyFlags::ENUMERATE);
}
