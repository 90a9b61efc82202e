use std::fmt;

/// Direction of a callable parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    In,
    Out,
    InOut,
}

impl Direction {
    /// In and InOut consume a script argument.
    pub const fn is_in(self) -> bool {
        matches!(self, Direction::In | Direction::InOut)
    }

    /// Out and InOut produce a script result.
    pub const fn is_out(self) -> bool {
        matches!(self, Direction::Out | Direction::InOut)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::In => f.write_str("in"),
            Direction::Out => f.write_str("out"),
            Direction::InOut => f.write_str("inout"),
        }
    }
}

/// Who frees native memory once a value has been lifted into the engine.
///
/// - `None`: the callee keeps ownership, nothing is freed.
/// - `Container`: the caller frees the value's own storage (the string, the
///   array or list block, one object reference) but not what it points to.
/// - `Everything`: the caller frees the storage and everything it references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OwnershipMode {
    #[default]
    None,
    Container,
    Everything,
}

impl OwnershipMode {
    pub const fn transfers(self) -> bool {
        !matches!(self, OwnershipMode::None)
    }
}

impl fmt::Display for OwnershipMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OwnershipMode::None => f.write_str("none"),
            OwnershipMode::Container => f.write_str("container"),
            OwnershipMode::Everything => f.write_str("full"),
        }
    }
}
