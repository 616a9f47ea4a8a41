use std::fmt::Display;
use std::fmt::Formatter;

use crate::containers::StorageKey;

/// The identifier of a finite-domain integer variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IntVarId {
    id: u32,
}

impl IntVarId {
    pub(crate) const fn new(id: u32) -> Self {
        IntVarId { id }
    }
}

impl StorageKey for IntVarId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        IntVarId::new(index as u32)
    }
}

impl Display for IntVarId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "x{}", self.id)
    }
}

/// The identifier of a set variable.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SetVarId {
    id: u32,
}

impl SetVarId {
    pub(crate) const fn new(id: u32) -> Self {
        SetVarId { id }
    }
}

impl StorageKey for SetVarId {
    fn index(&self) -> usize {
        self.id as usize
    }

    fn create_from_index(index: usize) -> Self {
        SetVarId::new(index as u32)
    }
}

impl Display for SetVarId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "s{}", self.id)
    }
}

/// A reference to a variable of any kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum VariableRef {
    Int(IntVarId),
    Set(SetVarId),
}

impl From<IntVarId> for VariableRef {
    fn from(variable: IntVarId) -> Self {
        VariableRef::Int(variable)
    }
}

impl From<SetVarId> for VariableRef {
    fn from(variable: SetVarId) -> Self {
        VariableRef::Set(variable)
    }
}

impl Display for VariableRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            VariableRef::Int(variable) => variable.fmt(f),
            VariableRef::Set(variable) => variable.fmt(f),
        }
    }
}
