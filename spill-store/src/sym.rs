//! Symbol-table entry records.

use crate::records::{Record, RecordStore};
use crate::strings::StrOffset;

/// Store of symbol-table entries.
pub type SymStore = RecordStore<SymEntry>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
/// Symbol classification.
pub enum SymKind {
    /// Reusable slot.
    #[default]
    Free = 0,
    /// Object with storage.
    Variable = 1,
    /// Function.
    Function = 2,
    /// Typedef name.
    Typedef = 3,
    /// Function parameter.
    Parameter = 4,
    /// Enumerator or other compile-time constant.
    Constant = 5,
}

impl TryFrom<u16> for SymKind {
    type Error = ();

    fn try_from(v: u16) -> Result<Self, ()> {
        use SymKind::*;
        match v {
            0 => Ok(Free),
            1 => Ok(Variable),
            2 => Ok(Function),
            3 => Ok(Typedef),
            4 => Ok(Parameter),
            5 => Ok(Constant),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// One symbol-table entry. The buffer cache treats the record as opaque
/// bytes apart from the `Free` marker.
pub struct SymEntry {
    /// Symbol name, interned in the string store.
    pub name: StrOffset,
    /// Classification.
    pub kind: SymKind,
    /// Type reference; meaning belongs to the semantic passes.
    pub type_ref: u32,
    /// Lexical scope id.
    pub scope: u32,
    /// Kind-dependent value, e.g. an enumerator constant.
    pub value: i32,
}

impl Record for SymEntry {
    const LEN: usize = 16;

    fn write_bytes(&self, out: &mut [u8]) {
        out[0..2].copy_from_slice(&self.name.to_le_bytes());
        out[2..4].copy_from_slice(&(self.kind as u16).to_le_bytes());
        out[4..8].copy_from_slice(&self.type_ref.to_le_bytes());
        out[8..12].copy_from_slice(&self.scope.to_le_bytes());
        out[12..16].copy_from_slice(&self.value.to_le_bytes());
    }

    fn read_bytes(bytes: &[u8]) -> Option<Self> {
        let kind = SymKind::try_from(u16::from_le_bytes([bytes[2], bytes[3]])).ok()?;
        Some(Self {
            name: u16::from_le_bytes([bytes[0], bytes[1]]),
            kind,
            type_ref: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            scope: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            value: i32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
        })
    }
}
