//! TAC instruction records.
//!
//! The instruction layout itself is owned by `spill-ir`; this module only
//! adapts it to the record-store mechanics. The engine does not read the
//! store directly: the driver loads a range of instructions into memory and
//! hands the slice to `spill-vm`.

use crate::records::{Record, RecordStore};

use spill_ir::Instruction;

/// Store of TAC instructions.
pub type TacStore = RecordStore<Instruction>;

impl Record for Instruction {
    const LEN: usize = Instruction::LEN;

    fn write_bytes(&self, out: &mut [u8]) {
        out[..Self::LEN].copy_from_slice(&self.to_bytes());
    }

    fn read_bytes(bytes: &[u8]) -> Option<Self> {
        Instruction::from_bytes(bytes).ok()
    }
}
