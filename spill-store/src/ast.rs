//! AST node records.

use crate::records::{RecIdx, Record, RecordStore};

/// Store of AST node records.
pub type AstStore = RecordStore<AstNode>;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
/// AST node classification.
pub enum AstKind {
    /// Reusable slot; the content of freshly allocated and deleted nodes.
    #[default]
    Free = 0,
    /// Translation unit root.
    Program = 1,
    /// Function definition.
    Function = 2,
    /// Typedef declaration.
    Typedef = 3,
    /// Object declaration.
    Declaration = 4,
    /// Statement.
    Statement = 5,
    /// Expression.
    Expression = 6,
    /// End of the node list.
    Eof = 7,
}

impl TryFrom<u16> for AstKind {
    type Error = ();

    fn try_from(v: u16) -> Result<Self, ()> {
        use AstKind::*;
        match v {
            0 => Ok(Free),
            1 => Ok(Program),
            2 => Ok(Function),
            3 => Ok(Typedef),
            4 => Ok(Declaration),
            5 => Ok(Statement),
            6 => Ok(Expression),
            7 => Ok(Eof),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
/// One AST node. `o1` and `o2` address child or sibling nodes in the same
/// store; 0 means "none".
pub struct AstNode {
    /// Classification.
    pub kind: AstKind,
    /// 0-based index of the token this node was built from.
    pub token: u32,
    /// First child or operand node.
    pub o1: RecIdx,
    /// Second child or sibling node.
    pub o2: RecIdx,
}

impl Record for AstNode {
    const LEN: usize = 16;

    fn write_bytes(&self, out: &mut [u8]) {
        out[0..2].copy_from_slice(&(self.kind as u16).to_le_bytes());
        out[2..4].copy_from_slice(&0u16.to_le_bytes());
        out[4..8].copy_from_slice(&self.token.to_le_bytes());
        out[8..12].copy_from_slice(&self.o1.to_le_bytes());
        out[12..16].copy_from_slice(&self.o2.to_le_bytes());
    }

    fn read_bytes(bytes: &[u8]) -> Option<Self> {
        let kind = AstKind::try_from(u16::from_le_bytes([bytes[0], bytes[1]])).ok()?;
        Some(Self {
            kind,
            token: u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]),
            o1: u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]),
            o2: u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_round_trip() {
        let node = AstNode {
            kind: AstKind::Function,
            token: 9,
            o1: 2,
            o2: 0,
        };
        let mut buf = [0u8; AstNode::LEN];
        node.write_bytes(&mut buf);
        assert_eq!(AstNode::read_bytes(&buf), Some(node));
    }
}
