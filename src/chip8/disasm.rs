//! Decode a program image without running it.

use super::decode::{decode, opcode_from_bytes, Instruction};
use super::PROGRAM_START_ADDRESS;

/// Iterator over `(address, instruction)` pairs of a program image, as it
/// would be laid out from 0x200.
pub struct Disassembly<'a> {
    chunks: std::slice::Chunks<'a, u8>,
    address: u16,
}

impl<'a> Iterator for Disassembly<'a> {
    type Item = (u16, Instruction);

    fn next(&mut self) -> Option<Self::Item> {
        let chunk = self.chunks.next()?;
        // an odd trailing byte is read as if followed by 0x00
        let lo = chunk.get(1).copied().unwrap_or(0);
        let address = self.address;
        self.address = self.address.wrapping_add(2);
        Some((address, decode(opcode_from_bytes(chunk[0], lo))))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

pub fn disassemble(program: &[u8]) -> Disassembly<'_> {
    Disassembly {
        chunks: program.chunks(2),
        address: PROGRAM_START_ADDRESS,
    }
}
