use std::fmt;

use super::error::Result;
use super::Chip8;

/// State transition applied by one instruction; pc is already past the opcode.
pub type Exec = fn(&mut Chip8, u16) -> Result<()>;

const UNKNOWN: &str = "Unknown opcode";

/// A decoded opcode, ready to run against a machine.
#[derive(Clone, Copy)]
pub struct Instruction {
    pub opcode: u16,
    pub description: &'static str,
    exec: Exec,
}

impl Instruction {
    fn new(opcode: u16, description: &'static str, exec: Exec) -> Self {
        Self {
            opcode,
            description,
            exec,
        }
    }

    fn unknown(opcode: u16) -> Self {
        Self::new(opcode, UNKNOWN, Chip8::unknown)
    }

    pub fn is_unknown(&self) -> bool {
        self.description == UNKNOWN
    }

    pub fn execute(&self, c8: &mut Chip8) -> Result<()> {
        (self.exec)(c8, self.opcode)
    }
}

impl fmt::Debug for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Instruction")
            .field("opcode", &format_args!("{:#06x}", self.opcode))
            .field("description", &self.description)
            .finish()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x} ; {}", self.opcode, self.description)
    }
}

/// Two-byte opcodes are stored big-endian.
pub fn opcode_from_bytes(hi: u8, lo: u8) -> u16 {
    (hi as u16) << 8 | lo as u16
}

pub fn x(op: u16) -> usize {
    ((op & 0xF00) >> 8) as usize
}

pub fn y(op: u16) -> usize {
    ((op & 0xF0) >> 4) as usize
}

pub fn kk(op: u16) -> u8 {
    (op & 0xFF) as u8
}

pub fn nnn(op: u16) -> u16 {
    op & 0xFFF
}

pub fn n(op: u16) -> u8 {
    (op & 0xF) as u8
}

// indexed by the top nibble
static FAMILIES: [fn(u16) -> Instruction; 16] = [
    sys,   // 0***
    jmp,   // 1NNN
    call,  // 2NNN
    seb,   // 3XKK
    sneb,  // 4XKK
    ser,   // 5XY0
    ld,    // 6XKK
    addb,  // 7XKK
    alu,   // 8XY*
    sner,  // 9XY0
    si,    // ANNN
    jmpo,  // BNNN
    rnd,   // CXKK
    draw,  // DXYN
    key,   // EX**
    misc,  // FX**
];

/// Map any 16-bit value to an instruction; unmatched sub-opcodes decode to a no-op.
pub fn decode(op: u16) -> Instruction {
    FAMILIES[(op >> 12) as usize](op)
}

fn sys(op: u16) -> Instruction {
    match op {
        0x00E0 => Instruction::new(op, "Clear the screen", Chip8::cls),
        0x00EE => Instruction::new(op, "Return from a subroutine", Chip8::ret),
        _ => Instruction::new(
            op,
            "Call machine code routine at nnn [IGNORED]",
            Chip8::sys,
        ),
    }
}

fn jmp(op: u16) -> Instruction {
    Instruction::new(op, "JUMP to location nnn", Chip8::jmp)
}

fn call(op: u16) -> Instruction {
    Instruction::new(op, "CALL subroutine at nnn", Chip8::call)
}

fn seb(op: u16) -> Instruction {
    Instruction::new(op, "Skip next instruction if Vx == kk", Chip8::seb)
}

fn sneb(op: u16) -> Instruction {
    Instruction::new(op, "Skip next instruction if Vx != kk", Chip8::sneb)
}

fn ser(op: u16) -> Instruction {
    Instruction::new(op, "Skip next instruction if Vx == Vy", Chip8::ser)
}

fn ld(op: u16) -> Instruction {
    Instruction::new(op, "LOAD kk into Vx", Chip8::ld)
}

fn addb(op: u16) -> Instruction {
    Instruction::new(op, "ADD kk to Vx, no carry", Chip8::addb)
}

fn alu(op: u16) -> Instruction {
    match op & 0xF {
        0x0 => Instruction::new(op, "Store the value of Vy in Vx", Chip8::mov),
        0x1 => Instruction::new(op, "Store bitwise OR of Vx and Vy in Vx", Chip8::or),
        0x2 => Instruction::new(op, "Store bitwise AND of Vx and Vy in Vx", Chip8::and),
        0x3 => Instruction::new(op, "Store bitwise XOR of Vx and Vy in Vx", Chip8::xor),
        0x4 => Instruction::new(
            op,
            "ADD Vy to Vx, VF = 1 if the result carries",
            Chip8::addr,
        ),
        0x5 => Instruction::new(
            op,
            "Subtract Vy from Vx, VF = Vx > Vy ? 1 : 0",
            Chip8::sub,
        ),
        0x6 => Instruction::new(op, "Shift Vx right, VF = LSB of Vx", Chip8::shr),
        0x7 => Instruction::new(
            op,
            "Set Vx to Vy - Vx, VF = Vy > Vx ? 1 : 0",
            Chip8::subn,
        ),
        0xE => Instruction::new(op, "Shift Vx left, VF = MSB of Vx", Chip8::shl),
        _ => Instruction::unknown(op),
    }
}

fn sner(op: u16) -> Instruction {
    Instruction::new(op, "Skip next instruction if Vx != Vy", Chip8::sner)
}

fn si(op: u16) -> Instruction {
    Instruction::new(op, "Set I to nnn", Chip8::si)
}

fn jmpo(op: u16) -> Instruction {
    Instruction::new(op, "JUMP to location nnn + V0", Chip8::jmpo)
}

fn rnd(op: u16) -> Instruction {
    Instruction::new(op, "Set Vx to a random byte AND kk", Chip8::rnd)
}

fn draw(op: u16) -> Instruction {
    Instruction::new(
        op,
        "Draw n-byte sprite from I at (Vx, Vy), VF = collision",
        Chip8::draw,
    )
}

fn key(op: u16) -> Instruction {
    match op & 0xFF {
        0x9E => Instruction::new(
            op,
            "Skip next instruction if key with value in Vx is pressed",
            Chip8::skp,
        ),
        0xA1 => Instruction::new(
            op,
            "Skip next instruction if key with value in Vx is NOT pressed",
            Chip8::sknp,
        ),
        _ => Instruction::unknown(op),
    }
}

fn misc(op: u16) -> Instruction {
    match op & 0xFF {
        0x07 => Instruction::new(op, "Set Vx to value of delay timer", Chip8::ldvdt),
        0x0A => Instruction::new(
            op,
            "Wait for a key press, store key value in Vx",
            Chip8::wait_key,
        ),
        0x15 => Instruction::new(op, "Set delay timer to Vx", Chip8::lddt),
        0x18 => Instruction::new(op, "Set sound timer to Vx", Chip8::ldst),
        0x1E => Instruction::new(op, "Add Vx to I", Chip8::addi),
        0x29 => Instruction::new(
            op,
            "Set I to the font sprite for the character in Vx",
            Chip8::font,
        ),
        0x33 => Instruction::new(
            op,
            "Store BCD of Vx, hundreds at I, tens at I+1, ones at I+2",
            Chip8::bcd,
        ),
        0x55 => Instruction::new(
            op,
            "Store V0 to Vx in memory starting at I",
            Chip8::store,
        ),
        0x65 => Instruction::new(
            op,
            "Load V0 to Vx from memory starting at I",
            Chip8::load,
        ),
        _ => Instruction::unknown(op),
    }
}
