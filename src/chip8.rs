use log::{debug, trace, warn};

pub mod decode;
pub mod disasm;
pub mod error;
mod instructions;
pub mod random;

pub use decode::{decode, opcode_from_bytes, Instruction};
pub use disasm::disassemble;
pub use error::{Chip8Error, Result};
pub use random::{FixedRandom, RandSource, ThreadRandom};

pub const MEMORY_SIZE: usize = 4096;
pub const STACK_SIZE: usize = 16;
pub const REGISTER_COUNT: usize = 16;
pub const KEY_COUNT: usize = 16;

pub const DISPLAY_WIDTH: usize = 64;
pub const DISPLAY_HEIGHT: usize = 32;

pub const FONT_START_ADDRESS: usize = 0x000;
pub const PROGRAM_START_ADDRESS: u16 = 0x200; // programs start at 0x200
pub const MAX_PROGRAM_SIZE: usize = MEMORY_SIZE - PROGRAM_START_ADDRESS as usize;

/// Hex digit sprites, 5 bytes each.
pub const FONT_SET: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];

/// Pixel grid indexed `[y][x]`, true is lit.
pub type Display = [[bool; DISPLAY_WIDTH]; DISPLAY_HEIGHT];

pub struct Chip8 {
    // CHIP-8 VM
    memory: [u8; MEMORY_SIZE], // system memory
    v: [u8; REGISTER_COUNT],   // registers V0-VE (VF is flag for some instructions)
    i: u16,                    // address register
    pc: u16,                   // program counter
    gfx: Display,              // pixels state
    delay_timer: u8,
    sound_timer: u8, // timers count down at 60Hz, driven from outside
    stack: [u16; STACK_SIZE],
    sp: u16,                 // stack pointer
    keys: [bool; KEY_COUNT], // hex keypad state, down = true

    // emulator resources
    draw_flag: bool,
    waiting_for_key: Option<usize>, // register that receives the next key press
    rng: Box<dyn RandSource>,
}

impl Default for Chip8 {
    fn default() -> Self {
        Self::new(Box::new(ThreadRandom))
    }
}

impl Chip8 {
    pub fn new(rng: Box<dyn RandSource>) -> Self {
        let mut c8 = Self {
            memory: [0; MEMORY_SIZE],
            v: [0; REGISTER_COUNT],
            i: 0,
            pc: PROGRAM_START_ADDRESS,
            gfx: [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT],
            delay_timer: 0,
            sound_timer: 0,
            stack: [0; STACK_SIZE],
            sp: 0,
            keys: [false; KEY_COUNT],

            draw_flag: false,
            waiting_for_key: None,
            rng,
        };
        c8.reset();
        c8
    }

    /// Reset, then load `program` at 0x200.
    pub fn with_program(program: &[u8], rng: Box<dyn RandSource>) -> Result<Self> {
        let mut c8 = Self::new(rng);
        c8.load_program(program)?;
        Ok(c8)
    }

    /// Return to power-on state. Memory is wiped, including the font.
    pub fn reset(&mut self) {
        self.memory = [0; MEMORY_SIZE];
        self.v = [0; REGISTER_COUNT];
        self.i = 0;
        self.pc = PROGRAM_START_ADDRESS;
        self.gfx = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        self.delay_timer = 0;
        self.sound_timer = 0;
        self.stack = [0; STACK_SIZE];
        self.sp = 0;
        self.keys = [false; KEY_COUNT];
        self.draw_flag = false;
        self.waiting_for_key = None;
        debug!("reset");
    }

    /// Copy `program` to 0x200 and (re)install the font at 0x000.
    ///
    /// Programs that don't fit below 0x1000 are rejected without touching memory.
    pub fn load_program(&mut self, program: &[u8]) -> Result<()> {
        if program.len() > MAX_PROGRAM_SIZE {
            return Err(Chip8Error::ProgramTooLarge {
                size: program.len(),
                max: MAX_PROGRAM_SIZE,
            });
        }

        let start = PROGRAM_START_ADDRESS as usize;
        self.memory[start..start + program.len()].copy_from_slice(program);
        // CHIP-8 systems had the interpreter in the first 512 bytes of memory
        // since we're emulating that we can just store the fontset there
        self.memory[FONT_START_ADDRESS..FONT_START_ADDRESS + FONT_SET.len()]
            .copy_from_slice(&FONT_SET);
        debug!("loaded {} byte program", program.len());
        Ok(())
    }

    /// Execute one instruction.
    ///
    /// Returns `Ok(false)` without doing anything while waiting for a key.
    pub fn step(&mut self) -> Result<bool> {
        if self.pc < PROGRAM_START_ADDRESS || self.pc as usize > MEMORY_SIZE - 2 {
            return Err(Chip8Error::PcOutOfBounds { pc: self.pc });
        }

        if self.waiting_for_key.is_some() {
            return Ok(false);
        }

        let pc = self.pc as usize;
        // two-byte opcodes
        let opcode = opcode_from_bytes(self.memory[pc], self.memory[pc + 1]);
        self.pc += 2;

        let instruction = decode(opcode);
        trace!("{:#05X}: {}", pc, instruction);
        instruction.execute(self)?;

        Ok(true)
    }

    /// One 60Hz tick of both timers, stalled while waiting for a key.
    pub fn update_timers(&mut self) {
        if self.waiting_for_key.is_some() {
            return;
        }
        self.delay_timer = self.delay_timer.saturating_sub(1);
        self.sound_timer = self.sound_timer.saturating_sub(1);
    }

    pub fn press_key(&mut self, key: u8) {
        let k = key as usize;
        if k >= KEY_COUNT {
            warn!("ignoring press of invalid key {:#X}", key);
            return;
        }

        if let Some(reg) = self.waiting_for_key.take() {
            debug!("key {:X} resumes execution, stored in V{:X}", key, reg);
            self.v[reg] = key;
        }
        self.keys[k] = true;
    }

    pub fn release_key(&mut self, key: u8) {
        if let Some(k) = self.keys.get_mut(key as usize) {
            *k = false;
        }
    }

    pub fn clear_keys(&mut self) {
        self.keys = [false; KEY_COUNT];
    }

    /// Keys outside 0-F read as not pressed.
    pub fn is_key_pressed(&self, key: u8) -> bool {
        self.keys.get(key as usize).copied().unwrap_or(false)
    }

    pub fn is_waiting_for_key(&self) -> bool {
        self.waiting_for_key.is_some()
    }

    /// Snapshot of the screen.
    pub fn display(&self) -> Display {
        self.gfx
    }

    pub fn pixel(&self, x: usize, y: usize) -> bool {
        self.gfx[y % DISPLAY_HEIGHT][x % DISPLAY_WIDTH]
    }

    pub fn draw_flag(&self) -> bool {
        self.draw_flag
    }

    pub fn clear_draw_flag(&mut self) {
        self.draw_flag = false;
    }

    pub fn sound_active(&self) -> bool {
        self.sound_timer > 0
    }

    pub fn delay_timer(&self) -> u8 {
        self.delay_timer
    }

    pub fn sound_timer(&self) -> u8 {
        self.sound_timer
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn sp(&self) -> u16 {
        self.sp
    }

    pub fn i(&self) -> u16 {
        self.i
    }

    pub fn v(&self, reg: usize) -> u8 {
        self.v[reg & 0xF]
    }

    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    fn check_range(&self, start: usize, len: usize) -> Result<()> {
        if start + len > MEMORY_SIZE {
            return Err(Chip8Error::MemoryOutOfBounds {
                address: start.max(MEMORY_SIZE),
            });
        }
        Ok(())
    }
}
