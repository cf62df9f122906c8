use log::{debug, warn};

use super::decode::{kk, n, nnn, x, y};
use super::error::{Chip8Error, Result};
use super::{Chip8, DISPLAY_HEIGHT, DISPLAY_WIDTH, FONT_START_ADDRESS, STACK_SIZE};

// Each handler runs with pc already advanced past its own opcode, so a skip
// is a further += 2 and a call pushes the address of the next instruction.
impl Chip8 {
    pub(super) fn unknown(&mut self, op: u16) -> Result<()> {
        warn!("unknown opcode {:#06X} at {:#05X}", op, self.pc.wrapping_sub(2));
        Ok(())
    }

    pub(super) fn cls(&mut self, _op: u16) -> Result<()> {
        // 00E0
        self.gfx = [[false; DISPLAY_WIDTH]; DISPLAY_HEIGHT];
        self.draw_flag = true;
        Ok(())
    }

    pub(super) fn ret(&mut self, _op: u16) -> Result<()> {
        // 00EE
        if self.sp == 0 {
            return Err(Chip8Error::StackUnderflow {
                pc: self.pc.wrapping_sub(2),
            });
        }
        self.sp -= 1;
        self.pc = self.stack[self.sp as usize];
        Ok(())
    }

    pub(super) fn sys(&mut self, _op: u16) -> Result<()> {
        // 0NNN
        // interpreters ignore this
        Ok(())
    }

    pub(super) fn jmp(&mut self, op: u16) -> Result<()> {
        // 1NNN
        self.pc = nnn(op);
        Ok(())
    }

    pub(super) fn call(&mut self, op: u16) -> Result<()> {
        // 2NNN
        if self.sp as usize >= STACK_SIZE {
            return Err(Chip8Error::StackOverflow {
                pc: self.pc.wrapping_sub(2),
            });
        }
        self.stack[self.sp as usize] = self.pc;
        self.sp += 1;
        self.pc = nnn(op);
        Ok(())
    }

    fn skip_if(&mut self, cond: bool) {
        if cond {
            self.pc += 2;
        }
    }

    pub(super) fn seb(&mut self, op: u16) -> Result<()> {
        // 3XKK
        self.skip_if(self.v[x(op)] == kk(op));
        Ok(())
    }

    pub(super) fn sneb(&mut self, op: u16) -> Result<()> {
        // 4XKK
        self.skip_if(self.v[x(op)] != kk(op));
        Ok(())
    }

    pub(super) fn ser(&mut self, op: u16) -> Result<()> {
        // 5XY0
        self.skip_if(self.v[x(op)] == self.v[y(op)]);
        Ok(())
    }

    pub(super) fn ld(&mut self, op: u16) -> Result<()> {
        // 6XKK
        self.v[x(op)] = kk(op);
        Ok(())
    }

    pub(super) fn addb(&mut self, op: u16) -> Result<()> {
        // 7XKK
        // VF untouched
        let x = x(op);
        self.v[x] = self.v[x].wrapping_add(kk(op));
        Ok(())
    }

    pub(super) fn mov(&mut self, op: u16) -> Result<()> {
        // 8XY0
        self.v[x(op)] = self.v[y(op)];
        Ok(())
    }

    pub(super) fn or(&mut self, op: u16) -> Result<()> {
        // 8XY1
        self.v[x(op)] |= self.v[y(op)];
        Ok(())
    }

    pub(super) fn and(&mut self, op: u16) -> Result<()> {
        // 8XY2
        self.v[x(op)] &= self.v[y(op)];
        Ok(())
    }

    pub(super) fn xor(&mut self, op: u16) -> Result<()> {
        // 8XY3
        self.v[x(op)] ^= self.v[y(op)];
        Ok(())
    }

    // With x == F, 8XY4 leaves the carry in VF while 8XY5/6/7/E leave the
    // result there, since they set the flag before writing Vx.

    pub(super) fn addr(&mut self, op: u16) -> Result<()> {
        // 8XY4
        let (x, y) = (x(op), y(op));
        let sum = self.v[x] as u16 + self.v[y] as u16;
        self.v[x] = (sum & 0xFF) as u8;
        self.v[0xF] = (sum > 0xFF) as u8;
        Ok(())
    }

    pub(super) fn sub(&mut self, op: u16) -> Result<()> {
        // 8XY5
        let (vx, vy) = (self.v[x(op)], self.v[y(op)]);
        self.v[0xF] = (vx > vy) as u8;
        self.v[x(op)] = vx.wrapping_sub(vy);
        Ok(())
    }

    pub(super) fn shr(&mut self, op: u16) -> Result<()> {
        // 8XY6
        let vx = self.v[x(op)];
        self.v[0xF] = vx & 0x1;
        self.v[x(op)] = vx >> 1;
        Ok(())
    }

    pub(super) fn subn(&mut self, op: u16) -> Result<()> {
        // 8XY7
        let (vx, vy) = (self.v[x(op)], self.v[y(op)]);
        self.v[0xF] = (vy > vx) as u8;
        self.v[x(op)] = vy.wrapping_sub(vx);
        Ok(())
    }

    pub(super) fn shl(&mut self, op: u16) -> Result<()> {
        // 8XYE
        let vx = self.v[x(op)];
        self.v[0xF] = vx >> 7;
        self.v[x(op)] = vx << 1;
        Ok(())
    }

    pub(super) fn sner(&mut self, op: u16) -> Result<()> {
        // 9XY0
        self.skip_if(self.v[x(op)] != self.v[y(op)]);
        Ok(())
    }

    pub(super) fn si(&mut self, op: u16) -> Result<()> {
        // ANNN
        self.i = nnn(op);
        Ok(())
    }

    pub(super) fn jmpo(&mut self, op: u16) -> Result<()> {
        // BNNN
        self.pc = nnn(op) + self.v[0] as u16;
        Ok(())
    }

    pub(super) fn rnd(&mut self, op: u16) -> Result<()> {
        // CXKK
        self.v[x(op)] = self.rng.byte() & kk(op);
        Ok(())
    }

    pub(super) fn draw(&mut self, op: u16) -> Result<()> {
        // DXYN
        // each sprite row is one byte, MSB leftmost, XORed onto the screen
        let vx = self.v[x(op)] as usize;
        let vy = self.v[y(op)] as usize;
        let height = n(op) as usize;
        let i = self.i as usize;
        self.check_range(i, height)?;

        let mut collision = false;
        for row in 0..height {
            let line = self.memory[i + row];
            let py = (vy + row) % DISPLAY_HEIGHT;
            for col in 0..8 {
                if line & (0x80 >> col) == 0 {
                    continue;
                }
                let px = (vx + col) % DISPLAY_WIDTH;
                let pixel = &mut self.gfx[py][px];
                collision |= *pixel;
                *pixel = !*pixel;
            }
        }

        self.v[0xF] = collision as u8;
        self.draw_flag = true;
        Ok(())
    }

    pub(super) fn skp(&mut self, op: u16) -> Result<()> {
        // EX9E
        let pressed = self.is_key_pressed(self.v[x(op)]);
        self.skip_if(pressed);
        Ok(())
    }

    pub(super) fn sknp(&mut self, op: u16) -> Result<()> {
        // EXA1
        let pressed = self.is_key_pressed(self.v[x(op)]);
        self.skip_if(!pressed);
        Ok(())
    }

    pub(super) fn ldvdt(&mut self, op: u16) -> Result<()> {
        // FX07
        self.v[x(op)] = self.delay_timer;
        Ok(())
    }

    pub(super) fn wait_key(&mut self, op: u16) -> Result<()> {
        // FX0A
        // step and update_timers stall until press_key fills Vx
        debug!("waiting for key press into V{:X}", x(op));
        self.waiting_for_key = Some(x(op));
        Ok(())
    }

    pub(super) fn lddt(&mut self, op: u16) -> Result<()> {
        // FX15
        self.delay_timer = self.v[x(op)];
        Ok(())
    }

    pub(super) fn ldst(&mut self, op: u16) -> Result<()> {
        // FX18
        self.sound_timer = self.v[x(op)];
        Ok(())
    }

    pub(super) fn addi(&mut self, op: u16) -> Result<()> {
        // FX1E
        self.i = self.i.wrapping_add(self.v[x(op)] as u16);
        Ok(())
    }

    pub(super) fn font(&mut self, op: u16) -> Result<()> {
        // FX29
        // 5 bytes per glyph
        let glyph = (self.v[x(op)] & 0xF) as u16;
        self.i = FONT_START_ADDRESS as u16 + glyph * 5;
        Ok(())
    }

    pub(super) fn bcd(&mut self, op: u16) -> Result<()> {
        // FX33
        // 193 becomes [1, 9, 3]
        let vx = self.v[x(op)];
        let i = self.i as usize;
        self.check_range(i, 3)?;
        self.memory[i] = vx / 100;
        self.memory[i + 1] = (vx / 10) % 10;
        self.memory[i + 2] = vx % 10;
        Ok(())
    }

    pub(super) fn store(&mut self, op: u16) -> Result<()> {
        // FX55
        // V0 to VX inclusive, I unchanged
        let x = x(op);
        let i = self.i as usize;
        self.check_range(i, x + 1)?;
        self.memory[i..=i + x].copy_from_slice(&self.v[..=x]);
        Ok(())
    }

    pub(super) fn load(&mut self, op: u16) -> Result<()> {
        // FX65
        let x = x(op);
        let i = self.i as usize;
        self.check_range(i, x + 1)?;
        self.v[..=x].copy_from_slice(&self.memory[i..=i + x]);
        Ok(())
    }
}
