extern crate sdl2;

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Context};
use chip8_vm::chip8::{self, Chip8, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use clap::Parser;
use log::{error, info};
use sdl2::event::Event;
use sdl2::gfx::primitives::DrawRenderer;
use sdl2::keyboard::Keycode;
use sdl2::pixels;

// 60Hz, the rate the timers count down at
const FRAME: Duration = Duration::from_micros(16_667);

#[derive(Parser, Debug)]
#[command(about = "CHIP-8 virtual machine")]
struct Args {
    /// ROM image to run.
    rom: PathBuf,

    /// Print each opcode with a description instead of running.
    #[arg(long)]
    disassemble: bool,

    /// Scale factor applied to the 64x32 display.
    // 64 * 511 still fits the i16 coordinates SDL_gfx draws with
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u32).range(1..=511))]
    scaling: u32,

    /// Instructions executed per frame.
    #[arg(long, default_value_t = 10)]
    cycles: u32,
}

// 1 2 3 C / 4 5 6 D / 7 8 9 E / A 0 B F on the left of a QWERTY keyboard
fn map_key(keycode: Keycode) -> Option<u8> {
    let key = match keycode {
        Keycode::Num1 => 0x1,
        Keycode::Num2 => 0x2,
        Keycode::Num3 => 0x3,
        Keycode::Num4 => 0xC,
        Keycode::Q => 0x4,
        Keycode::W => 0x5,
        Keycode::E => 0x6,
        Keycode::R => 0xD,
        Keycode::A => 0x7,
        Keycode::S => 0x8,
        Keycode::D => 0x9,
        Keycode::F => 0xE,
        Keycode::Z => 0xA,
        Keycode::X => 0x0,
        Keycode::C => 0xB,
        Keycode::V => 0xF,
        _ => return None,
    };
    Some(key)
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let program = std::fs::read(&args.rom)
        .with_context(|| format!("reading rom file {}", args.rom.display()))?;

    if args.disassemble {
        println!("Disassembling ROM to stdout");
        for (_, instruction) in chip8::disassemble(&program) {
            println!("{}", instruction);
        }
        return Ok(());
    }

    info!("running {}", args.rom.display());
    run(&args, &program)
}

fn run(args: &Args, program: &[u8]) -> anyhow::Result<()> {
    let mut emu = Chip8::with_program(program, Box::new(chip8::ThreadRandom))?;

    let sdl_ctx = sdl2::init().map_err(|e| anyhow!(e))?;
    let video = sdl_ctx.video().map_err(|e| anyhow!(e))?;

    let scale = args.scaling;
    let title = match args.rom.file_name() {
        Some(name) => format!("CHIP-8 - {}", name.to_string_lossy()),
        None => "CHIP-8".to_string(),
    };
    let window = video
        .window(
            &title,
            DISPLAY_WIDTH as u32 * scale,
            DISPLAY_HEIGHT as u32 * scale,
        )
        .position_centered()
        .build()?;
    let mut canvas = window.into_canvas().build()?;

    let black = pixels::Color::RGB(0, 0, 0);
    let white = pixels::Color::RGB(255, 255, 255);
    canvas.set_draw_color(black);
    canvas.clear();
    canvas.present();

    let mut event_pump = sdl_ctx.event_pump().map_err(|e| anyhow!(e))?;

    'main: loop {
        let frame_start = Instant::now();

        emu.update_timers();

        for e in event_pump.poll_iter() {
            match e {
                Event::Quit { .. }
                | Event::KeyDown {
                    keycode: Some(Keycode::Escape),
                    ..
                } => break 'main,
                Event::KeyDown {
                    keycode: Some(k), ..
                } => {
                    if let Some(key) = map_key(k) {
                        emu.press_key(key);
                    }
                }
                Event::KeyUp {
                    keycode: Some(k), ..
                } => {
                    if let Some(key) = map_key(k) {
                        emu.release_key(key);
                    }
                }
                _ => {}
            }
        }

        for _ in 0..args.cycles {
            if let Err(e) = emu.step() {
                error!("stopping: {}", e);
                return Err(e.into());
            }
        }

        if emu.draw_flag() {
            emu.clear_draw_flag();
            canvas.set_draw_color(black);
            canvas.clear();
            let size = scale as i16;
            for (y, row) in emu.display().iter().enumerate() {
                for (x, _) in row.iter().enumerate().filter(|(_, p)| **p) {
                    let x = x as i16 * size;
                    let y = y as i16 * size;
                    canvas
                        .box_(x, y, x + size - 1, y + size - 1, white)
                        .map_err(|e| anyhow!(e))?;
                }
            }
            canvas.present();
        }

        if let Some(rest) = FRAME.checked_sub(frame_start.elapsed()) {
            std::thread::sleep(rest);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keypad_layout() {
        let rows = [
            [Keycode::Num1, Keycode::Num2, Keycode::Num3, Keycode::Num4],
            [Keycode::Q, Keycode::W, Keycode::E, Keycode::R],
            [Keycode::A, Keycode::S, Keycode::D, Keycode::F],
            [Keycode::Z, Keycode::X, Keycode::C, Keycode::V],
        ];
        let expected = [
            [0x1, 0x2, 0x3, 0xC],
            [0x4, 0x5, 0x6, 0xD],
            [0x7, 0x8, 0x9, 0xE],
            [0xA, 0x0, 0xB, 0xF],
        ];
        for (row, keys) in rows.iter().zip(expected.iter()) {
            for (k, want) in row.iter().zip(keys.iter()) {
                assert_eq!(map_key(*k), Some(*want));
            }
        }
        assert_eq!(map_key(Keycode::Escape), None);
    }

    #[test]
    fn parse_args() {
        let args = Args::parse_from(["chip8-vm", "pong.c8"]);
        assert_eq!(args.scaling, 10);
        assert_eq!(args.cycles, 10);
        assert!(!args.disassemble);

        let args = Args::parse_from(["chip8-vm", "--disassemble", "--cycles", "20", "pong.c8"]);
        assert!(args.disassemble);
        assert_eq!(args.cycles, 20);

        let args = Args::parse_from(["chip8-vm", "--scaling", "511", "pong.c8"]);
        assert_eq!(args.scaling, 511);
        assert!(Args::try_parse_from(["chip8-vm", "--scaling", "512", "pong.c8"]).is_err());
        assert!(Args::try_parse_from(["chip8-vm", "--scaling", "0", "pong.c8"]).is_err());
    }
}
