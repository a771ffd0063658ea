//! Startup banner: "GYM PORTAL" in figlet, shaded left to right.

use crossterm::QueueableCommand;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use figlet_rs::FIGfont;
use std::io::{self, Write, stdout};

/// Two-stop horizontal gradient.
#[derive(Debug, Clone, Copy)]
struct Gradient {
    from: [u8; 3],
    to: [u8; 3],
}

impl Gradient {
    const WARMUP: Gradient = Gradient {
        from: [0xff, 0x7a, 0x18],
        to: [0x1d, 0xe9, 0xb6],
    };

    /// Colour at column `col` of `width` columns.
    fn at(&self, col: usize, width: usize) -> Color {
        let t = if width <= 1 {
            0.0
        } else {
            (col as f64 / (width - 1) as f64).min(1.0)
        };
        let mix = |i: usize| {
            let (a, b) = (f64::from(self.from[i]), f64::from(self.to[i]));
            (a + (b - a) * t).round() as u8
        };
        Color::Rgb {
            r: mix(0),
            g: mix(1),
            b: mix(2),
        }
    }
}

fn render_art() -> String {
    FIGfont::standard()
        .ok()
        .and_then(|font| font.convert("GYM PORTAL").map(|fig| fig.to_string()))
        .unwrap_or_else(|| "GYM PORTAL\n".to_string())
}

fn write_banner(out: &mut impl Write, art: &str, gradient: Gradient) -> io::Result<()> {
    let width = art.lines().map(|l| l.chars().count()).max().unwrap_or(0);
    for line in art.lines() {
        for (col, ch) in line.chars().enumerate() {
            out.queue(SetForegroundColor(gradient.at(col, width)))?;
            out.queue(Print(ch))?;
        }
        out.queue(ResetColor)?.queue(Print("\r\n"))?;
    }
    out.queue(SetForegroundColor(gradient.at(width.saturating_sub(1), width)))?
        .queue(Print(format!("member settings v{}\r\n", env!("CARGO_PKG_VERSION"))))?
        .queue(ResetColor)?;
    out.flush()
}

/// Banner output is best-effort; a broken terminal must not stop startup.
pub fn print_welcome() {
    let _ = write_banner(&mut stdout(), &render_art(), Gradient::WARMUP);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gradient_endpoints() {
        let g = Gradient::WARMUP;
        assert_eq!(g.at(0, 10), Color::Rgb { r: 0xff, g: 0x7a, b: 0x18 });
        assert_eq!(g.at(9, 10), Color::Rgb { r: 0x1d, g: 0xe9, b: 0xb6 });
        assert_eq!(g.at(0, 1), Color::Rgb { r: 0xff, g: 0x7a, b: 0x18 });
    }

    #[test]
    fn test_banner_contains_version() {
        let mut buf = Vec::new();
        write_banner(&mut buf, "AB\n", Gradient::WARMUP).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains(env!("CARGO_PKG_VERSION")));
        assert!(text.contains('A') && text.contains('B'));
    }
}
