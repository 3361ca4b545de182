use std::{
    fmt,
    io::{self, Write},
};

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Stylize},
    terminal::{Clear, ClearType},
    Command,
};
use twenty_48::{Board, Row, Tile};

const BORDER: &str = "+------+------+------+------+";

/// Everything shown in one frame.
#[derive(Debug)]
pub struct Screen<'a> {
    pub title: &'a str,
    pub scores: String,
    pub board: &'a Board,
    pub banner: Option<String>,
    pub help: &'a str,
}

fn styled(t: Tile) -> impl fmt::Display {
    format!("{: ^6}", t.value()).with(match t.value() {
        2 => Color::White,
        4 => Color::Rgb {
            r: 255,
            g: 215,
            b: 0,
        }, // orange
        8 => Color::DarkYellow,
        16 => Color::Magenta,
        32 => Color::Green,
        64 => Color::Blue,
        128 | 256 => Color::Cyan,
        512 | 1024 => Color::Red,
        _ => Color::DarkRed,
    })
}

fn print_row(f: &mut impl fmt::Write, row: &Row) -> fmt::Result {
    for tile in row.iter() {
        match tile {
            Some(tile) => write!(f, "|{}", styled(*tile))?,
            None => write!(f, "|{: ^6}", " ")?,
        }
    }
    Ok(())
}

// raw mode: every line ends in \r\n
impl Command for Screen<'_> {
    fn write_ansi(&self, f: &mut impl fmt::Write) -> fmt::Result {
        write!(f, "{}\r\n", self.title.bold())?;
        write!(f, "{}\r\n\r\n", self.scores)?;
        for row in self.board.rows().iter() {
            write!(f, "{BORDER}\r\n")?;
            print_row(f, row)?;
            write!(f, "|\r\n")?;
        }
        write!(f, "{BORDER}\r\n\r\n")?;
        if let Some(banner) = &self.banner {
            write!(f, "{}\r\n", banner.as_str().bold().rapid_blink())?;
        }
        write!(f, "{}\r\n", self.help.dim())
    }

    #[cfg(windows)]
    fn execute_winapi(&self) -> io::Result<()> {
        Err(io::Error::other("the board is only drawn with ANSI sequences"))
    }
}

pub fn draw(out: &mut impl Write, screen: &Screen) -> io::Result<()> {
    queue!(out, Clear(ClearType::All), MoveTo(0, 0), screen)?;
    out.flush()
}
