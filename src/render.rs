use std::io::{self, Write};

use serde::Serialize;

use crate::word::ControlWord;

pub trait Renderer {
    fn render(&self, entries: &[ControlWord], out: &mut dyn Write) -> io::Result<()>;
}

/// VHDL constant-array entries: `16#102# => "0111...",` with CRLF line ends.
#[derive(Debug, Default, Clone, Copy)]
pub struct VhdlRenderer {
    /// Emit all 56 positions instead of the 55 meaningful ones.
    pub full_width: bool,
}

impl Renderer for VhdlRenderer {
    fn render(&self, entries: &[ControlWord], out: &mut dyn Write) -> io::Result<()> {
        for w in entries {
            let bits = if self.full_width { w.to_bit_string() } else { w.meaningful_bits() };
            write!(out, "16#{:03x}# => \"{}\",\r\n", w.address(), bits)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct TextRenderer {
    pub full_width: bool,
}

impl Renderer for TextRenderer {
    fn render(&self, entries: &[ControlWord], out: &mut dyn Write) -> io::Result<()> {
        for w in entries {
            let bits = if self.full_width { w.to_bit_string() } else { w.meaningful_bits() };
            writeln!(out, "{:03X} {}", w.address(), bits)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
struct EntryOut {
    address: String,
    bits: String,
}

#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRenderer {
    pub full_width: bool,
}

impl Renderer for JsonRenderer {
    fn render(&self, entries: &[ControlWord], out: &mut dyn Write) -> io::Result<()> {
        let rows: Vec<EntryOut> = entries
            .iter()
            .map(|w| EntryOut {
                address: format!("{:03X}", w.address()),
                bits: if self.full_width { w.to_bit_string() } else { w.meaningful_bits() },
            })
            .collect();
        serde_json::to_writer_pretty(&mut *out, &rows)?;
        writeln!(out)
    }
}
