//! Port menu and selection.

use std::io::{BufRead, Write};

use crate::error::{Error, Result};

/// One-line summary, e.g. `Available MIDI ports are 'Keys', 'Pads'`.
pub fn port_summary(ports: &[String]) -> String {
    let names: Vec<String> = ports.iter().map(|p| format!("'{p}'")).collect();
    format!("Available MIDI ports are {}", names.join(", "))
}

/// Writes the summary and the numbered (1-based) menu.
pub fn write_menu<W: Write>(out: &mut W, ports: &[String]) -> Result<()> {
    writeln!(out, "{}", port_summary(ports))?;
    writeln!(out, "\nPlease select a MIDI port to listen on:")?;
    for (i, port) in ports.iter().enumerate() {
        writeln!(out, "{}. {}", i + 1, port)?;
    }
    Ok(())
}

/// Parses a 1-based menu entry into a 0-based port index.
pub fn parse_selection(line: &str, count: usize) -> Result<usize> {
    let line = line.trim();
    let selected: usize = line
        .parse()
        .map_err(|_| Error::InvalidSelection(line.to_string()))?;
    if selected == 0 || selected > count {
        return Err(Error::SelectionOutOfRange { selected, count });
    }
    Ok(selected - 1)
}

/// Prompts once and reads the selection from `input`.
pub fn read_selection<R: BufRead, W: Write>(input: &mut R, out: &mut W, count: usize) -> Result<usize> {
    write!(out, "\nEnter the port number: ")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(Error::NoSelection);
    }
    parse_selection(&line, count)
}
