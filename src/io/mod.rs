// Purpose - external interfaces: MIDI transport, keyboard, event formatting

pub mod converter;
pub mod keys;
pub mod midi;
pub mod port;
