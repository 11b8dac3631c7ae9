//! Collaboration tool and clipboard adapters driven by external commands.

mod command;

pub use command::{CommandClipboard, CommandCollaboration};
