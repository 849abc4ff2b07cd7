//! Per-invocation execution context handed to handlers and hooks

use crate::command::{CommandRef, CommandTree};
use crate::error::CliResult;
use crate::output::Color;
use std::any::Any;
use std::fmt::{self, Display};
use std::io::Write;

/// Everything a handler sees of one invocation
pub struct Context<'a> {
    command: CommandRef<'a>,
    native_args: Vec<String>,
    args: Vec<String>,
    argv: Option<Box<dyn Any>>,
    out: &'a mut dyn Write,
    color: Color,
}

impl<'a> Context<'a> {
    /// Context for `command`; `native_args` are the tokens left after
    /// routing, `args` the positional residue after flag parsing
    pub fn new(
        command: CommandRef<'a>,
        native_args: Vec<String>,
        args: Vec<String>,
        argv: Option<Box<dyn Any>>,
        out: &'a mut dyn Write,
        color: Color,
    ) -> Self {
        Self {
            command,
            native_args,
            args,
            argv,
            out,
            color,
        }
    }

    /// The bound argument record, if the command declares one of type `T`
    pub fn argv<T: 'static>(&self) -> Option<&T> {
        self.argv.as_ref().and_then(|argv| argv.downcast_ref::<T>())
    }

    /// Mutable access to the bound argument record
    pub fn argv_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.argv.as_mut().and_then(|argv| argv.downcast_mut::<T>())
    }

    /// Tokens after the routed command path, flags included
    pub fn native_args(&self) -> &[String] {
        &self.native_args
    }

    /// Positional tokens left after flag parsing
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// The routed command
    pub fn command(&self) -> CommandRef<'a> {
        self.command
    }

    /// The whole command tree
    pub fn tree(&self) -> &'a CommandTree {
        self.command.tree()
    }

    /// Command names from the root to the routed command
    pub fn path(&self) -> Vec<&'a str> {
        self.command.path()
    }

    /// Usage text of the routed command
    pub fn usage(&self) -> CliResult<String> {
        self.command.usage(&self.color)
    }

    /// Color state of the output
    pub fn color(&self) -> Color {
        self.color
    }

    /// Output writer
    pub fn writer(&mut self) -> &mut dyn Write {
        &mut *self.out
    }

    /// Write text to the output
    pub fn string(&mut self, text: impl Display) -> CliResult<()> {
        write!(self.out, "{}", text)?;
        Ok(())
    }

    /// Formatted write to the output, for use with `write!`
    pub fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> CliResult<()> {
        self.out.write_fmt(args)?;
        Ok(())
    }
}

impl fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("command", &self.command)
            .field("native_args", &self.native_args)
            .field("args", &self.args)
            .field("color", &self.color)
            .finish_non_exhaustive()
    }
}
