// src/registry.rs

//! Command registry.
//!
//! The console owns the registry; callers own the [`Command`] handles. Each
//! handle keeps only a weak back-reference plus a stable id, so commands and
//! the console can be dropped in any order:
//!
//! - dropping a `Command` unregisters it if its console is still alive;
//! - dropping the console detaches every entry, after which the remaining
//!   handles are inert and can be dropped at leisure.

use crate::error::{ConsoleError, Result};
use crate::line::Args;
use crate::term::Terminal;
use log::debug;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Signature every command callback implements.
pub type Callback = dyn FnMut(&mut CommandContext<'_>, &Args<'_>);

/// Stable identity of a registered command, unique per registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CommandId(u64);

struct Entry {
    id: CommandId,
    name: String,
    callback: Rc<RefCell<Callback>>,
}

/// Ordered, name-unique collection of commands. Insertion order is
/// registration order.
#[derive(Default)]
pub struct Registry {
    entries: Vec<Entry>,
    next_id: u64,
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl Registry {
    pub(crate) fn find(&self, name: &[u8]) -> Option<CommandId> {
        self.entries
            .iter()
            .find(|entry| entry.name.as_bytes() == name)
            .map(|entry| entry.id)
    }

    pub(crate) fn callback(&self, name: &[u8]) -> Option<Rc<RefCell<Callback>>> {
        self.entries
            .iter()
            .find(|entry| entry.name.as_bytes() == name)
            .map(|entry| Rc::clone(&entry.callback))
    }

    /// Appends a command at the tail. Fails without mutation on a duplicate.
    fn insert(&mut self, name: &str, callback: Rc<RefCell<Callback>>) -> Result<CommandId> {
        if self.find(name.as_bytes()).is_some() {
            return Err(ConsoleError::DuplicateCommand(name.to_owned()));
        }
        let id = CommandId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry {
            id,
            name: name.to_owned(),
            callback,
        });
        Ok(id)
    }

    fn remove(&mut self, id: CommandId) -> bool {
        match self.entries.iter().position(|entry| entry.id == id) {
            Some(index) => {
                self.entries.remove(index);
                true
            }
            None => false,
        }
    }

    pub(crate) fn detach_all(&mut self) {
        self.entries.clear();
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Registers `callback` under `name` in the shared registry and returns the
/// caller-owned handle.
pub(crate) fn register<F>(registry: &Rc<RefCell<Registry>>, name: &str, callback: F) -> Result<Command>
where
    F: FnMut(&mut CommandContext<'_>, &Args<'_>) + 'static,
{
    let callback: Rc<RefCell<Callback>> = Rc::new(RefCell::new(callback));
    let id = registry.borrow_mut().insert(name, callback)?;
    debug!("registered command '{}' as {:?}", name, id);
    Ok(Command {
        console: Rc::downgrade(registry),
        id,
        name: name.to_owned(),
    })
}

/// Caller-owned handle for a registered command.
///
/// Dropping the handle unregisters the command.
pub struct Command {
    console: Weak<RefCell<Registry>>,
    id: CommandId,
    name: String,
}

impl Command {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> CommandId {
        self.id
    }

    /// True while the command is linked into a live console.
    pub fn is_registered(&self) -> bool {
        let Some(registry) = self.console.upgrade() else {
            return false;
        };
        let linked = registry.borrow().entries.iter().any(|e| e.id == self.id);
        linked
    }

    /// Removes the command from its console. Does nothing if the command
    /// was already unregistered or the console is gone.
    pub fn unregister(&mut self) {
        if let Some(registry) = self.console.upgrade() {
            if registry.borrow_mut().remove(self.id) {
                debug!("unregistered command '{}'", self.name);
            }
        }
        self.console = Weak::new();
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("id", &self.id)
            .field("registered", &self.is_registered())
            .finish()
    }
}

impl Drop for Command {
    fn drop(&mut self) {
        self.unregister();
    }
}

/// What a callback gets to work with besides its arguments: the console's
/// translating output path and a read-only view of the registry.
pub struct CommandContext<'a> {
    term: Terminal<'a>,
    registry: &'a RefCell<Registry>,
}

impl<'a> CommandContext<'a> {
    pub(crate) fn new(term: Terminal<'a>, registry: &'a RefCell<Registry>) -> Self {
        Self { term, registry }
    }

    pub fn putc(&mut self, byte: u8) {
        self.term.put_char(byte);
    }

    pub fn puts(&mut self, s: &str) {
        self.term.put_str(s);
    }

    pub fn newline(&mut self) {
        self.term.newline();
    }

    /// Names of all registered commands, in registration order.
    pub fn command_names(&self) -> Vec<String> {
        self.registry.borrow().names().map(str::to_owned).collect()
    }

    /// Writes every registered command name on its own line.
    pub(crate) fn write_command_list(&mut self) {
        let registry = self.registry.borrow();
        for name in registry.names() {
            self.term.put_str(name);
            self.term.newline();
        }
    }
}

impl fmt::Write for CommandContext<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.term.put_str(s);
        Ok(())
    }
}
