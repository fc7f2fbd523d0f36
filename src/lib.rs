// src/lib.rs

//! A small interactive debug console for hosts that cannot block on I/O.
//!
//! The console consumes bytes from a non-blocking [`Transport`], keeps a
//! line buffer with backspace handling and local echo, decodes (and for now
//! discards) ANSI escape sequences, and dispatches completed lines to
//! callbacks registered under a command name.
//!
//! The host drives everything by calling [`Console::pump`] from its own loop.
//! Each call does a small, bounded amount of work and returns.
//!
//! ```rust
//! use debug_console::{Console, MockTransport};
//! use std::{cell::RefCell, rc::Rc};
//!
//! let mut console = Console::new(MockTransport::new(), 80, 10);
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//! let _greet = console
//!     .register("greet", move |_ctx, args| {
//!         sink.borrow_mut().extend(args.iter().map(str::to_owned));
//!     })
//!     .unwrap();
//!
//! console.transport_mut().push_input(b"greet world\r");
//! for _ in 0..8 {
//!     console.pump();
//! }
//! assert_eq!(&*seen.borrow(), &["greet", "world"]);
//! ```

pub mod builtins;
pub mod config;
pub mod console;
pub mod error;
pub mod escape;
pub mod line;
pub mod registry;
pub mod term;
pub mod transport;

pub use config::ConsoleConfig;
pub use console::{Console, ConsoleFlags, State};
pub use error::ConsoleError;
pub use line::Args;
pub use registry::{Command, CommandContext, CommandId};
pub use term::Mode;
pub use transport::{transport_fn, MockTransport, Transport};
