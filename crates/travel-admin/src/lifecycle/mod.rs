//! # Console Lifecycle & Orchestration
//!
//! Starts one store actor per collection, wires them to a shared HTTP transport,
//! notification channel and upload stager, and shuts them down again.
//!
//! ## The AdminConsole Pattern
//!
//! ```rust,ignore
//! let console = AdminConsole::new(&config)?;
//!
//! // Each screen mints its own controllers from its manager
//! let dialog = console.airports.dialog();
//! let delete = console.user_delete_confirmation();
//!
//! console.shutdown().await;
//! ```
//!
//! ## Graceful Shutdown
//!
//! 1. **Drop all managers** - Closes the sender side of every store channel
//! 2. **Stores detect closure** - `receiver.recv()` returns `None`
//! 3. **Stores log final size** - `Shutdown collection=... size=...`
//! 4. **Await completion** - Wait for every store task to finish
//!
//! Controllers hold store clients too, so a store only stops once the screens using it
//! have dropped their dialogs and delete sessions.

pub mod admin_console;

pub use admin_console::*;
