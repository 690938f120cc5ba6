//! # Inventory Core
//!
//! The mutable half of Hollowdeep's inventory. This crate owns every
//! container the player touches and the rules for moving items between them,
//! reading item definitions from `item_rules`.
//!
//! ## Core Components
//!
//! - **container**: Fixed-size slot containers (backpack, equipment, chest)
//! - **transfer**: Drag-and-drop resolution and the drag gesture state machine
//! - **trade**: The treasure exchange, its listing, and change-making
//! - **chest**: World chests and their presentation cues
//! - **score**: End-of-run scoring from kept treasure
//! - **schedule**: Time-gated deferred work
//! - **session**: The `initialize` / `tick` loop tying it all together
//!
//! ## Design Philosophy
//!
//! - **Check, then write**: Operations validate fully before the first
//!   mutation, so a rejected operation changes nothing
//! - **Injected collaborators**: Rendering, audio and randomness arrive as
//!   traits or parameters; the crate never reaches for globals
//! - **Single writer**: Every mutation takes `&mut`, so multi-step changes
//!   are never observed half-done

pub mod chest;
pub mod config;
pub mod container;
pub mod error;
pub mod gesture;
pub mod registry;
pub mod schedule;
pub mod score;
pub mod session;
pub mod trade;
pub mod transfer;

pub use chest::*;
pub use config::*;
pub use container::*;
pub use error::*;
pub use gesture::*;
pub use registry::*;
pub use schedule::*;
pub use score::*;
pub use session::*;
pub use trade::*;
pub use transfer::*;
