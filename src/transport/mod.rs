//! TCP transport: socket abstraction (C6) and message framing accounting
//! (C7), built over the rest of this crate's codec and limits layers.

pub mod counter;
pub mod framing;
pub mod socket;
pub mod socket_set;

pub use counter::{accept_with_budget, AcceptOutcome};
pub use framing::FrameAccountant;
pub use socket::{addr_info_get, AddrInfo, Connection, Listener};
pub use socket_set::{wait, SocketSet};
