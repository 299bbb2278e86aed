//! Client-side state of the relay view.
//!
//! DESIGN
//! ======
//! `relay` holds the controller; chapters, members and the team table are
//! split out so rendering code can depend on the small models directly.

pub mod chapter;
pub mod members;
pub mod relay;
pub mod teams;
