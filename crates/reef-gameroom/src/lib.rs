//! Session table and room controller: packet dispatch, admission
//! (rate limits, sequence, timestamp), room lifecycle, and the fixed-tick
//! loop that resolves hits through `reef-rtp` and mints receipts through
//! `reef-audit`.
//!
//! This crate owns no socket and no async runtime loop itself — an
//! external transport decodes/decrypts frames off the wire and calls
//! [`GameController::handle_packet`], then drains the returned
//! [`Outbound`] batch through its own [`Broadcaster`] implementation.
//!
//! ## Core types
//!
//! - [`GameController`] — the single entry point: open/handshake a
//!   session, dispatch a packet, advance a room's ticks, tear down
//! - [`SessionTable`] / [`Session`] — per-connection state and the
//!   player-id reverse lookup
//! - [`GameRoom`] — one table's simulation, RTP engine, receipt chain,
//!   and seated members
//! - [`Broadcaster`] / [`Outbound`] — the narrow delivery interface the
//!   controller's output is expressed against

pub mod broadcaster;
pub mod controller;
pub mod protocol;
pub mod room;
pub mod session;

pub use broadcaster::{flush, Broadcaster, Outbound};
pub use controller::GameController;
pub use protocol::ProtocolError;
pub use room::{GameRoom, Member};
pub use session::{Session, SessionTable};
