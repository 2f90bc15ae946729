//! # TinyRealm - Item & Equipment Pipeline for a Multiplayer Realm Server
//!
//! TinyRealm is the item-action core of a multiplayer realm server: the logic
//! that runs between "a player used an item" and "the player and the map
//! heard about it". It is a library crate; session transport, packet framing,
//! authentication and persistence live in the embedding server.
//!
//! ## Features
//!
//! - **Handler Dispatch**: Item actions route through a registry of handlers,
//!   each self-declaring which item templates it applies to; all matching
//!   handlers run independently.
//! - **Guard Chain**: Equipping runs an ordered chain of pure validation
//!   guards (shop lock, binding confirmation, stat/sex/class restrictions,
//!   fairy-element compatibility, specialist cooldowns, job level) with
//!   first-failure short-circuit and a specific notice per cause.
//! - **Atomic Inventory Moves**: Equip is a move into the Wear pocket with
//!   swap semantics, validated up front so a failed move never leaves the
//!   inventory half-updated.
//! - **Binding & Expiry**: Equipping binds the instance to the character and
//!   starts the expiry timer for time-limited items.
//! - **Ordered Notifications**: Per-session channels preserve the message
//!   order clients rely on; map broadcasts are best-effort fan-out.
//! - **Data-Driven Catalog**: Item templates load from JSON seeds under
//!   `data/seeds/`.
//! - **Async Design**: Built with Tokio; one logical task per player action.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tinyrealm::realm::{
//!     ActionContext, CharacterRecord, HandlerRegistry, ItemCatalog, MapHandle, PocketType,
//!     SessionHandle, SystemClock, UseItemAction, WearHandler,
//! };
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let catalog = ItemCatalog::load_from_json("data/seeds/items.json")?;
//!     let mut registry = HandlerRegistry::new();
//!     registry.register(Arc::new(WearHandler::new()));
//!
//!     let mut character = CharacterRecord::new(1, "alice");
//!     let (session, _outbound) = SessionHandle::channel(character.id);
//!     let map = MapHandle::new();
//!     map.join(session.clone()).await;
//!
//!     let clock = SystemClock;
//!     let mut ctx = ActionContext {
//!         character: &mut character,
//!         catalog: &catalog,
//!         clock: &clock,
//!         session: &session,
//!         map: &map,
//!     };
//!     registry
//!         .dispatch(&mut ctx, UseItemAction::new(PocketType::Equipment, 0))
//!         .await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Module Organization
//!
//! - [`realm`] - Catalog, inventory, guard chain, wear handler, dispatch and
//!   notification plumbing
//! - [`config`] - Configuration management and validation
//! - [`metrics`] - Process-wide pipeline counters

pub mod config;
pub mod metrics;
pub mod realm;
