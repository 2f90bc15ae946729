//! Realm item pipeline: catalog, inventories, the equip guard chain, and the
//! action dispatch/notification plumbing around them. The embedding server
//! owns sessions and transport; this module owns what happens between "a
//! player used an item" and "the world heard about it".

pub mod catalog;
pub mod clock;
pub mod dispatch;
pub mod errors;
pub mod inventory;
pub mod notify;
pub mod rules;
pub mod types;
pub mod wear;

pub use catalog::ItemCatalog;
pub use clock::{GameClock, ManualClock, SystemClock};
pub use dispatch::{ActionContext, HandlerRegistry, ItemEventHandler};
pub use errors::RealmError;
pub use inventory::Inventory;
pub use notify::{
    announce_equip, MapHandle, Notice, NotifyError, SayColor, ServerMessage, SessionHandle,
    EFFECT_AMULET_AURA, EFFECT_EQUIP_ATTEMPT,
};
pub use rules::{evaluate, mask_allows, GuardContext, GuardOutcome, Rejection, EQUIP_GUARDS};
pub use types::*;
pub use wear::WearHandler;
