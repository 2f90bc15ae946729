//! Outbound notification model and sequencing.
//!
//! Every equip outcome is reported through plain-data [`ServerMessage`]
//! values pushed into per-session channels. The transport layer behind the
//! receiver end (packet framing, radios, sockets) is not this crate's
//! concern; what IS this crate's concern is ordering. Clients infer state
//! from message order, so [`announce_equip`] emits its sequence strictly in
//! the documented order and per-session channels preserve it per target.
//!
//! Sends are best-effort: a closed session is logged and skipped, it never
//! aborts the remaining sequence.

use std::sync::Arc;

use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

use crate::metrics;

use super::types::{
    CharacterRecord, Element, EquipmentSlot, ItemInstance, ItemTemplate, PocketType, UseItemAction,
};

/// Cosmetic effect shown on every equip attempt, before validation.
pub const EFFECT_EQUIP_ATTEMPT: u16 = 123;
/// Cosmetic effect shown after an amulet is equipped.
pub const EFFECT_AMULET_AURA: u16 = 39;

/// Opaque message descriptor for a user-facing notice. Resolution to
/// localized text happens in the embedding server's string tables.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Notice {
    AskBind,
    BadEquipment,
    BadFairy,
    SpCooldown { remaining_secs: u64 },
    SpBlocked,
    DestroyedSp,
    LowJobLevel,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SayColor {
    Default,
    Yellow,
    Green,
    Red,
}

/// Post-move state of one pocket address, as shown to the owning client.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct PocketEntry {
    pub instance_id: Uuid,
    pub template_id: u32,
    pub rarity: i8,
}

impl From<&ItemInstance> for PocketEntry {
    fn from(item: &ItemInstance) -> Self {
        Self {
            instance_id: item.id,
            template_id: item.template_id,
            rarity: item.rarity,
        }
    }
}

/// One visible piece of gear, for the map-wide appearance broadcast.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct GearPiece {
    pub slot: EquipmentSlot,
    pub template_id: u32,
}

/// One row of the owner's full equipment sheet.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SheetEntry {
    pub slot: EquipmentSlot,
    pub template_id: u32,
    pub rarity: i8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FairyInfo {
    pub template_id: u32,
    pub element: Element,
}

/// Outbound server-to-client message.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum ServerMessage {
    /// Cosmetic visual effect on the character.
    Effect { effect_id: u16 },
    /// Post-move state of one inventory address (None clears the slot).
    PocketChange {
        pocket: PocketType,
        slot: i16,
        entry: Option<PocketEntry>,
    },
    /// Visible appearance refresh, broadcast to the map.
    EquipmentVisual {
        character_id: u64,
        gear: Vec<GearPiece>,
    },
    /// Full equipment sheet refresh for the owner.
    EquipmentSheet {
        character_id: u64,
        entries: Vec<SheetEntry>,
    },
    /// Specialist point refresh for the owner.
    SpPoints { points: u32, addition_points: u32 },
    /// Companion/fairy appearance refresh, broadcast to the map.
    FairyVisual {
        character_id: u64,
        fairy: Option<FairyInfo>,
    },
    /// Colored chat-line notice to the owner.
    Say { color: SayColor, notice: Notice },
    /// Modal info notice to the owner.
    Msg { notice: Notice },
    /// Yes/no prompt; the affirmative answer replays `on_yes` as a fresh
    /// action submission.
    Confirm {
        notice: Notice,
        on_yes: UseItemAction,
    },
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("session for character {0} is closed")]
    SessionClosed(u64),
}

/// Sender half of one client session's outbound queue. Cloneable; all clones
/// feed the same per-session channel, which is what preserves per-target
/// message order.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    character_id: u64,
    tx: mpsc::UnboundedSender<ServerMessage>,
}

impl SessionHandle {
    /// Create a handle plus the receiver end the session writer task drains.
    pub fn channel(character_id: u64) -> (Self, mpsc::UnboundedReceiver<ServerMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { character_id, tx }, rx)
    }

    pub fn character_id(&self) -> u64 {
        self.character_id
    }

    pub async fn send(&self, message: ServerMessage) -> Result<(), NotifyError> {
        self.tx
            .send(message)
            .map_err(|_| NotifyError::SessionClosed(self.character_id))
    }
}

/// Broadcast scope for one map instance: the sessions of every character
/// currently observing it. Fan-out is read-only and best-effort; dead
/// sessions are skipped and logged.
#[derive(Debug, Clone, Default)]
pub struct MapHandle {
    sessions: Arc<RwLock<Vec<SessionHandle>>>,
}

impl MapHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn join(&self, session: SessionHandle) {
        self.sessions.write().await.push(session);
    }

    pub async fn leave(&self, character_id: u64) {
        self.sessions
            .write()
            .await
            .retain(|s| s.character_id() != character_id);
    }

    /// Send to every observer, returning how many sessions accepted the
    /// message.
    pub async fn broadcast(&self, message: ServerMessage) -> usize {
        let sessions = self.sessions.read().await;
        let mut delivered = 0;
        for session in sessions.iter() {
            match session.send(message.clone()).await {
                Ok(()) => delivered += 1,
                Err(e) => {
                    metrics::inc_notify_failed();
                    warn!("map broadcast skipped: {e}");
                }
            }
        }
        delivered
    }
}

/// Best-effort direct send: logs a closed session and carries on.
pub async fn send_to(session: &SessionHandle, message: ServerMessage) {
    if let Err(e) = session.send(message).await {
        metrics::inc_notify_failed();
        warn!("notification dropped: {e}");
    }
}

fn gear_of(character: &CharacterRecord) -> Vec<GearPiece> {
    character
        .inventory
        .worn_items()
        .map(|(slot, item)| GearPiece {
            slot,
            template_id: item.template_id,
        })
        .collect()
}

fn sheet_of(character: &CharacterRecord) -> Vec<SheetEntry> {
    character
        .inventory
        .worn_items()
        .map(|(slot, item)| SheetEntry {
            slot,
            template_id: item.template_id,
            rarity: item.rarity,
        })
        .collect()
}

/// Emit the post-equip notification sequence, in order:
///
/// 1. owner: pocket change for the vacated source address,
/// 2. map: equipment visual refresh,
/// 3. owner: full equipment sheet,
/// 4. owner: sp point refresh (sp slot only),
/// 5. map: fairy visual (fairy slot only),
/// 6. owner: amulet aura effect (amulet slot only).
///
/// Every emission is independent; a failed send never stops the rest.
pub async fn announce_equip(
    session: &SessionHandle,
    map: &MapHandle,
    character: &CharacterRecord,
    template: &ItemTemplate,
    action: UseItemAction,
    vacated: Option<&ItemInstance>,
) {
    send_to(
        session,
        ServerMessage::PocketChange {
            pocket: action.pocket,
            slot: action.slot,
            entry: vacated.map(PocketEntry::from),
        },
    )
    .await;

    map.broadcast(ServerMessage::EquipmentVisual {
        character_id: character.id,
        gear: gear_of(character),
    })
    .await;

    send_to(
        session,
        ServerMessage::EquipmentSheet {
            character_id: character.id,
            entries: sheet_of(character),
        },
    )
    .await;

    if template.equipment_slot == EquipmentSlot::Sp {
        send_to(
            session,
            ServerMessage::SpPoints {
                points: character.sp_points,
                addition_points: character.sp_addition_points,
            },
        )
        .await;
    }

    if template.equipment_slot == EquipmentSlot::Fairy {
        map.broadcast(ServerMessage::FairyVisual {
            character_id: character.id,
            fairy: Some(FairyInfo {
                template_id: template.id,
                element: template.element,
            }),
        })
        .await;
    }

    if template.equipment_slot == EquipmentSlot::Amulet {
        send_to(
            session,
            ServerMessage::Effect {
                effect_id: EFFECT_AMULET_AURA,
            },
        )
        .await;
    }
}
