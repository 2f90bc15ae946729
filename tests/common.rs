//! Test utilities & fixtures for the equip pipeline integration tests.
//! Builds a small item catalog and a wired-up character/session/map trio so
//! individual tests stay focused on behavior.
#![allow(dead_code)] // Each test binary uses its own subset of these helpers.

use std::sync::Arc;

use tinyrealm::realm::{
    ActionContext, CharacterClass, CharacterRecord, Element, EquipmentSlot, GameClock,
    HandlerRegistry, ItemCatalog, ItemTemplate, ItemType, MapHandle, RealmError, ServerMessage,
    SessionHandle, UseItemAction, WearHandler,
};
use tokio::sync::mpsc::UnboundedReceiver;

pub const ARMOR: u32 = 100;
pub const AMULET: u32 = 101;
pub const FIRE_FAIRY: u32 = 102;
pub const SP_CARD: u32 = 103;
pub const TIMED_CLOAK: u32 = 104;
pub const POTION: u32 = 105;
pub const HERO_CLAYMORE: u32 = 106;
pub const MASTER_GLOVES: u32 = 107;
pub const LIGHT_FAIRY: u32 = 108;

/// Catalog mirroring the shipped starter seeds, plus a few templates the
/// guard tests need.
pub fn catalog() -> ItemCatalog {
    let mut catalog = ItemCatalog::new();
    catalog.insert(
        ItemTemplate::new(ARMOR, "Leather Vest", ItemType::Armor, EquipmentSlot::Armor)
            .with_level_minimum(30),
    );
    catalog.insert(
        ItemTemplate::new(
            AMULET,
            "Glowing Amulet",
            ItemType::Jewelry,
            EquipmentSlot::Amulet,
        )
        .with_level_minimum(25),
    );
    catalog.insert(
        ItemTemplate::new(
            FIRE_FAIRY,
            "Ember Fairy",
            ItemType::Jewelry,
            EquipmentSlot::Fairy,
        )
        .with_elements(Element::Fire, Element::Neutral),
    );
    catalog.insert(
        ItemTemplate::new(SP_CARD, "Pyjama Card", ItemType::Specialist, EquipmentSlot::Sp)
            .with_level_minimum(20)
            .with_job_level_minimum(20)
            .with_elements(Element::Light, Element::Neutral)
            .with_require_binding(),
    );
    catalog.insert(
        ItemTemplate::new(
            TIMED_CLOAK,
            "Festival Cloak",
            ItemType::Fashion,
            EquipmentSlot::CostumeSuit,
        )
        .with_require_binding()
        .with_valid_seconds(3600),
    );
    catalog.insert(ItemTemplate::new(
        POTION,
        "Small Healing Potion",
        ItemType::Potion,
        EquipmentSlot::MainWeapon,
    ));
    catalog.insert(
        ItemTemplate::new(
            HERO_CLAYMORE,
            "Hero's Claymore",
            ItemType::Weapon,
            EquipmentSlot::MainWeapon,
        )
        .with_level_minimum(10)
        .with_heroic()
        .with_class_mask(1 << CharacterClass::Swordsman as u8),
    );
    catalog.insert(
        ItemTemplate::new(
            MASTER_GLOVES,
            "Master Gloves",
            ItemType::Armor,
            EquipmentSlot::Gloves,
        )
        .with_job_level_minimum(40),
    );
    catalog.insert(
        ItemTemplate::new(
            LIGHT_FAIRY,
            "Radiant Fairy",
            ItemType::Jewelry,
            EquipmentSlot::Fairy,
        )
        .with_elements(Element::Light, Element::Neutral),
    );
    catalog
}

/// Level-50 swordsman with an empty inventory and a 10s sp cooldown.
pub fn character() -> CharacterRecord {
    let mut character = CharacterRecord::new(1, "alice");
    character.level = 50;
    character.job_level = 20;
    character.class = CharacterClass::Swordsman;
    character.sp_cooldown_secs = 10;
    character.map_id = 1;
    character
}

/// A session for the character plus a map the session already joined.
pub async fn wired(
    character_id: u64,
) -> (SessionHandle, UnboundedReceiver<ServerMessage>, MapHandle) {
    let (session, rx) = SessionHandle::channel(character_id);
    let map = MapHandle::new();
    map.join(session.clone()).await;
    (session, rx, map)
}

pub fn drain(rx: &mut UnboundedReceiver<ServerMessage>) -> Vec<ServerMessage> {
    let mut out = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        out.push(msg);
    }
    out
}

/// Dispatch one action through a registry holding only the wear handler.
pub async fn dispatch_wear(
    character: &mut CharacterRecord,
    catalog: &ItemCatalog,
    clock: &dyn GameClock,
    session: &SessionHandle,
    map: &MapHandle,
    action: UseItemAction,
) -> Result<usize, RealmError> {
    let mut registry = HandlerRegistry::new();
    registry.register(Arc::new(WearHandler::new()));
    let mut ctx = ActionContext {
        character,
        catalog,
        clock,
        session,
        map,
    };
    registry.dispatch(&mut ctx, action).await
}

/// Compact tag for asserting message sequences.
pub fn tag(message: &ServerMessage) -> &'static str {
    match message {
        ServerMessage::Effect { .. } => "effect",
        ServerMessage::PocketChange { .. } => "pocket_change",
        ServerMessage::EquipmentVisual { .. } => "equipment_visual",
        ServerMessage::EquipmentSheet { .. } => "equipment_sheet",
        ServerMessage::SpPoints { .. } => "sp_points",
        ServerMessage::FairyVisual { .. } => "fairy_visual",
        ServerMessage::Say { .. } => "say",
        ServerMessage::Msg { .. } => "msg",
        ServerMessage::Confirm { .. } => "confirm",
    }
}

pub fn tags(messages: &[ServerMessage]) -> Vec<&'static str> {
    messages.iter().map(tag).collect()
}
