//! Every guard rejection path, end to end through the dispatcher: one
//! specific notice (or a log-only silence), no inventory mutation.

mod common;

use chrono::{Duration, Utc};
use common::*;
use tinyrealm::realm::{
    CharacterClass, EquipmentSlot, ItemInstance, ManualClock, Notice, PocketType, SayColor,
    ServerMessage, UseItemAction, RARITY_DESTROYED,
};

#[tokio::test]
async fn shop_lock_rejects_silently() {
    let catalog = catalog();
    let mut character = character();
    character.in_exchange_or_shop = true;
    let (session, mut rx, map) = wired(character.id).await;
    let clock = ManualClock::starting_at(Utc::now());

    character
        .inventory
        .insert(PocketType::Equipment, 0, ItemInstance::new(ARMOR));

    let invoked = dispatch_wear(
        &mut character,
        &catalog,
        &clock,
        &session,
        &map,
        UseItemAction::new(PocketType::Equipment, 0),
    )
    .await
    .expect("dispatch");
    assert_eq!(invoked, 1);

    // Only the unconditional attempt effect; no rejection notice, no move.
    assert_eq!(tags(&drain(&mut rx)), vec!["effect"]);
    assert!(character.inventory.get(PocketType::Equipment, 0).is_some());
    assert!(character.inventory.worn(EquipmentSlot::Armor).is_none());
}

#[tokio::test]
async fn low_level_gets_the_bad_equipment_notice() {
    let catalog = catalog();
    let mut character = character();
    character.level = 20; // below the vest's minimum of 30
    let (session, mut rx, map) = wired(character.id).await;
    let clock = ManualClock::starting_at(Utc::now());

    character
        .inventory
        .insert(PocketType::Equipment, 0, ItemInstance::new(ARMOR));

    dispatch_wear(
        &mut character,
        &catalog,
        &clock,
        &session,
        &map,
        UseItemAction::new(PocketType::Equipment, 0),
    )
    .await
    .expect("dispatch");

    let messages = drain(&mut rx);
    assert_eq!(tags(&messages), vec!["effect", "say"]);
    assert_eq!(
        messages[1],
        ServerMessage::Say {
            color: SayColor::Yellow,
            notice: Notice::BadEquipment,
        }
    );
    assert!(character.inventory.worn(EquipmentSlot::Armor).is_none());
}

#[tokio::test]
async fn heroic_weapon_checks_hero_level_not_base_level() {
    let catalog = catalog();
    let mut character = character();
    character.level = 99;
    character.hero_level = 0;
    let (session, mut rx, map) = wired(character.id).await;
    let clock = ManualClock::starting_at(Utc::now());

    character
        .inventory
        .insert(PocketType::Equipment, 0, ItemInstance::new(HERO_CLAYMORE));
    let action = UseItemAction::new(PocketType::Equipment, 0);

    dispatch_wear(&mut character, &catalog, &clock, &session, &map, action)
        .await
        .expect("dispatch");
    assert_eq!(tags(&drain(&mut rx)), vec!["effect", "say"]);

    // With enough hero levels the same character equips it.
    character.hero_level = 15;
    dispatch_wear(&mut character, &catalog, &clock, &session, &map, action)
        .await
        .expect("dispatch");
    assert!(character
        .inventory
        .worn(EquipmentSlot::MainWeapon)
        .is_some());
}

#[tokio::test]
async fn class_mask_rejects_the_wrong_class() {
    let catalog = catalog();
    let mut character = character();
    character.class = CharacterClass::Archer;
    character.hero_level = 15;
    let (session, mut rx, map) = wired(character.id).await;
    let clock = ManualClock::starting_at(Utc::now());

    // Claymore is swordsman-only.
    character
        .inventory
        .insert(PocketType::Equipment, 0, ItemInstance::new(HERO_CLAYMORE));

    dispatch_wear(
        &mut character,
        &catalog,
        &clock,
        &session,
        &map,
        UseItemAction::new(PocketType::Equipment, 0),
    )
    .await
    .expect("dispatch");

    let messages = drain(&mut rx);
    assert_eq!(tags(&messages), vec!["effect", "say"]);
    assert!(character
        .inventory
        .worn(EquipmentSlot::MainWeapon)
        .is_none());
}

#[tokio::test]
async fn incompatible_fairy_is_rejected_while_transformed() {
    let catalog = catalog();
    let mut character = character();
    character.sp_mode = true;
    let (session, mut rx, map) = wired(character.id).await;
    let clock = ManualClock::starting_at(Utc::now());

    // Light-element card active, fire fairy incoming.
    let mut card = ItemInstance::new(SP_CARD);
    card.bind_to(character.id);
    character
        .inventory
        .insert(PocketType::Wear, EquipmentSlot::Sp.wear_index(), card);
    character
        .inventory
        .insert(PocketType::Equipment, 2, ItemInstance::new(FIRE_FAIRY));

    dispatch_wear(
        &mut character,
        &catalog,
        &clock,
        &session,
        &map,
        UseItemAction::new(PocketType::Equipment, 2),
    )
    .await
    .expect("dispatch");

    let messages = drain(&mut rx);
    assert_eq!(tags(&messages), vec!["effect", "msg"]);
    assert_eq!(
        messages[1],
        ServerMessage::Msg {
            notice: Notice::BadFairy,
        }
    );
    assert!(character.inventory.worn(EquipmentSlot::Fairy).is_none());
}

#[tokio::test]
async fn matching_fairy_is_allowed_while_transformed() {
    let catalog = catalog();
    let mut character = character();
    character.sp_mode = true;
    let (session, _rx, map) = wired(character.id).await;
    let clock = ManualClock::starting_at(Utc::now());

    let mut card = ItemInstance::new(SP_CARD);
    card.bind_to(character.id);
    character
        .inventory
        .insert(PocketType::Wear, EquipmentSlot::Sp.wear_index(), card);
    character
        .inventory
        .insert(PocketType::Equipment, 2, ItemInstance::new(LIGHT_FAIRY));

    dispatch_wear(
        &mut character,
        &catalog,
        &clock,
        &session,
        &map,
        UseItemAction::new(PocketType::Equipment, 2),
    )
    .await
    .expect("dispatch");

    assert!(character.inventory.worn(EquipmentSlot::Fairy).is_some());
}

#[tokio::test]
async fn sp_cooldown_reports_remaining_seconds() {
    let catalog = catalog();
    let mut character = character(); // 10s cooldown
    let (session, mut rx, map) = wired(character.id).await;
    let now = Utc::now();
    let clock = ManualClock::starting_at(now);
    character.last_sp_use = now - Duration::seconds(5);

    let mut worn_card = ItemInstance::new(SP_CARD);
    worn_card.bind_to(character.id);
    character
        .inventory
        .insert(PocketType::Wear, EquipmentSlot::Sp.wear_index(), worn_card);
    let mut next_card = ItemInstance::new(SP_CARD);
    next_card.bind_to(character.id);
    character
        .inventory
        .insert(PocketType::Specialist, 0, next_card);

    dispatch_wear(
        &mut character,
        &catalog,
        &clock,
        &session,
        &map,
        UseItemAction::new(PocketType::Specialist, 0),
    )
    .await
    .expect("dispatch");

    let messages = drain(&mut rx);
    assert_eq!(tags(&messages), vec!["effect", "msg"]);
    assert_eq!(
        messages[1],
        ServerMessage::Msg {
            notice: Notice::SpCooldown { remaining_secs: 5 },
        }
    );

    // Once the cooldown has fully elapsed the swap goes through.
    clock.advance(Duration::seconds(5));
    dispatch_wear(
        &mut character,
        &catalog,
        &clock,
        &session,
        &map,
        UseItemAction::new(PocketType::Specialist, 0),
    )
    .await
    .expect("dispatch");
    assert!(character
        .inventory
        .get(PocketType::Specialist, 0)
        .is_some()); // old card swapped back
}

#[tokio::test]
async fn sp_slot_is_blocked_while_transformed() {
    let catalog = catalog();
    let mut character = character();
    character.sp_mode = true;
    let (session, mut rx, map) = wired(character.id).await;
    let clock = ManualClock::starting_at(Utc::now());

    let mut card = ItemInstance::new(SP_CARD);
    card.bind_to(character.id);
    character.inventory.insert(PocketType::Specialist, 0, card);

    dispatch_wear(
        &mut character,
        &catalog,
        &clock,
        &session,
        &map,
        UseItemAction::new(PocketType::Specialist, 0),
    )
    .await
    .expect("dispatch");

    let messages = drain(&mut rx);
    assert_eq!(tags(&messages), vec!["effect", "say"]);
    assert_eq!(
        messages[1],
        ServerMessage::Say {
            color: SayColor::Yellow,
            notice: Notice::SpBlocked,
        }
    );
}

#[tokio::test]
async fn destroyed_card_cannot_be_worn_again() {
    let catalog = catalog();
    let mut character = character();
    let (session, mut rx, map) = wired(character.id).await;
    let clock = ManualClock::starting_at(Utc::now());

    let mut card = ItemInstance::new(SP_CARD).with_rarity(RARITY_DESTROYED);
    card.bind_to(character.id);
    character.inventory.insert(PocketType::Specialist, 0, card);

    dispatch_wear(
        &mut character,
        &catalog,
        &clock,
        &session,
        &map,
        UseItemAction::new(PocketType::Specialist, 0),
    )
    .await
    .expect("dispatch");

    let messages = drain(&mut rx);
    assert_eq!(tags(&messages), vec!["effect", "msg"]);
    assert_eq!(
        messages[1],
        ServerMessage::Msg {
            notice: Notice::DestroyedSp,
        }
    );
    assert!(character.inventory.worn(EquipmentSlot::Sp).is_none());
}

#[tokio::test]
async fn intact_card_with_unusual_rarity_is_fine() {
    let catalog = catalog();
    let mut character = character();
    let (session, _rx, map) = wired(character.id).await;
    let clock = ManualClock::starting_at(Utc::now());

    let mut card = ItemInstance::new(SP_CARD).with_rarity(7);
    card.bind_to(character.id);
    character.inventory.insert(PocketType::Specialist, 0, card);

    dispatch_wear(
        &mut character,
        &catalog,
        &clock,
        &session,
        &map,
        UseItemAction::new(PocketType::Specialist, 0),
    )
    .await
    .expect("dispatch");

    assert!(character.inventory.worn(EquipmentSlot::Sp).is_some());
}

#[tokio::test]
async fn low_job_level_gets_its_own_notice() {
    let catalog = catalog();
    let mut character = character(); // job level 20
    let (session, mut rx, map) = wired(character.id).await;
    let clock = ManualClock::starting_at(Utc::now());

    character
        .inventory
        .insert(PocketType::Equipment, 0, ItemInstance::new(MASTER_GLOVES));

    dispatch_wear(
        &mut character,
        &catalog,
        &clock,
        &session,
        &map,
        UseItemAction::new(PocketType::Equipment, 0),
    )
    .await
    .expect("dispatch");

    let messages = drain(&mut rx);
    assert_eq!(tags(&messages), vec!["effect", "say"]);
    assert_eq!(
        messages[1],
        ServerMessage::Say {
            color: SayColor::Yellow,
            notice: Notice::LowJobLevel,
        }
    );
    assert!(character.inventory.worn(EquipmentSlot::Gloves).is_none());
}
