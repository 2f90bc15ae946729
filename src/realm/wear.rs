//! The wear handler: equips weapons, jewelry, armor, fashion and specialist
//! cards.
//!
//! The flow is a fixed sequence: cosmetic attempt effect, guard chain,
//! inventory move into the Wear pocket, binding, expiry timer, then the
//! notification sequence. Guard failures terminate the flow with at most one
//! notice and no mutation; once the move commits the flow always runs to the
//! end, even if individual notifications cannot be delivered.

use async_trait::async_trait;
use chrono::Duration;
use log::{debug, info, warn};

use crate::metrics;

use super::dispatch::{ActionContext, ItemEventHandler};
use super::errors::RealmError;
use super::notify::{self, Notice, ServerMessage, EFFECT_EQUIP_ATTEMPT};
use super::rules::{self, GuardContext, GuardOutcome, Rejection};
use super::types::{ItemTemplate, ItemType, PocketType, UseItemAction};

#[derive(Debug, Clone, Copy, Default)]
pub struct WearHandler;

impl WearHandler {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ItemEventHandler for WearHandler {
    fn matches(&self, template: &ItemTemplate) -> bool {
        matches!(
            template.item_type,
            ItemType::Weapon
                | ItemType::Jewelry
                | ItemType::Armor
                | ItemType::Fashion
                | ItemType::Specialist
        )
    }

    async fn execute(
        &self,
        ctx: &mut ActionContext<'_>,
        action: UseItemAction,
    ) -> Result<(), RealmError> {
        metrics::inc_equip_attempts();

        // The attempt effect is always shown, even when a guard rejects.
        notify::send_to(
            ctx.session,
            ServerMessage::Effect {
                effect_id: EFFECT_EQUIP_ATTEMPT,
            },
        )
        .await;

        let instance = ctx
            .character
            .inventory
            .get(action.pocket, action.slot)
            .cloned()
            .ok_or(RealmError::EmptySlot {
                pocket: action.pocket,
                slot: action.slot,
            })?;
        let template = ctx
            .catalog
            .get(instance.template_id)
            .ok_or(RealmError::UnknownTemplate(instance.template_id))?;
        let now = ctx.clock.now();

        debug!(
            "wear: character={} item={} template={} mode={}",
            ctx.character.id, instance.id, template.id, action.mode
        );

        let outcome = rules::evaluate(&GuardContext {
            character: ctx.character,
            template: &template,
            instance: &instance,
            action,
            catalog: ctx.catalog,
            now,
        });
        match outcome {
            GuardOutcome::Pass => {}
            GuardOutcome::NeedsBindConfirm => {
                metrics::inc_bind_prompts();
                notify::send_to(
                    ctx.session,
                    ServerMessage::Confirm {
                        notice: Notice::AskBind,
                        on_yes: action.confirmed(),
                    },
                )
                .await;
                return Ok(());
            }
            GuardOutcome::Reject(rejection) => {
                metrics::inc_equip_rejections();
                match rejection.message() {
                    Some(message) => notify::send_to(ctx.session, message).await,
                    None => {
                        // Silent causes (shop lock) are logged only.
                        warn!(
                            "cannot equip while in an exchange or shop (character={} item={})",
                            ctx.character.id, instance.id
                        );
                    }
                }
                return Ok(());
            }
        }

        let wear_slot = template.equipment_slot.wear_index();
        ctx.character.inventory.move_item(
            action.pocket,
            action.slot,
            PocketType::Wear,
            wear_slot,
            true,
        )?;

        // Post-move state of the source address, for the pocket-change
        // notification (the swapped-out item, or empty).
        let vacated = ctx
            .character
            .inventory
            .get(action.pocket, action.slot)
            .cloned();

        notify::announce_equip(
            ctx.session,
            ctx.map,
            ctx.character,
            &template,
            action,
            vacated.as_ref(),
        )
        .await;

        let character_id = ctx.character.id;
        let equipped = ctx
            .character
            .inventory
            .get_mut(PocketType::Wear, wear_slot)
            .ok_or_else(|| {
                RealmError::Internal(format!(
                    "item {} vanished from wear slot {} after move",
                    instance.id, wear_slot
                ))
            })?;
        equipped.bind_to(character_id);

        // A positive valid-time starts (or restarts) the expiry timer at bind
        // time. Re-wearing a timed item refreshes the timer.
        if template.valid_seconds > 0 && equipped.bound_character_id.is_some() {
            equipped.delete_at = Some(now + Duration::seconds(template.valid_seconds));
        }

        metrics::inc_equip_successes();
        info!(
            "character {} equipped {} into {:?}",
            character_id, template.name, template.equipment_slot
        );
        Ok(())
    }
}
