//! Equip guard chain.
//!
//! Each guard is a pure predicate over (actor snapshot, item snapshot, action
//! parameters). [`evaluate`] walks [`EQUIP_GUARDS`] strictly in declared
//! order and returns the first non-pass outcome. The order is a correctness
//! requirement, not a preference: the shop lock must run before the binding
//! prompt so a shop interaction cannot be bypassed by replaying a confirmed
//! action.

use chrono::{DateTime, Utc};
use log::{debug, warn};

use super::catalog::ItemCatalog;
use super::notify::{Notice, SayColor, ServerMessage};
use super::types::{
    CharacterRecord, Element, EquipmentSlot, ItemInstance, ItemTemplate, UseItemAction,
};

/// Everything a guard may consult. Snapshots only; guards never mutate.
pub struct GuardContext<'a> {
    pub character: &'a CharacterRecord,
    pub template: &'a ItemTemplate,
    pub instance: &'a ItemInstance,
    pub action: UseItemAction,
    pub catalog: &'a ItemCatalog,
    pub now: DateTime<Utc>,
}

/// Specific rejection cause. Every variant maps to its own notice; there is
/// deliberately no generic catch-all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Actor is mid-trade or mid-shop. Logged, never notified.
    Busy,
    StatMismatch,
    IncompatibleFairy,
    SpCooldown { remaining_secs: u64 },
    SpBlocked,
    DestroyedSp,
    LowJobLevel,
}

impl Rejection {
    /// The user-facing message for this cause, or `None` for silent
    /// (log-only) rejections.
    pub fn message(&self) -> Option<ServerMessage> {
        let message = match self {
            Rejection::Busy => return None,
            Rejection::StatMismatch => ServerMessage::Say {
                color: SayColor::Yellow,
                notice: Notice::BadEquipment,
            },
            Rejection::IncompatibleFairy => ServerMessage::Msg {
                notice: Notice::BadFairy,
            },
            Rejection::SpCooldown { remaining_secs } => ServerMessage::Msg {
                notice: Notice::SpCooldown {
                    remaining_secs: *remaining_secs,
                },
            },
            Rejection::SpBlocked => ServerMessage::Say {
                color: SayColor::Yellow,
                notice: Notice::SpBlocked,
            },
            Rejection::DestroyedSp => ServerMessage::Msg {
                notice: Notice::DestroyedSp,
            },
            Rejection::LowJobLevel => ServerMessage::Say {
                color: SayColor::Yellow,
                notice: Notice::LowJobLevel,
            },
        };
        Some(message)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    Pass,
    Reject(Rejection),
    /// Not a failure: the flow should issue the binding confirmation prompt
    /// and stop without mutating.
    NeedsBindConfirm,
}

pub type Guard = fn(&GuardContext<'_>) -> GuardOutcome;

/// The equip guard chain, in evaluation order.
pub const EQUIP_GUARDS: &[(&str, Guard)] = &[
    ("shop_lock", shop_lock),
    ("bind_confirmation", bind_confirmation),
    ("stat_requirements", stat_requirements),
    ("fairy_compatibility", fairy_compatibility),
    ("sp_slot", sp_slot),
    ("job_level", job_level),
];

/// Walk the chain in order; first non-pass outcome wins.
pub fn evaluate(ctx: &GuardContext<'_>) -> GuardOutcome {
    for (name, guard) in EQUIP_GUARDS {
        let outcome = guard(ctx);
        if outcome != GuardOutcome::Pass {
            debug!(
                "equip guard '{}' stopped the chain: {:?} (character={} item={})",
                name, outcome, ctx.character.id, ctx.instance.id
            );
            return outcome;
        }
    }
    GuardOutcome::Pass
}

/// Bit-per-category restriction check: a zero mask is unrestricted, a
/// nonzero mask must have the actor's category bit set.
pub fn mask_allows(mask: u8, category: u8) -> bool {
    mask == 0 || ((mask >> category) & 1) == 1
}

pub fn shop_lock(ctx: &GuardContext<'_>) -> GuardOutcome {
    if ctx.character.in_exchange_or_shop {
        GuardOutcome::Reject(Rejection::Busy)
    } else {
        GuardOutcome::Pass
    }
}

pub fn bind_confirmation(ctx: &GuardContext<'_>) -> GuardOutcome {
    if ctx.template.require_binding
        && ctx.instance.bound_character_id.is_none()
        && ctx.action.mode == 0
    {
        GuardOutcome::NeedsBindConfirm
    } else {
        GuardOutcome::Pass
    }
}

pub fn stat_requirements(ctx: &GuardContext<'_>) -> GuardOutcome {
    let character = ctx.character;
    let template = ctx.template;
    if character.effective_level(template) < template.level_minimum
        || !mask_allows(template.sex_mask, character.gender as u8)
        || !mask_allows(template.class_mask, character.class as u8)
    {
        GuardOutcome::Reject(Rejection::StatMismatch)
    } else {
        GuardOutcome::Pass
    }
}

/// A fairy worn during a specialist transformation must share an element with
/// the active specialist card.
pub fn fairy_compatibility(ctx: &GuardContext<'_>) -> GuardOutcome {
    if ctx.template.equipment_slot != EquipmentSlot::Fairy || !ctx.character.sp_mode {
        return GuardOutcome::Pass;
    }
    let Some(worn_sp) = ctx.character.inventory.worn(EquipmentSlot::Sp) else {
        return GuardOutcome::Pass;
    };
    let Some(sp_template) = ctx.catalog.get(worn_sp.template_id) else {
        warn!(
            "worn sp {} references unknown template {}",
            worn_sp.id, worn_sp.template_id
        );
        return GuardOutcome::Pass;
    };
    if sp_template.element != Element::Neutral
        && ctx.template.element != sp_template.element
        && ctx.template.secondary_element != sp_template.element
    {
        GuardOutcome::Reject(Rejection::IncompatibleFairy)
    } else {
        GuardOutcome::Pass
    }
}

/// Specialist slot rules: the cooldown since the last transformation, the
/// active-transformation lock, and the destroyed-card sentinel, in that
/// order.
pub fn sp_slot(ctx: &GuardContext<'_>) -> GuardOutcome {
    if ctx.template.equipment_slot != EquipmentSlot::Sp {
        return GuardOutcome::Pass;
    }
    let character = ctx.character;

    let elapsed_secs =
        (ctx.now - character.last_sp_use).num_milliseconds() as f64 / 1000.0;
    if character.inventory.worn(EquipmentSlot::Sp).is_some()
        && elapsed_secs < character.sp_cooldown_secs as f64
    {
        let remaining = character.sp_cooldown_secs - elapsed_secs.round() as i64;
        return GuardOutcome::Reject(Rejection::SpCooldown {
            remaining_secs: remaining.max(0) as u64,
        });
    }

    if character.sp_mode {
        return GuardOutcome::Reject(Rejection::SpBlocked);
    }

    if ctx.instance.is_destroyed() {
        return GuardOutcome::Reject(Rejection::DestroyedSp);
    }

    GuardOutcome::Pass
}

pub fn job_level(ctx: &GuardContext<'_>) -> GuardOutcome {
    if ctx.character.job_level < ctx.template.job_level_minimum {
        GuardOutcome::Reject(Rejection::LowJobLevel)
    } else {
        GuardOutcome::Pass
    }
}
