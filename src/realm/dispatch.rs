//! Item action dispatch.
//!
//! Handlers self-declare their applicability over item templates; the
//! registry routes an incoming action to every handler whose predicate
//! matches and invokes them independently. A handler failure is logged with
//! the actor and instance ids and never suppresses the remaining handlers.
//!
//! The registry does not serialize actions; the embedding server acquires
//! the per-character exclusive scope before dispatching, which is what the
//! `&mut ActionContext` borrow encodes.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, error};

use super::catalog::ItemCatalog;
use super::clock::GameClock;
use super::errors::RealmError;
use super::notify::{MapHandle, SessionHandle};
use super::types::{CharacterRecord, ItemTemplate, UseItemAction};

/// Per-action collaborators handed to a handler: the exclusively borrowed
/// actor, the shared catalog, the clock, and the outbound channels.
pub struct ActionContext<'a> {
    pub character: &'a mut CharacterRecord,
    pub catalog: &'a ItemCatalog,
    pub clock: &'a dyn GameClock,
    pub session: &'a SessionHandle,
    pub map: &'a MapHandle,
}

/// Fixed two-operation handler interface: an applicability predicate over
/// the item template, and the action body.
#[async_trait]
pub trait ItemEventHandler: Send + Sync {
    fn matches(&self, template: &ItemTemplate) -> bool;

    async fn execute(
        &self,
        ctx: &mut ActionContext<'_>,
        action: UseItemAction,
    ) -> Result<(), RealmError>;
}

#[derive(Default)]
pub struct HandlerRegistry {
    handlers: Vec<Arc<dyn ItemEventHandler>>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, handler: Arc<dyn ItemEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Resolve the action's item and route it to every matching handler.
    /// Returns how many handlers ran. Lookup failures abort the whole
    /// dispatch (nothing has run yet); individual handler failures abort
    /// that handler only.
    pub async fn dispatch(
        &self,
        ctx: &mut ActionContext<'_>,
        action: UseItemAction,
    ) -> Result<usize, RealmError> {
        let (instance_id, template) = {
            let instance = ctx
                .character
                .inventory
                .get(action.pocket, action.slot)
                .ok_or(RealmError::EmptySlot {
                    pocket: action.pocket,
                    slot: action.slot,
                })?;
            let template = ctx
                .catalog
                .get(instance.template_id)
                .ok_or(RealmError::UnknownTemplate(instance.template_id))?;
            (instance.id, template)
        };

        let mut invoked = 0;
        for handler in &self.handlers {
            if !handler.matches(&template) {
                continue;
            }
            invoked += 1;
            if let Err(e) = handler.execute(ctx, action).await {
                error!(
                    "item handler failed: {} (character={} instance={})",
                    e, ctx.character.id, instance_id
                );
            }
        }
        if invoked == 0 {
            debug!(
                "no handler for item template {} ({:?})",
                template.id, template.item_type
            );
        }
        Ok(invoked)
    }
}
