/// Per-character inventory store.
///
/// Item instances are keyed by (pocket, slot). Every relocation goes through
/// [`Inventory::move_item`], which validates both addresses before touching
/// the map, so a failed move never leaves the store half-updated. Exclusivity
/// across concurrent actions is the dispatch layer's job: it hands out one
/// `&mut CharacterRecord` at a time.
use std::collections::BTreeMap;

use super::errors::RealmError;
use super::types::{EquipmentSlot, ItemInstance, PocketType};

#[derive(Debug, Clone, Default)]
pub struct Inventory {
    slots: BTreeMap<(PocketType, i16), ItemInstance>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place an item at an address, returning whatever it displaced. Used by
    /// drop/reward/purchase flows; the equip pipeline itself only moves.
    pub fn insert(
        &mut self,
        pocket: PocketType,
        slot: i16,
        item: ItemInstance,
    ) -> Option<ItemInstance> {
        self.slots.insert((pocket, slot), item)
    }

    pub fn get(&self, pocket: PocketType, slot: i16) -> Option<&ItemInstance> {
        self.slots.get(&(pocket, slot))
    }

    pub fn get_mut(&mut self, pocket: PocketType, slot: i16) -> Option<&mut ItemInstance> {
        self.slots.get_mut(&(pocket, slot))
    }

    pub fn remove(&mut self, pocket: PocketType, slot: i16) -> Option<ItemInstance> {
        self.slots.remove(&(pocket, slot))
    }

    /// The item currently worn in an equipment slot, if any.
    pub fn worn(&self, slot: EquipmentSlot) -> Option<&ItemInstance> {
        self.get(PocketType::Wear, slot.wear_index())
    }

    /// All worn items with their equipment slots, in slot order.
    pub fn worn_items(&self) -> impl Iterator<Item = (EquipmentSlot, &ItemInstance)> {
        self.slots.iter().filter_map(|((pocket, slot), item)| {
            if *pocket == PocketType::Wear {
                EquipmentSlot::from_wear_index(*slot).map(|s| (s, item))
            } else {
                None
            }
        })
    }

    /// Relocate an item between two addresses. With `allow_swap`, an occupant
    /// of the destination is moved back to the source address; without it the
    /// move fails. Both addresses are validated up front, so on any `Err` the
    /// store is untouched.
    pub fn move_item(
        &mut self,
        src_pocket: PocketType,
        src_slot: i16,
        dst_pocket: PocketType,
        dst_slot: i16,
        allow_swap: bool,
    ) -> Result<(), RealmError> {
        if !self.slots.contains_key(&(src_pocket, src_slot)) {
            return Err(RealmError::EmptySlot {
                pocket: src_pocket,
                slot: src_slot,
            });
        }
        let dst_occupied = self.slots.contains_key(&(dst_pocket, dst_slot));
        if dst_occupied && !allow_swap && (src_pocket, src_slot) != (dst_pocket, dst_slot) {
            return Err(RealmError::SlotOccupied {
                pocket: dst_pocket,
                slot: dst_slot,
            });
        }

        let moving = match self.slots.remove(&(src_pocket, src_slot)) {
            Some(item) => item,
            None => {
                return Err(RealmError::EmptySlot {
                    pocket: src_pocket,
                    slot: src_slot,
                })
            }
        };
        if let Some(displaced) = self.slots.insert((dst_pocket, dst_slot), moving) {
            self.slots.insert((src_pocket, src_slot), displaced);
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}
