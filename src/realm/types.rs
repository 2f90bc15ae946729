use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const ITEM_SCHEMA_VERSION: u8 = 1;

/// Rarity grade sentinel for a destroyed specialist card.
pub const RARITY_DESTROYED: i8 = -2;

/// Broad item family. Only a subset of these is wearable; the wear handler's
/// applicability predicate decides which.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ItemType {
    Weapon,
    Jewelry,
    Armor,
    Fashion,
    Specialist,
    Potion,
    Production,
    Special,
}

/// Sub-slot of the Wear pocket an item occupies once equipped. The template
/// decides the slot; the slot index doubles as the Wear pocket slot key.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentSlot {
    #[default]
    MainWeapon = 0,
    SecondaryWeapon = 1,
    Armor = 2,
    Hat = 3,
    Gloves = 4,
    Boots = 5,
    Necklace = 6,
    Ring = 7,
    Bracelet = 8,
    Mask = 9,
    Fairy = 10,
    Amulet = 11,
    Sp = 12,
    CostumeSuit = 13,
    CostumeHat = 14,
}

impl EquipmentSlot {
    /// Slot index inside the Wear pocket.
    pub fn wear_index(self) -> i16 {
        self as i16
    }

    pub fn from_wear_index(index: i16) -> Option<Self> {
        let slot = match index {
            0 => Self::MainWeapon,
            1 => Self::SecondaryWeapon,
            2 => Self::Armor,
            3 => Self::Hat,
            4 => Self::Gloves,
            5 => Self::Boots,
            6 => Self::Necklace,
            7 => Self::Ring,
            8 => Self::Bracelet,
            9 => Self::Mask,
            10 => Self::Fairy,
            11 => Self::Amulet,
            12 => Self::Sp,
            13 => Self::CostumeSuit,
            14 => Self::CostumeHat,
            _ => return None,
        };
        Some(slot)
    }
}

/// Named inventory partition. `Wear` is special: its slots are addressed by
/// [`EquipmentSlot::wear_index`] rather than an arbitrary bag index.
#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
#[serde(rename_all = "snake_case")]
pub enum PocketType {
    Equipment,
    Main,
    Etc,
    Specialist,
    Costume,
    Wear,
}

/// Elemental affinity. `Neutral` is the "no element" zero value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    #[default]
    Neutral,
    Fire,
    Water,
    Light,
    Dark,
}

/// Bit position inside a template's sex restriction mask.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male = 0,
    Female = 1,
}

/// Bit position inside a template's class restriction mask.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum CharacterClass {
    Adventurer = 0,
    Swordsman = 1,
    Archer = 2,
    Mage = 3,
    MartialArtist = 4,
}

/// Immutable item definition, shared across all instances of the same item.
///
/// Restriction masks use bit-per-category semantics: a zero mask means
/// "unrestricted", a nonzero mask must have the bit of the actor's category
/// set.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemTemplate {
    pub id: u32,
    pub name: String,
    pub item_type: ItemType,
    /// Meaningless for non-wearable item types; defaults to the zero slot.
    #[serde(default)]
    pub equipment_slot: EquipmentSlot,
    #[serde(default)]
    pub level_minimum: u8,
    #[serde(default)]
    pub job_level_minimum: u8,
    /// Heroic items check the actor's hero level instead of the base level.
    #[serde(default)]
    pub heroic: bool,
    #[serde(default)]
    pub sex_mask: u8,
    #[serde(default)]
    pub class_mask: u8,
    #[serde(default)]
    pub element: Element,
    #[serde(default)]
    pub secondary_element: Element,
    /// When set, equipping prompts for confirmation before the item is bound.
    #[serde(default)]
    pub require_binding: bool,
    /// Lifetime in seconds once bound; 0 means the item never expires.
    #[serde(default)]
    pub valid_seconds: i64,
    #[serde(default = "default_item_schema_version")]
    pub schema_version: u8,
}

fn default_item_schema_version() -> u8 {
    ITEM_SCHEMA_VERSION
}

impl ItemTemplate {
    pub fn new(id: u32, name: &str, item_type: ItemType, equipment_slot: EquipmentSlot) -> Self {
        Self {
            id,
            name: name.to_string(),
            item_type,
            equipment_slot,
            level_minimum: 0,
            job_level_minimum: 0,
            heroic: false,
            sex_mask: 0,
            class_mask: 0,
            element: Element::Neutral,
            secondary_element: Element::Neutral,
            require_binding: false,
            valid_seconds: 0,
            schema_version: ITEM_SCHEMA_VERSION,
        }
    }

    pub fn with_level_minimum(mut self, level: u8) -> Self {
        self.level_minimum = level;
        self
    }

    pub fn with_job_level_minimum(mut self, level: u8) -> Self {
        self.job_level_minimum = level;
        self
    }

    pub fn with_heroic(mut self) -> Self {
        self.heroic = true;
        self
    }

    pub fn with_sex_mask(mut self, mask: u8) -> Self {
        self.sex_mask = mask;
        self
    }

    pub fn with_class_mask(mut self, mask: u8) -> Self {
        self.class_mask = mask;
        self
    }

    pub fn with_elements(mut self, primary: Element, secondary: Element) -> Self {
        self.element = primary;
        self.secondary_element = secondary;
        self
    }

    pub fn with_require_binding(mut self) -> Self {
        self.require_binding = true;
        self
    }

    pub fn with_valid_seconds(mut self, seconds: i64) -> Self {
        self.valid_seconds = seconds;
        self
    }
}

/// A concrete item owned by exactly one (pocket, slot) address at a time.
/// Equipping relocates the instance; it is never copied.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ItemInstance {
    pub id: Uuid,
    pub template_id: u32,
    pub rarity: i8,
    /// Set once at bind time, never cleared by the equip flow.
    #[serde(default)]
    pub bound_character_id: Option<u64>,
    /// Expiry timestamp, derived from the template's valid-seconds at bind time.
    #[serde(default)]
    pub delete_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    #[serde(default = "default_item_schema_version")]
    pub schema_version: u8,
}

impl ItemInstance {
    pub fn new(template_id: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            template_id,
            rarity: 0,
            bound_character_id: None,
            delete_at: None,
            created_at: Utc::now(),
            schema_version: ITEM_SCHEMA_VERSION,
        }
    }

    pub fn with_rarity(mut self, rarity: i8) -> Self {
        self.rarity = rarity;
        self
    }

    pub fn is_destroyed(&self) -> bool {
        self.rarity == RARITY_DESTROYED
    }

    /// Bind the instance to a character. Only transitions unset -> set;
    /// re-binding to the same character is a no-op and a mismatched existing
    /// binding is left untouched.
    pub fn bind_to(&mut self, character_id: u64) {
        match self.bound_character_id {
            None => self.bound_character_id = Some(character_id),
            Some(existing) if existing != character_id => {
                warn!(
                    "refusing to rebind item {} (bound to {}, requested {})",
                    self.id, existing, character_id
                );
            }
            Some(_) => {}
        }
    }
}

/// Actor state consulted by the equip guard chain. The inventory is owned by
/// the character; the dispatch layer hands out one `&mut` at a time, which is
/// what makes the move/bind/expire steps race-free.
#[derive(Debug, Clone)]
pub struct CharacterRecord {
    pub id: u64,
    pub name: String,
    pub level: u8,
    pub hero_level: u8,
    pub job_level: u8,
    pub gender: Gender,
    pub class: CharacterClass,
    /// True while a specialist transformation is active.
    pub sp_mode: bool,
    pub last_sp_use: DateTime<Utc>,
    pub sp_cooldown_secs: i64,
    pub sp_points: u32,
    pub sp_addition_points: u32,
    /// True while the character is in a trade or private-shop interaction.
    pub in_exchange_or_shop: bool,
    pub map_id: u32,
    pub inventory: super::inventory::Inventory,
}

impl CharacterRecord {
    pub fn new(id: u64, name: &str) -> Self {
        Self {
            id,
            name: name.to_string(),
            level: 1,
            hero_level: 0,
            job_level: 1,
            gender: Gender::Male,
            class: CharacterClass::Adventurer,
            sp_mode: false,
            last_sp_use: DateTime::<Utc>::UNIX_EPOCH,
            sp_cooldown_secs: 30,
            sp_points: 10_000,
            sp_addition_points: 0,
            in_exchange_or_shop: false,
            map_id: 0,
            inventory: super::inventory::Inventory::new(),
        }
    }

    /// Level compared against a template's minimum: heroic templates check the
    /// hero level, everything else the base level.
    pub fn effective_level(&self, template: &ItemTemplate) -> u8 {
        if template.heroic {
            self.hero_level
        } else {
            self.level
        }
    }
}

/// Parameters of one "use item" action as submitted by the client. Kept
/// plain-data and serializable so a confirmation prompt can replay the same
/// logical request with the mode flag flipped, without holding live object
/// references.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct UseItemAction {
    pub pocket: PocketType,
    pub slot: i16,
    /// 0 = first submission, 1 = re-submission after the binding prompt.
    pub mode: u8,
    pub parameter: u8,
}

impl UseItemAction {
    pub fn new(pocket: PocketType, slot: i16) -> Self {
        Self {
            pocket,
            slot,
            mode: 0,
            parameter: 0,
        }
    }

    /// The same action with the confirmation mode flag set; used as the
    /// affirmative payload of the binding prompt.
    pub fn confirmed(self) -> Self {
        Self { mode: 1, ..self }
    }
}
