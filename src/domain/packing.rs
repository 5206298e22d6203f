// Bin and inventory specification
// `PackingConfig` is the raw, serde-facing input; `PackingSpec` is the validated,
// immutable view every other component receives.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rejected configuration, reported before any variable is built
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpecError {
    #[error("Bin dimensions must be positive, got {width}x{height}")]
    BinDimensions { width: i64, height: i64 },

    #[error("Item {index} dimensions must be positive, got {width}x{height}")]
    ItemDimensions { index: usize, width: i64, height: i64 },

    #[error("Item {index} count must not be negative, got {count}")]
    NegativeCount { index: usize, count: i64 },

    #[error("Inventory must contain at least one item type")]
    NoItems,

    #[error("{field} must be a finite number, got {value}")]
    NonFinite { field: String, value: f64 },
}

/// Identity of an item type: its position in the inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemTypeId(pub usize);

impl ItemTypeId {
    pub fn index(self) -> usize {
        self.0
    }

    /// Display label: `A`..`Z`, then `AA`, `AB`, ...
    pub fn label(self) -> String {
        let mut n = self.0 + 1;
        let mut label = Vec::new();
        while n > 0 {
            let rem = (n - 1) % 26;
            label.push(b'A' + rem as u8);
            n = (n - 1) / 26;
        }
        label.reverse();
        String::from_utf8(label).unwrap_or_default()
    }
}

impl fmt::Display for ItemTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// The fixed-size grid to fill
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinSpec {
    pub width: usize,
    pub height: usize,
}

impl BinSpec {
    pub fn cells(&self) -> usize {
        self.width * self.height
    }
}

/// A rectangular, non-rotatable item with a bounded inventory
#[derive(Debug, Clone, PartialEq)]
pub struct ItemType {
    pub id: ItemTypeId,
    pub name: Option<String>,
    pub width: usize,
    pub height: usize,
    pub count: usize,
    pub unit_cost: f64,
}

impl ItemType {
    pub fn area(&self) -> usize {
        self.width * self.height
    }

    pub fn fits_in(&self, bin: &BinSpec) -> bool {
        self.width <= bin.width && self.height <= bin.height
    }
}

/// Reward per covered cell and penalty per uncovered cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewardConfig {
    pub reward: f64,
    pub penalty: f64,
}

/// Validated bin, inventory and reward constants for one run
#[derive(Debug, Clone, PartialEq)]
pub struct PackingSpec {
    bin: BinSpec,
    items: Vec<ItemType>,
    rewards: RewardConfig,
}

impl PackingSpec {
    pub fn bin(&self) -> &BinSpec {
        &self.bin
    }

    pub fn items(&self) -> &[ItemType] {
        &self.items
    }

    pub fn item(&self, id: ItemTypeId) -> Option<&ItemType> {
        self.items.get(id.index())
    }

    pub fn rewards(&self) -> &RewardConfig {
        &self.rewards
    }
}

impl TryFrom<PackingConfig> for PackingSpec {
    type Error = SpecError;

    fn try_from(config: PackingConfig) -> Result<Self, Self::Error> {
        config.validate()
    }
}

/// One item type as it appears in the input configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub width: i64,
    pub height: i64,
    pub count: i64,
    pub unit_cost: f64,
}

impl ItemConfig {
    pub fn new(width: i64, height: i64, count: i64, unit_cost: f64) -> Self {
        Self {
            name: None,
            width,
            height,
            count,
            unit_cost,
        }
    }
}

/// Raw packing input `{ binWidth, binHeight, items, reward, penalty }`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PackingConfig {
    pub bin_width: i64,
    pub bin_height: i64,
    pub items: Vec<ItemConfig>,
    pub reward: f64,
    pub penalty: f64,
}

impl Default for PackingConfig {
    fn default() -> Self {
        Self {
            bin_width: 4,
            bin_height: 3,
            items: vec![ItemConfig::new(1, 1, 3, 5.0), ItemConfig::new(2, 1, 4, 3.0)],
            reward: 10.0,
            penalty: -10.0,
        }
    }
}

impl PackingConfig {
    /// Check every field and build the immutable spec.
    pub fn validate(&self) -> Result<PackingSpec, SpecError> {
        if self.bin_width <= 0 || self.bin_height <= 0 {
            return Err(SpecError::BinDimensions {
                width: self.bin_width,
                height: self.bin_height,
            });
        }
        if self.items.is_empty() {
            return Err(SpecError::NoItems);
        }
        finite("reward", self.reward)?;
        finite("penalty", self.penalty)?;

        let mut items = Vec::with_capacity(self.items.len());
        for (index, item) in self.items.iter().enumerate() {
            if item.width <= 0 || item.height <= 0 {
                return Err(SpecError::ItemDimensions {
                    index,
                    width: item.width,
                    height: item.height,
                });
            }
            if item.count < 0 {
                return Err(SpecError::NegativeCount {
                    index,
                    count: item.count,
                });
            }
            finite(&format!("items[{}].unitCost", index), item.unit_cost)?;

            items.push(ItemType {
                id: ItemTypeId(index),
                name: item.name.clone(),
                width: item.width as usize,
                height: item.height as usize,
                count: item.count as usize,
                unit_cost: item.unit_cost,
            });
        }

        Ok(PackingSpec {
            bin: BinSpec {
                width: self.bin_width as usize,
                height: self.bin_height as usize,
            },
            items,
            rewards: RewardConfig {
                reward: self.reward,
                penalty: self.penalty,
            },
        })
    }
}

fn finite(field: &str, value: f64) -> Result<(), SpecError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SpecError::NonFinite {
            field: field.to_string(),
            value,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_reference_instance() {
        let spec = PackingConfig::default().validate().unwrap();
        assert_eq!(spec.bin(), &BinSpec { width: 4, height: 3 });
        assert_eq!(spec.items().len(), 2);
        assert_eq!(spec.items()[1].width, 2);
        assert_eq!(spec.items()[1].height, 1);
        assert_eq!(spec.items()[1].count, 4);
        assert_eq!(spec.rewards().penalty, -10.0);
    }

    #[test]
    fn labels_are_alphabetic_projection() {
        assert_eq!(ItemTypeId(0).label(), "A");
        assert_eq!(ItemTypeId(1).label(), "B");
        assert_eq!(ItemTypeId(25).label(), "Z");
        assert_eq!(ItemTypeId(26).label(), "AA");
        assert_eq!(ItemTypeId(27).to_string(), "AB");
    }

    #[test]
    fn rejects_bad_bin() {
        let config = PackingConfig {
            bin_width: 0,
            ..PackingConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(SpecError::BinDimensions { width: 0, height: 3 })
        );

        let config = PackingConfig {
            bin_height: -2,
            ..PackingConfig::default()
        };
        assert!(matches!(config.validate(), Err(SpecError::BinDimensions { .. })));
    }

    #[test]
    fn rejects_bad_items() {
        let mut config = PackingConfig::default();
        config.items[1].width = -1;
        assert_eq!(
            config.validate(),
            Err(SpecError::ItemDimensions { index: 1, width: -1, height: 1 })
        );

        let mut config = PackingConfig::default();
        config.items[0].count = -3;
        assert_eq!(
            config.validate(),
            Err(SpecError::NegativeCount { index: 0, count: -3 })
        );

        let config = PackingConfig {
            items: Vec::new(),
            ..PackingConfig::default()
        };
        assert_eq!(config.validate(), Err(SpecError::NoItems));
    }

    #[test]
    fn rejects_non_finite_constants() {
        let config = PackingConfig {
            reward: f64::NAN,
            ..PackingConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(SpecError::NonFinite { ref field, .. }) if field == "reward"
        ));

        let mut config = PackingConfig::default();
        config.items[1].unit_cost = f64::INFINITY;
        assert!(matches!(
            config.validate(),
            Err(SpecError::NonFinite { ref field, .. }) if field == "items[1].unitCost"
        ));
    }

    #[test]
    fn zero_count_and_oversized_items_are_valid() {
        let config = PackingConfig {
            bin_width: 1,
            bin_height: 1,
            items: vec![ItemConfig::new(2, 2, 1, 1.0), ItemConfig::new(1, 1, 0, 1.0)],
            ..PackingConfig::default()
        };
        let spec = PackingSpec::try_from(config).unwrap();
        assert!(!spec.items()[0].fits_in(spec.bin()));
        assert_eq!(spec.items()[1].count, 0);
    }

    #[test]
    fn parses_camel_case_json() {
        let json = r#"{
            "binWidth": 5,
            "binHeight": 2,
            "items": [{ "width": 1, "height": 2, "count": 3, "unitCost": 1.5, "name": "post" }],
            "reward": 4.0,
            "penalty": -1.0
        }"#;
        let config: PackingConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.bin_width, 5);
        assert_eq!(config.items[0].name.as_deref(), Some("post"));
        assert_eq!(config.items[0].unit_cost, 1.5);
    }
}
