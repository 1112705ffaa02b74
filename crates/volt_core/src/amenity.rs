use serde::{Deserialize, Serialize};

use crate::{AmenityCategory, AmenityItem, AmenityKind, AmenitySelection, BookingError};

/// Optional local add-ons offered alongside a charging session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AmenityCatalog {
    categories: Vec<AmenityCategory>,
}

fn item(id: &str, name: &str, price: u64, description: &str) -> AmenityItem {
    AmenityItem {
        id: id.into(),
        name: name.into(),
        price,
        description: description.into(),
    }
}

impl Default for AmenityCatalog {
    fn default() -> Self {
        Self::reference()
    }
}

impl AmenityCatalog {
    pub fn new(categories: Vec<AmenityCategory>) -> Self {
        AmenityCatalog { categories }
    }

    /// The catalog offered by default: food, accommodation and entertainment.
    pub fn reference() -> Self {
        AmenityCatalog::new(vec![
            AmenityCategory {
                kind: AmenityKind::Food,
                max_selectable: 3,
                items: vec![
                    item("food_1", "South Indian Breakfast", 80, "Dosa, Idli, Vada"),
                    item(
                        "food_2",
                        "Local Thali",
                        120,
                        "Traditional meal with rice, dal, vegetables",
                    ),
                    item("food_3", "Street Food Combo", 60, "Chaat, Pani Puri, Bhel"),
                ],
            },
            AmenityCategory {
                kind: AmenityKind::Accommodation,
                max_selectable: 2,
                items: vec![
                    item(
                        "stay_1",
                        "Budget Room",
                        800,
                        "Clean AC room with basic amenities (per night)",
                    ),
                    item(
                        "stay_2",
                        "Premium Stay",
                        1500,
                        "Deluxe room with WiFi, breakfast included (per night)",
                    ),
                ],
            },
            AmenityCategory {
                kind: AmenityKind::Entertainment,
                max_selectable: 2,
                items: vec![
                    item(
                        "ent_1",
                        "Local Sightseeing",
                        300,
                        "Guided tour of nearby attractions",
                    ),
                    item(
                        "ent_2",
                        "Cultural Experience",
                        200,
                        "Traditional music/dance performance",
                    ),
                ],
            },
        ])
    }

    pub fn categories(&self) -> &[AmenityCategory] {
        &self.categories
    }

    fn items(&self) -> impl Iterator<Item = (&AmenityCategory, &AmenityItem)> {
        self.categories
            .iter()
            .flat_map(|category| category.items.iter().map(move |item| (category, item)))
    }

    pub fn find(&self, id: &str) -> Option<&AmenityItem> {
        self.items().find(|(_, item)| item.id == id).map(|(_, item)| item)
    }

    pub fn category_of(&self, id: &str) -> Option<&AmenityCategory> {
        self.items()
            .find(|(_, item)| item.id == id)
            .map(|(category, _)| category)
    }

    /// Add `id` when absent, remove it when present.
    ///
    /// Caps are not checked here, see [`AmenityCatalog::can_select`].
    pub fn toggle_selection(current: &AmenitySelection, id: &str) -> AmenitySelection {
        let mut selection = current.clone();
        if !selection.remove(id) {
            selection.insert(id.to_string());
        }
        selection
    }

    /// Sum of the prices of the selected items. Ids missing from the catalog
    /// contribute nothing.
    pub fn total_for(&self, selection: &AmenitySelection) -> Result<u64, BookingError> {
        self.items()
            .filter(|(_, item)| selection.contains(&item.id))
            .try_fold(0u64, |total, (_, item)| {
                total.checked_add(item.price).ok_or_else(|| {
                    BookingError::invalid_input("selected amenity prices overflow the total")
                })
            })
    }

    /// Selected items in catalog order.
    pub fn selected_items(&self, selection: &AmenitySelection) -> Vec<AmenityItem> {
        self.items()
            .filter(|(_, item)| selection.contains(&item.id))
            .map(|(_, item)| item.clone())
            .collect()
    }

    pub fn selected_in_category(&self, kind: AmenityKind, selection: &AmenitySelection) -> usize {
        self.items()
            .filter(|(category, item)| category.kind == kind && selection.contains(&item.id))
            .count()
    }

    /// Check that `id` may be added to `selection` without exceeding its
    /// category cap.
    pub fn can_select(&self, selection: &AmenitySelection, id: &str) -> Result<(), BookingError> {
        let Some(category) = self.category_of(id) else {
            return Err(BookingError::AmenityNotFound {
                amenity_id: id.to_string(),
            });
        };
        if selection.contains(id) {
            return Ok(());
        }
        if self.selected_in_category(category.kind, selection) >= category.max_selectable {
            return Err(BookingError::AmenityCapReached {
                kind: category.kind,
                cap: category.max_selectable,
            });
        }
        Ok(())
    }
}
