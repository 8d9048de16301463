//! Marketplace product catalog.
//!
//! The catalog keeps one product list per [`Language`]. Entries share an id
//! across languages; only the name and description differ. Supplier edits
//! are written to every language at once, so a product added in the
//! dashboard shows the supplier's own wording everywhere.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::types::{Language, Money, ProductId};

/// Supplier name of the seeded products.
pub const SEED_SUPPLIER: &str = "Agri Supplies";

/// Errors from catalog mutations.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    #[error("product name cannot be empty")]
    EmptyName,
    #[error("product price cannot be negative")]
    NegativePrice,
    #[error("product price cannot have more than two decimal places")]
    PriceTooPrecise,
    #[error("product price is too large")]
    PriceTooLarge,
    #[error("product {0} not found")]
    NotFound(ProductId),
}

/// A product as shown in one language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Money,
    pub image: String,
    pub supplier_name: String,
}

/// Fields a supplier fills in to list or edit a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Money,
    #[serde(default)]
    pub image: String,
}

impl ProductDraft {
    /// Check the draft and trim its text fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is blank, or the price is negative, has
    /// fractions of a paisa, or does not fit the price column.
    pub fn validated(self) -> Result<Self, CatalogError> {
        let name = self.name.trim().to_owned();
        if name.is_empty() {
            return Err(CatalogError::EmptyName);
        }
        if self.price.is_negative() {
            return Err(CatalogError::NegativePrice);
        }
        if self.price.has_sub_paise() {
            return Err(CatalogError::PriceTooPrecise);
        }
        if !self.price.fits_storage() {
            return Err(CatalogError::PriceTooLarge);
        }
        Ok(Self {
            name,
            description: self.description.trim().to_owned(),
            price: self.price,
            image: self.image.trim().to_owned(),
        })
    }
}

/// Per-language product lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    lists: HashMap<Language, Vec<Product>>,
}

struct SeedEntry {
    id: i32,
    price: i64,
    image: &'static str,
    text: [(&'static str, &'static str); 3],
}

const SEED: [SeedEntry; 4] = [
    SeedEntry {
        id: 1,
        price: 1330,
        image: "/images/compost.jpg",
        text: [
            (
                "Organic Compost",
                "Rich, dark compost to improve soil structure and fertility. Perfect for all types of plants.",
            ),
            (
                "जैविक खाद",
                "मिट्टी की संरचना और उर्वरता में सुधार के लिए समृद्ध, गहरी खाद। सभी प्रकार के पौधों के लिए उत्तम।",
            ),
            (
                "सेंद्रिय कंपोस्ट",
                "मातीची रचना आणि सुपीकता सुधारण्यासाठी समृद्ध, गडद कंपोस्ट. सर्व प्रकारच्या वनस्पतींसाठी योग्य.",
            ),
        ],
    },
    SeedEntry {
        id: 2,
        price: 1870,
        image: "/images/vermicompost.jpg",
        text: [
            (
                "Vermicompost (Worm Castings)",
                "Nutrient-dense worm castings that boost plant growth and health. Excellent for seedlings.",
            ),
            (
                "वर्मीकम्पोस्ट (केंचुआ खाद)",
                "पोषक तत्वों से भरपूर केंचुआ खाद जो पौधों की वृद्धि और स्वास्थ्य को बढ़ावा देती है। अंकुर के लिए उत्कृष्ट।",
            ),
            (
                "वर्मीकंपोस्ट (गांडूळ खत)",
                "पौष्टिक गांडूळ खत जे वनस्पतींची वाढ आणि आरोग्य वाढवते. रोपांसाठी उत्कृष्ट.",
            ),
        ],
    },
    SeedEntry {
        id: 3,
        price: 1560,
        image: "/images/neem-cake.jpg",
        text: [
            (
                "Neem Cake Fertilizer",
                "An organic fertilizer that also acts as a natural pesticide, protecting plants from soil-borne pests.",
            ),
            (
                "नीम खली उर्वरक",
                "एक जैविक उर्वरक जो प्राकृतिक कीटनाशक के रूप में भी काम करता है, पौधों को मिट्टी जनित कीटों से बचाता है।",
            ),
            (
                "निंबोळी पेंड खत",
                "एक सेंद्रिय खत जे नैसर्गिक कीटकनाशक म्हणून देखील कार्य करते, वनस्पतींना मातीजन्य कीटकांपासून वाचवते.",
            ),
        ],
    },
    SeedEntry {
        id: 4,
        price: 1000,
        image: "/images/cow-dung.jpg",
        text: [
            (
                "Cow Dung Manure",
                "Aged and composted cow manure, a traditional and effective all-purpose fertilizer.",
            ),
            (
                "गोबर की खाद",
                "पुरानी और कंपोस्ट की हुई गोबर की खाद, एक पारंपरिक और प्रभावी सर्व-उद्देश्यीय उर्वरक।",
            ),
            (
                "शेणखत",
                "जुने आणि कंपोस्ट केलेले शेणखत, एक पारंपारिक आणि प्रभावी सर्व-उद्देशीय खत.",
            ),
        ],
    },
];

impl Catalog {
    /// An empty catalog.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in four-product catalog in every language.
    #[must_use]
    pub fn seeded() -> Self {
        let mut catalog = Self::new();
        for entry in &SEED {
            for (lang, (name, description)) in Language::ALL.into_iter().zip(entry.text) {
                catalog.push(
                    lang,
                    Product {
                        id: ProductId::new(entry.id),
                        name: name.to_owned(),
                        description: description.to_owned(),
                        price: Money::from_rupees(entry.price),
                        image: entry.image.to_owned(),
                        supplier_name: SEED_SUPPLIER.to_owned(),
                    },
                );
            }
        }
        catalog
    }

    /// Append a product to one language's list as-is.
    ///
    /// Used when loading rows from storage.
    pub fn push(&mut self, lang: Language, product: Product) {
        self.lists.entry(lang).or_default().push(product);
    }

    /// Products listed for a language.
    #[must_use]
    pub fn products(&self, lang: Language) -> &[Product] {
        self.lists.get(&lang).map_or(&[], Vec::as_slice)
    }

    /// Look up one product in a language.
    #[must_use]
    pub fn find(&self, lang: Language, id: ProductId) -> Option<&Product> {
        self.products(lang).iter().find(|p| p.id == id)
    }

    /// Whether no language lists any product.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lists.values().all(Vec::is_empty)
    }

    /// The id a newly added product receives.
    #[must_use]
    pub fn next_id(&self) -> ProductId {
        self.lists
            .values()
            .flatten()
            .map(|p| p.id)
            .max()
            .map_or(ProductId::new(1), |max| max.next())
    }

    /// List a new product in every language.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft fails validation.
    pub fn add(&mut self, draft: ProductDraft, supplier: &str) -> Result<Product, CatalogError> {
        let draft = draft.validated()?;
        let product = Product {
            id: self.next_id(),
            name: draft.name,
            description: draft.description,
            price: draft.price,
            image: draft.image,
            supplier_name: supplier.to_owned(),
        };
        for lang in Language::ALL {
            self.push(lang, product.clone());
        }
        Ok(product)
    }

    /// Overwrite a product's fields in every language.
    ///
    /// The supplier name is kept from the existing entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the draft is invalid or no language lists `id`.
    pub fn update(&mut self, id: ProductId, draft: ProductDraft) -> Result<(), CatalogError> {
        let draft = draft.validated()?;
        let mut found = false;
        for product in self.lists.values_mut().flatten().filter(|p| p.id == id) {
            product.name.clone_from(&draft.name);
            product.description.clone_from(&draft.description);
            product.price = draft.price;
            product.image.clone_from(&draft.image);
            found = true;
        }
        if found {
            Ok(())
        } else {
            Err(CatalogError::NotFound(id))
        }
    }

    /// Remove a product from every language.
    ///
    /// # Errors
    ///
    /// Returns an error if no language lists `id`.
    pub fn remove(&mut self, id: ProductId) -> Result<(), CatalogError> {
        let mut found = false;
        for list in self.lists.values_mut() {
            let before = list.len();
            list.retain(|p| p.id != id);
            found |= list.len() != before;
        }
        if found {
            Ok(())
        } else {
            Err(CatalogError::NotFound(id))
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn draft(name: &str, price: i64) -> ProductDraft {
        ProductDraft {
            name: name.to_owned(),
            description: "Fresh from the farm".to_owned(),
            price: Money::from_rupees(price),
            image: String::new(),
        }
    }

    #[test]
    fn test_seeded_has_four_products_per_language() {
        let catalog = Catalog::seeded();
        for lang in Language::ALL {
            assert_eq!(catalog.products(lang).len(), 4);
        }
        let manure = catalog.find(Language::Mr, ProductId::new(4)).unwrap();
        assert_eq!(manure.name, "शेणखत");
        assert_eq!(manure.price, Money::from_rupees(1000));
        assert_eq!(manure.supplier_name, SEED_SUPPLIER);
    }

    #[test]
    fn test_add_uses_max_plus_one_in_every_language() {
        let mut catalog = Catalog::seeded();
        let product = catalog.add(draft("Bone Meal", 900), "Patil Agro").unwrap();
        assert_eq!(product.id, ProductId::new(5));
        for lang in Language::ALL {
            let listed = catalog.find(lang, ProductId::new(5)).unwrap();
            assert_eq!(listed.name, "Bone Meal");
            assert_eq!(listed.supplier_name, "Patil Agro");
        }
    }

    #[test]
    fn test_add_to_empty_catalog_starts_at_one() {
        let mut catalog = Catalog::new();
        assert!(catalog.is_empty());
        let product = catalog.add(draft("Bone Meal", 900), "Patil Agro").unwrap();
        assert_eq!(product.id, ProductId::new(1));
    }

    #[test]
    fn test_update_and_remove_touch_all_languages() {
        let mut catalog = Catalog::seeded();
        catalog.update(ProductId::new(1), draft("Compost Plus", 1400)).unwrap();
        for lang in Language::ALL {
            let p = catalog.find(lang, ProductId::new(1)).unwrap();
            assert_eq!(p.name, "Compost Plus");
            assert_eq!(p.supplier_name, SEED_SUPPLIER);
        }

        catalog.remove(ProductId::new(1)).unwrap();
        for lang in Language::ALL {
            assert!(catalog.find(lang, ProductId::new(1)).is_none());
        }
        assert_eq!(
            catalog.remove(ProductId::new(1)),
            Err(CatalogError::NotFound(ProductId::new(1)))
        );
    }

    #[test]
    fn test_draft_validation() {
        let mut catalog = Catalog::seeded();
        assert_eq!(
            catalog.add(draft("   ", 10), "x"),
            Err(CatalogError::EmptyName)
        );
        assert_eq!(
            catalog.add(draft("Urea", -1), "x"),
            Err(CatalogError::NegativePrice)
        );
    }

    #[test]
    fn test_draft_price_must_fit_storage() {
        let priced = |amount: &str| ProductDraft {
            name: "Vermicompost".to_owned(),
            description: String::new(),
            price: serde_json::from_value(serde_json::json!(amount)).unwrap(),
            image: String::new(),
        };
        let mut catalog = Catalog::seeded();

        assert_eq!(
            catalog.add(priced("10.005"), "x"),
            Err(CatalogError::PriceTooPrecise)
        );
        assert_eq!(
            catalog.add(priced("10000000000"), "x"),
            Err(CatalogError::PriceTooLarge)
        );

        // Trailing zeros are not extra precision
        let product = catalog.add(priced("10.500"), "x").unwrap();
        assert_eq!(product.price.times(3).amount().normalize().to_string(), "31.5");
        assert!(catalog.add(priced("9999999999.99"), "x").is_ok());
    }
}
