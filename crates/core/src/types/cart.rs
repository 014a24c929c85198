//! Persisted cart line item.
//!
//! The cart is stored as a JSON array of product records copied from the catalog
//! when the shopper adds them, plus a `Quantity`. Field names follow the catalog
//! (`Id`, `Name`, `FinalPrice`, ...). Fields this crate does not model are kept in
//! `extra` so a read-modify-write cycle never drops catalog data.
//!
//! Decoding is lenient: only a usable `Id` is required. A display field with an
//! unexpected shape (`"Name": null`, `"Colors": "Red"`) is left unmodeled and
//! carried through `extra` as it was, so the line still renders and is written
//! back unchanged. `FinalPrice` and `Quantity` are coerced instead, and a numeric
//! `Id` is read as its decimal string.

use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::ProductId;
use super::price::Price;
use super::quantity::Quantity;

/// Display images attached to a catalog product.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductImages {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_medium: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_large: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for ProductImages {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut extra = Map::deserialize(deserializer)?;
        Ok(Self {
            primary_medium: take_shaped(&mut extra, "PrimaryMedium"),
            primary_large: take_shaped(&mut extra, "PrimaryLarge"),
            extra,
        })
    }
}

/// A color variant of a catalog product.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductColor {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub color_name: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for ProductColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut extra = Map::deserialize(deserializer)?;
        Ok(Self {
            color_name: take_shaped(&mut extra, "ColorName").unwrap_or_default(),
            extra,
        })
    }
}

/// One product entry in the shopping cart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct CartLineItem {
    pub id: ProductId,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    pub final_price: Price,
    pub quantity: Quantity,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub images: Option<ProductImages>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<Vec<ProductColor>>,
    /// Catalog fields carried through untouched, including modeled fields whose
    /// stored value had an unexpected shape.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl<'de> Deserialize<'de> for CartLineItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut extra: Map<String, Value> = Map::deserialize(deserializer)?;

        let id = match extra.remove("Id") {
            Some(Value::String(id)) => ProductId::new(id),
            Some(Value::Number(n)) => ProductId::new(n.to_string()),
            Some(other) => {
                return Err(de::Error::custom(format!(
                    "Id must be a string or a number, got {other}"
                )));
            }
            None => return Err(de::Error::missing_field("Id")),
        };
        let final_price = extra
            .remove("FinalPrice")
            .map_or(Price::ZERO, |v| Price::from_json(&v));
        let quantity = extra
            .remove("Quantity")
            .map_or(Quantity::ONE, |v| Quantity::from_json(&v));

        Ok(Self {
            id,
            name: take_shaped(&mut extra, "Name").unwrap_or_default(),
            final_price,
            quantity,
            images: take_shaped(&mut extra, "Images"),
            image: take_shaped(&mut extra, "Image"),
            colors: take_shaped(&mut extra, "Colors"),
            extra,
        })
    }
}

/// Remove `key` and read it as `T`. A value of any other shape (`null`
/// included) is put back untouched and `None` is returned.
fn take_shaped<T: DeserializeOwned>(fields: &mut Map<String, Value>, key: &str) -> Option<T> {
    let raw = fields.remove(key)?;
    match T::deserialize(&raw) {
        Ok(value) => Some(value),
        Err(_) => {
            fields.insert(key.to_owned(), raw);
            None
        }
    }
}

impl CartLineItem {
    /// Create a line item with a quantity of one and no display assets.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, final_price: Price) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            final_price,
            quantity: Quantity::ONE,
            images: None,
            image: None,
            colors: None,
            extra: Map::new(),
        }
    }

    /// Set the quantity (builder style).
    #[must_use]
    pub fn with_quantity(mut self, quantity: Quantity) -> Self {
        self.quantity = quantity;
        self
    }

    /// First available image: medium, then large, then the generic image.
    #[must_use]
    pub fn image_src(&self) -> Option<&str> {
        let images = self.images.as_ref();
        images
            .and_then(|i| i.primary_medium.as_deref())
            .or_else(|| images.and_then(|i| i.primary_large.as_deref()))
            .or(self.image.as_deref())
    }

    /// Name of the primary (first) color, or an empty string.
    #[must_use]
    pub fn primary_color(&self) -> &str {
        self.colors
            .as_deref()
            .and_then(<[ProductColor]>::first)
            .map_or("", |c| c.color_name.as_str())
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.final_price.times(self.quantity)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    fn tent() -> Value {
        json!({
            "Id": "880RR",
            "Name": "Marmot Ajax Tent - 3-Person, 3-Season",
            "FinalPrice": 199.99,
            "Quantity": 2,
            "Images": { "PrimaryMedium": "/images/880RR-m.jpg", "PrimaryLarge": "/images/880RR-l.jpg" },
            "Colors": [{ "ColorCode": "01", "ColorName": "Pale Pumpkin/Terracotta" }],
            "Brand": { "Name": "Marmot" },
            "IsClearance": true
        })
    }

    #[test]
    fn test_deserialize_catalog_record() {
        let item: CartLineItem = serde_json::from_value(tent()).unwrap();
        assert_eq!(item.id.as_str(), "880RR");
        assert_eq!(item.quantity.get(), 2);
        assert_eq!(item.final_price, Price::from_cents(19999));
        assert_eq!(item.primary_color(), "Pale Pumpkin/Terracotta");
        assert_eq!(item.image_src(), Some("/images/880RR-m.jpg"));
    }

    #[test]
    fn test_unknown_fields_round_trip() {
        let item: CartLineItem = serde_json::from_value(tent()).unwrap();
        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["Brand"]["Name"], "Marmot");
        assert_eq!(back["IsClearance"], true);
        assert_eq!(back["Colors"][0]["ColorCode"], "01");
    }

    #[test]
    fn test_missing_quantity_defaults_to_one() {
        let item: CartLineItem =
            serde_json::from_value(json!({ "Id": "A", "Name": "a", "FinalPrice": 1 })).unwrap();
        assert_eq!(item.quantity, Quantity::ONE);

        let item: CartLineItem =
            serde_json::from_value(json!({ "Id": "A", "Quantity": null })).unwrap();
        assert_eq!(item.quantity, Quantity::ONE);
    }

    #[test]
    fn test_null_name_and_color_name_read_as_empty() {
        let item: CartLineItem = serde_json::from_value(json!({
            "Id": "A",
            "Name": null,
            "FinalPrice": 10,
            "Colors": [{ "ColorName": null, "ColorCode": "07" }]
        }))
        .unwrap();
        assert_eq!(item.name, "");
        assert_eq!(item.primary_color(), "");

        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back.get("Name"), Some(&Value::Null));
        assert_eq!(back["Colors"], json!([{ "ColorName": null, "ColorCode": "07" }]));
    }

    #[test]
    fn test_wrongly_shaped_fields_are_kept_verbatim() {
        let item: CartLineItem = serde_json::from_value(json!({
            "Id": "C",
            "Name": 7,
            "Colors": "Red",
            "Images": ["/a.jpg"],
            "Image": { "url": "/b.jpg" }
        }))
        .unwrap();
        assert_eq!(item.name, "");
        assert_eq!(item.colors, None);
        assert_eq!(item.images, None);
        assert_eq!(item.image_src(), None);
        assert_eq!(item.primary_color(), "");

        let back = serde_json::to_value(&item).unwrap();
        assert_eq!(back["Name"], 7);
        assert_eq!(back["Colors"], "Red");
        assert_eq!(back["Images"], json!(["/a.jpg"]));
        assert_eq!(back["Image"]["url"], "/b.jpg");
    }

    #[test]
    fn test_numeric_id_reads_as_string() {
        let item: CartLineItem = serde_json::from_value(json!({ "Id": 42 })).unwrap();
        assert_eq!(item.id.as_str(), "42");
    }

    #[test]
    fn test_unusable_id_is_rejected() {
        assert!(serde_json::from_value::<CartLineItem>(json!({ "Name": "no id" })).is_err());
        assert!(serde_json::from_value::<CartLineItem>(json!({ "Id": null })).is_err());
        assert!(serde_json::from_value::<CartLineItem>(json!({ "Id": ["A"] })).is_err());
        assert!(serde_json::from_value::<CartLineItem>(json!("A")).is_err());
    }

    #[test]
    fn test_string_price_is_written_back_as_number() {
        let item: CartLineItem =
            serde_json::from_value(json!({ "Id": "A", "FinalPrice": "19.99" })).unwrap();
        assert_eq!(item.final_price, Price::from_cents(1999));
        assert_eq!(serde_json::to_value(&item).unwrap()["FinalPrice"], json!(19.99));
    }

    #[test]
    fn test_image_fallback_chain() {
        let mut item = CartLineItem::new("A", "a", Price::ZERO);
        assert_eq!(item.image_src(), None);

        item.image = Some("/generic.jpg".to_string());
        assert_eq!(item.image_src(), Some("/generic.jpg"));

        item.images = Some(ProductImages {
            primary_large: Some("/large.jpg".to_string()),
            ..ProductImages::default()
        });
        assert_eq!(item.image_src(), Some("/large.jpg"));
    }

    #[test]
    fn test_primary_color_empty_when_absent() {
        let mut item = CartLineItem::new("A", "a", Price::ZERO);
        assert_eq!(item.primary_color(), "");
        item.colors = Some(Vec::new());
        assert_eq!(item.primary_color(), "");
    }
}
