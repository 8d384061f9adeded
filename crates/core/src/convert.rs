use std::collections::HashMap;

use crate::domain::discount::{DiscountMoney, DiscountProduct};
use crate::domain::product::{Money, Product, ProductId};

impl From<DiscountMoney> for Money {
    fn from(value: DiscountMoney) -> Self {
        Money::new(value.currency_code, value.units, value.nanos)
    }
}

impl From<Money> for DiscountMoney {
    fn from(value: Money) -> Self {
        DiscountMoney { currency_code: value.currency_code, units: value.units, nanos: value.nanos }
    }
}

/// Maps a discount-provider record into the catalog shape.
///
/// A provider record without a price becomes a zero amount in the default
/// currency.
pub fn to_product(product: &DiscountProduct) -> Product {
    Product {
        id: ProductId(product.id.clone()),
        name: product.name.clone(),
        description: product.description.clone(),
        picture: product.picture.clone(),
        price: product.price.clone().map(Money::from).unwrap_or_default(),
        categories: product.categories.clone(),
        discount: product.discount,
    }
}

pub fn to_discount_product(product: &Product) -> DiscountProduct {
    DiscountProduct {
        id: product.id.0.clone(),
        name: product.name.clone(),
        description: product.description.clone(),
        picture: product.picture.clone(),
        price: Some(DiscountMoney::from(product.price.clone())),
        categories: product.categories.clone(),
        discount: product.discount,
    }
}

impl From<&DiscountProduct> for Product {
    fn from(value: &DiscountProduct) -> Self {
        to_product(value)
    }
}

impl From<&Product> for DiscountProduct {
    fn from(value: &Product) -> Self {
        to_discount_product(value)
    }
}

/// Applies provider discounts to catalog products, keeping catalog order.
///
/// Only the discount percentage is taken from the provider; every other field
/// stays as the catalog defines it. Provider records for unknown ids are
/// ignored, and catalog products without a provider record pass through.
pub fn merge_discounts<'a, I>(products: &[Product], discounts: I) -> Vec<Product>
where
    I: IntoIterator<Item = &'a DiscountProduct>,
{
    let by_id: HashMap<ProductId, Product> = discounts
        .into_iter()
        .map(to_product)
        .map(|product| (product.id.clone(), product))
        .collect();

    products
        .iter()
        .map(|product| match by_id.get(&product.id) {
            Some(discounted) => Product { discount: discounted.discount, ..product.clone() },
            None => product.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::domain::discount::{DiscountMoney, DiscountProduct};
    use crate::domain::product::{Money, Product, ProductId};

    use super::{merge_discounts, to_discount_product, to_product};

    fn camera_discount() -> DiscountProduct {
        DiscountProduct {
            id: "1".to_string(),
            name: "Camera".to_string(),
            description: "vintage camera".to_string(),
            picture: "123".to_string(),
            price: Some(DiscountMoney::default()),
            categories: vec!["hobbies".to_string(), "vintage".to_string()],
            discount: 25,
        }
    }

    fn camera_product() -> Product {
        Product {
            id: ProductId("1".to_string()),
            name: "Camera".to_string(),
            description: "vintage camera".to_string(),
            picture: "123".to_string(),
            price: Money::new("USD", 0, 0),
            categories: vec!["hobbies".to_string(), "vintage".to_string()],
            discount: 25,
        }
    }

    #[test]
    fn to_product_copies_identifying_and_discount_fields() {
        let source = camera_discount();
        let product = to_product(&source);

        assert_eq!(product.id.as_str(), source.id);
        assert_eq!(product.name, source.name);
        assert_eq!(product.description, source.description);
        assert_eq!(product.picture, source.picture);
        assert_eq!(product.categories, source.categories);
        assert_eq!(product.discount, 25);
    }

    #[test]
    fn to_discount_product_copies_identifying_and_discount_fields() {
        let source = camera_product();
        let converted = to_discount_product(&source);

        assert_eq!(converted.id, source.id.as_str());
        assert_eq!(converted.name, source.name);
        assert_eq!(converted.description, source.description);
        assert_eq!(converted.picture, source.picture);
        assert_eq!(converted.categories, source.categories);
        assert_eq!(converted.discount, source.discount);
    }

    #[test]
    fn missing_price_becomes_zero_amount() {
        let source = DiscountProduct { price: None, ..camera_discount() };

        assert_eq!(to_product(&source).price, Money::zero("USD"));
    }

    #[test]
    fn price_survives_a_round_trip() {
        let source = DiscountProduct {
            price: Some(DiscountMoney {
                currency_code: "EUR".to_string(),
                units: 12,
                nanos: 490_000_000,
            }),
            ..camera_discount()
        };

        assert_eq!(to_product(&source).price, Money::new("EUR", 12, 490_000_000));
        assert_eq!(to_discount_product(&to_product(&source)), source);
    }

    #[test]
    fn conversion_is_repeatable() {
        let source = camera_discount();
        assert_eq!(to_product(&source), to_product(&source));

        let product = camera_product();
        assert_eq!(to_discount_product(&product), to_discount_product(&product));
    }

    #[test]
    fn categories_are_independent_copies() {
        let source = camera_discount();
        let mut product = to_product(&source);
        product.categories.push("cameras".to_string());

        assert_eq!(source.categories, vec!["hobbies".to_string(), "vintage".to_string()]);
    }

    #[test]
    fn merge_takes_only_the_discount_from_the_provider() {
        let catalog = vec![
            Product { discount: 0, ..camera_product() },
            Product {
                id: ProductId("2".to_string()),
                name: "Mug".to_string(),
                discount: 0,
                ..camera_product()
            },
        ];
        let provider = vec![
            DiscountProduct { name: "Renamed Camera".to_string(), discount: 40, ..camera_discount() },
            DiscountProduct { id: "unknown".to_string(), discount: 90, ..camera_discount() },
        ];

        let merged = merge_discounts(&catalog, &provider);

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].id.as_str(), "1");
        assert_eq!(merged[0].name, "Camera");
        assert_eq!(merged[0].discount, 40);
        assert_eq!(merged[1], catalog[1]);
    }
}
