use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub title: String,
    pub price: f64,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<Rating>,
}

impl Product {
    pub fn new(id: u64, title: impl Into<String>, price: f64) -> Self {
        Self {
            id,
            title: title.into(),
            price,
            description: String::new(),
            category: String::new(),
            image: String::new(),
            rating: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub rate: f64,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub username: String,
    pub name: UserName,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserName {
    pub firstname: String,
    pub lastname: String,
}

impl UserName {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }
}

/// Aggregate shown by the catalog page once every source has answered.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogOverview {
    pub products: Vec<Product>,
    pub categories: Vec<String>,
    /// Display names, `"first last"`
    pub users: Vec<String>,
}

impl CatalogOverview {
    pub fn from_sources(products: Vec<Product>, categories: Vec<String>, users: Vec<User>) -> Self {
        Self {
            products,
            categories,
            users: users.iter().map(|user| user.name.full_name()).collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty() && self.categories.is_empty() && self.users.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_deserializes_api_shape() {
        let product: Product = serde_json::from_value(json!({
            "id": 1,
            "title": "Fjallraven Backpack",
            "price": 109.95,
            "description": "Your perfect pack for everyday use",
            "category": "men's clothing",
            "image": "https://fakestoreapi.com/img/81fPKd-2AYL._AC_SL1500_.jpg",
            "rating": { "rate": 3.9, "count": 120 }
        }))
        .unwrap();

        assert_eq!(product.id, 1);
        assert_eq!(product.category, "men's clothing");
        assert_eq!(
            product.rating,
            Some(Rating {
                rate: 3.9,
                count: 120
            })
        );
    }

    #[test]
    fn test_product_tolerates_missing_optional_fields() {
        let product: Product =
            serde_json::from_value(json!({ "id": 1, "title": "Shirt", "price": 9.99 })).unwrap();

        assert_eq!(product, Product::new(1, "Shirt", 9.99));
    }

    #[test]
    fn test_user_ignores_unknown_fields() {
        let user: User = serde_json::from_value(json!({
            "id": 1,
            "email": "john@gmail.com",
            "username": "johnd",
            "password": "m38rmF$",
            "name": { "firstname": "john", "lastname": "doe" },
            "address": { "city": "kilcoole" },
            "phone": "1-570-236-7033"
        }))
        .unwrap();

        assert_eq!(user.name.full_name(), "john doe");
        assert_eq!(user.username, "johnd");
    }

    #[test]
    fn test_catalog_overview_formats_user_names() {
        let users = vec![User {
            id: 2,
            email: String::new(),
            username: "mor_2314".to_string(),
            name: UserName {
                firstname: "david".to_string(),
                lastname: "morrison".to_string(),
            },
        }];

        let overview =
            CatalogOverview::from_sources(Vec::new(), vec!["electronics".to_string()], users);

        assert_eq!(overview.users, vec!["david morrison".to_string()]);
        assert!(!overview.is_empty());
        assert!(CatalogOverview::default().is_empty());
    }
}
