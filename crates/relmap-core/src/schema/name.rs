use heck::{ToSnakeCase, ToUpperCamelCase};
use std::fmt;

#[derive(Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Name {
    pub parts: Vec<String>,
}

impl Name {
    pub fn new(src: &str) -> Self {
        let snake = src.to_snake_case();
        let parts = snake.split('_').map(String::from).collect();
        Self { parts }
    }

    pub fn upper_camel_case(&self) -> String {
        self.snake_case().to_upper_camel_case()
    }

    pub fn snake_case(&self) -> String {
        self.parts.join("_")
    }

    /// The name with its last word pluralized, e.g. `CarDetail` becomes
    /// `CarDetails`.
    pub fn plural_upper_camel_case(&self) -> String {
        let mut parts = self.parts.clone();
        if let Some(last) = parts.last_mut() {
            *last = pluralizer::pluralize(last, 2, false);
        }
        parts.join("_").to_upper_camel_case()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.upper_camel_case())
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({self})")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_camel_case() {
        assert_eq!(Name::new("CarDetails").to_string(), "CarDetails");
        assert_eq!(Name::new("Order").snake_case(), "order");
        assert_eq!(Name::new("SpecialOrder").parts, ["special", "order"]);
    }

    #[test]
    fn pluralizes_last_word() {
        assert_eq!(Name::new("Customer").plural_upper_camel_case(), "Customers");
        assert_eq!(Name::new("OrderLine").plural_upper_camel_case(), "OrderLines");
        assert_eq!(Name::new("Category").plural_upper_camel_case(), "Categories");
    }
}
