//! Sort orders

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn to_sql(&self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }

    pub fn is_ascending(&self) -> bool {
        matches!(self, Direction::Asc)
    }
}

/// Placement of NULL values in a sorted result
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NullHandling {
    /// Leave it to the database
    #[default]
    Native,
    NullsFirst,
    NullsLast,
}

/// Sort order for a single property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    property: String,
    direction: Direction,
    null_handling: NullHandling,
    ignore_case: bool,
}

impl Order {
    pub fn by(property: impl Into<String>) -> Self {
        Self::new(Direction::Asc, property)
    }

    pub fn asc(property: impl Into<String>) -> Self {
        Self::new(Direction::Asc, property)
    }

    pub fn desc(property: impl Into<String>) -> Self {
        Self::new(Direction::Desc, property)
    }

    pub fn new(direction: Direction, property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction,
            null_handling: NullHandling::Native,
            ignore_case: false,
        }
    }

    pub fn with_direction(&self, direction: Direction) -> Self {
        Self {
            direction,
            ..self.clone()
        }
    }

    pub fn with_property(&self, property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            ..self.clone()
        }
    }

    pub fn with_null_handling(&self, null_handling: NullHandling) -> Self {
        Self {
            null_handling,
            ..self.clone()
        }
    }

    pub fn nulls_first(&self) -> Self {
        self.with_null_handling(NullHandling::NullsFirst)
    }

    pub fn nulls_last(&self) -> Self {
        self.with_null_handling(NullHandling::NullsLast)
    }

    /// Request case-insensitive ordering. Queries reject such orders.
    pub fn ignore_case(&self) -> Self {
        Self {
            ignore_case: true,
            ..self.clone()
        }
    }

    pub fn property(&self) -> &str {
        &self.property
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn null_handling(&self) -> NullHandling {
        self.null_handling
    }

    pub fn is_ignore_case(&self) -> bool {
        self.ignore_case
    }
}

/// Ordered list of sort orders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sort {
    orders: Vec<Order>,
}

impl Sort {
    pub fn unsorted() -> Self {
        Self::default()
    }

    /// Ascending sort over the given properties
    pub fn by<I, S>(properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::by_direction(Direction::Asc, properties)
    }

    pub fn by_direction<I, S>(direction: Direction, properties: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            orders: properties
                .into_iter()
                .map(|property| Order::new(direction, property))
                .collect(),
        }
    }

    pub fn by_orders(orders: Vec<Order>) -> Self {
        Self { orders }
    }

    /// Returns a new sort with `other`'s orders appended
    pub fn and(&self, other: &Sort) -> Self {
        let mut orders = self.orders.clone();
        orders.extend(other.orders.iter().cloned());
        Self { orders }
    }

    pub fn descending(&self) -> Self {
        self.with_direction(Direction::Desc)
    }

    pub fn ascending(&self) -> Self {
        self.with_direction(Direction::Asc)
    }

    fn with_direction(&self, direction: Direction) -> Self {
        Self {
            orders: self
                .orders
                .iter()
                .map(|order| order.with_direction(direction))
                .collect(),
        }
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn iter(&self) -> impl Iterator<Item = &Order> {
        self.orders.iter()
    }

    pub fn order_for(&self, property: &str) -> Option<&Order> {
        self.orders.iter().find(|order| order.property == property)
    }

    pub fn is_sorted(&self) -> bool {
        !self.orders.is_empty()
    }

    pub fn is_unsorted(&self) -> bool {
        self.orders.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_by_properties() {
        let sort = Sort::by(["name", "id"]).descending();

        assert!(sort.is_sorted());
        assert_eq!(sort.orders().len(), 2);
        assert!(sort.iter().all(|o| o.direction() == Direction::Desc));
        assert_eq!(sort.order_for("id").unwrap().property(), "id");
    }

    #[test]
    fn test_and_appends() {
        let sort = Sort::by(["name"]).and(&Sort::by_orders(vec![Order::desc("id")]));

        let properties: Vec<&str> = sort.iter().map(Order::property).collect();
        assert_eq!(properties, vec!["name", "id"]);
        assert!(Sort::unsorted().and(&Sort::unsorted()).is_unsorted());
    }

    #[test]
    fn test_order_modifiers_return_copies() {
        let order = Order::asc("name");
        let modified = order.ignore_case().nulls_last();

        assert!(!order.is_ignore_case());
        assert!(modified.is_ignore_case());
        assert_eq!(modified.null_handling(), NullHandling::NullsLast);
        assert_eq!(order.null_handling(), NullHandling::Native);
    }

    #[test]
    fn test_direction_to_sql() {
        assert_eq!(Direction::Asc.to_sql(), "ASC");
        assert_eq!(Direction::Desc.to_sql(), "DESC");
        assert!(Direction::default().is_ascending());
    }
}
