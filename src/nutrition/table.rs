use super::{BaseUnit, FoodReference};

const fn food(name: &'static str, calories: f64, base: BaseUnit) -> FoodReference {
    FoodReference {
        name,
        calories,
        base,
    }
}

/// Reference calories. Declaration order matters: substring lookups return the
/// first entry that contains the query.
pub static FOODS: &[FoodReference] = &[
    // Protein
    food("Chicken Breast", 165.0, BaseUnit::Per100g),
    food("Chicken Thigh", 209.0, BaseUnit::Per100g),
    food("Turkey Breast", 135.0, BaseUnit::Per100g),
    food("Beef Steak", 271.0, BaseUnit::Per100g),
    food("Ground Beef", 254.0, BaseUnit::Per100g),
    food("Pork Chop", 231.0, BaseUnit::Per100g),
    food("Salmon", 208.0, BaseUnit::Per100g),
    food("Tuna", 132.0, BaseUnit::Per100g),
    food("Shrimp", 99.0, BaseUnit::Per100g),
    food("Egg", 78.0, BaseUnit::PerUnit),
    food("Egg White", 17.0, BaseUnit::PerUnit),
    food("Tofu", 76.0, BaseUnit::Per100g),
    food("Whey Protein Scoop", 120.0, BaseUnit::PerUnit),
    // Dairy
    food("Milk", 42.0, BaseUnit::Per100ml),
    food("Greek Yogurt", 59.0, BaseUnit::Per100g),
    food("Cottage Cheese", 98.0, BaseUnit::Per100g),
    food("Cheddar Cheese", 403.0, BaseUnit::Per100g),
    // Carbohydrates
    food("White Rice", 130.0, BaseUnit::Per100g),
    food("Brown Rice", 112.0, BaseUnit::Per100g),
    food("Pasta", 131.0, BaseUnit::Per100g),
    food("Oats", 389.0, BaseUnit::Per100g),
    food("Bread Slice", 79.0, BaseUnit::PerUnit),
    food("Bagel", 245.0, BaseUnit::PerUnit),
    food("Potato", 77.0, BaseUnit::Per100g),
    food("Sweet Potato", 86.0, BaseUnit::Per100g),
    food("Quinoa", 120.0, BaseUnit::Per100g),
    // Fruit
    food("Banana", 89.0, BaseUnit::PerUnit),
    food("Apple", 95.0, BaseUnit::PerUnit),
    food("Orange", 62.0, BaseUnit::PerUnit),
    food("Blueberries", 57.0, BaseUnit::Per100g),
    food("Strawberries", 32.0, BaseUnit::Per100g),
    food("Orange Juice", 45.0, BaseUnit::Per100ml),
    // Vegetables
    food("Broccoli", 34.0, BaseUnit::Per100g),
    food("Spinach", 23.0, BaseUnit::Per100g),
    food("Carrot", 41.0, BaseUnit::Per100g),
    food("Avocado", 240.0, BaseUnit::PerUnit),
    // Fats, snacks, drinks
    food("Olive Oil", 884.0, BaseUnit::Per100ml),
    food("Peanut Butter", 588.0, BaseUnit::Per100g),
    food("Almonds", 579.0, BaseUnit::Per100g),
    food("Dark Chocolate", 546.0, BaseUnit::Per100g),
    food("Protein Bar", 200.0, BaseUnit::PerUnit),
    food("Coca Cola", 42.0, BaseUnit::Per100ml),
    food("Beer", 43.0, BaseUnit::Per100ml),
    food("Pizza Slice", 285.0, BaseUnit::PerUnit),
    food("Burger", 354.0, BaseUnit::PerUnit),
];
