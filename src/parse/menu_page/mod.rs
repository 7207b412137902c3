mod daily_menu;
mod food_item;
mod meal;
mod note_legend;
mod stations;

pub use daily_menu::{DailyMenu, MealFailure, ParsePolicy};
pub use food_item::FoodItem;
pub use meal::{Meal, MealHours};
pub use note_legend::NoteLegend;
pub use stations::{Offerings, OfferingToken, Station};
