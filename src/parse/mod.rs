mod error;
pub mod menu_page;
mod static_selector;
mod text;

pub use error::{Error, Result};
pub use menu_page::{
    DailyMenu, FoodItem, Meal, MealFailure, MealHours, NoteLegend, ParsePolicy, Station,
};
