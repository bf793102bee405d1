pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::InMemoryDrinkRepo;
pub use postgres::PgDrinkRepo;
pub use store::{Drink, DrinkChanges, DrinkRepo, NewDrink, RecipePart};
