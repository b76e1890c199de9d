pub mod dispatch;
pub mod generate;
pub mod inspect;
pub mod schema;
