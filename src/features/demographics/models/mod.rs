mod demographic;

pub use demographic::Demographic;
