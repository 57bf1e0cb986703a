pub mod demographic_service;

pub use demographic_service::DemographicService;
