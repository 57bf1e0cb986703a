pub mod demographic_dto;

pub use demographic_dto::{CreateDemographicDto, DemographicResponseDto, UpdateDemographicDto};
