pub mod ad_critic_service;

pub use ad_critic_service::AdCriticService;
