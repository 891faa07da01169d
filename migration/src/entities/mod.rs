pub mod campaign;
pub mod client;
pub mod dooh_plan;
pub mod kampanija;
pub mod screen;
pub mod screen_booking;
pub mod screen_pricing;
pub mod screen_provider;
pub mod screen_slot;

pub use campaign::Entity as CampaignEntity;
pub use client::Entity as ClientEntity;
pub use dooh_plan::Entity as DoohPlanEntity;
pub use kampanija::Entity as KampanijaEntity;
pub use screen::Entity as ScreenEntity;
pub use screen_booking::Entity as ScreenBookingEntity;
pub use screen_pricing::Entity as ScreenPricingEntity;
pub use screen_provider::Entity as ScreenProviderEntity;
pub use screen_slot::Entity as ScreenSlotEntity;
