pub mod catalog_controller;
pub mod plan_controller;
pub mod prompt_controller;
mod request_form;

pub use catalog_controller::CatalogController;
pub use plan_controller::PlanController;
pub use prompt_controller::PromptController;
