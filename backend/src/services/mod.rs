pub mod conversation_store;
pub mod dialog_router;
pub mod journey_planner;
pub mod title_generator;
