pub mod audit;
pub mod entity;
pub mod meeting;
pub mod questionnaire;
pub mod relation;
pub mod translated;
