pub mod meeting_handlers;
