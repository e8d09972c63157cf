pub mod analyses;
pub mod conversations;
pub mod messages;
