pub mod chat;
pub mod init;
pub mod settings;
