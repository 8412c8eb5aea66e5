pub mod assist;
pub mod book;
pub mod notes;
pub mod outline;
pub mod outline_view;
pub mod storage;
pub mod theme;
