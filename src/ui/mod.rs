pub mod compare;
pub mod diff_view;
pub mod files;
pub mod login;
pub mod share;
pub mod title_bar;
pub mod upload;
pub mod viewport;
