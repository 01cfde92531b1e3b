pub mod insights;
pub mod pages;
pub mod presentation;
